//! Diagnostic side channel
//!
//! Lenient binding operations never return errors. Rejections are described
//! by a [`Diagnostic`] and handed to the binding's [`DiagnosticSink`].

use crate::error::BindingError;
use std::fmt;
use std::sync::Arc;

/// Binding operation that produced a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Provide,
    WhenAvailable,
}

impl Operation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provide => "provide",
            Self::WhenAvailable => "when_available",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected binding operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the binding that rejected the operation.
    pub binding: Arc<str>,
    pub operation: Operation,
    pub error: BindingError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}.{}]: {}", self.binding, self.operation, self.error)
    }
}

/// Receives diagnostics from bindings.
///
/// Implementations must not call back into the reporting binding.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

impl<F> DiagnosticSink for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}
