//! Diagnostic sink backed by `tracing`

use crate::error::BindingError;
use crate::ports::{Diagnostic, DiagnosticSink};
use tracing::warn;

/// Emits every diagnostic as a `warn!` event with structured fields.
///
/// The default sink for new bindings.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic) {
        let binding = &*diagnostic.binding;
        let operation = diagnostic.operation.as_str();
        match &diagnostic.error {
            BindingError::AlreadyBound { expected } => warn!(
                binding,
                operation,
                expected = %expected,
                "Trying to provide an already satisfied binding"
            ),
            BindingError::TypeMismatch { expected, actual } => warn!(
                binding,
                operation,
                expected = %expected,
                actual = %actual,
                "Trying to provide a binding with an incompatible type"
            ),
            BindingError::NullCallback { expected } => warn!(
                binding,
                operation,
                expected = %expected,
                "Trying to bind with a null callback"
            ),
            // Only produced by `wait()`; bindings never report it.
            other @ BindingError::SessionReset { .. } => warn!(
                binding,
                operation,
                error = %other,
                "Binding operation rejected"
            ),
        }
    }
}
