//! In-memory diagnostic sink
//!
//! Keeps every reported diagnostic so hosts and tests can inspect what a
//! binding rejected.

use crate::ports::{Diagnostic, DiagnosticSink};
use parking_lot::Mutex;

/// Collects diagnostics in report order.
#[derive(Debug, Default)]
pub struct RecordingDiagnosticSink {
    records: Mutex<Vec<Diagnostic>>,
}

impl RecordingDiagnosticSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Remove and return everything reported so far.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.lock())
    }
}

impl DiagnosticSink for RecordingDiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.records.lock().push(diagnostic.clone());
    }
}
