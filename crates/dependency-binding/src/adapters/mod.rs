//! Adapters Layer
//!
//! `DiagnosticSink` implementations.

pub mod recording_sink;
pub mod tracing_sink;

pub use recording_sink::RecordingDiagnosticSink;
pub use tracing_sink::TracingDiagnosticSink;
