//! Ports Layer
//!
//! Traits the bindings depend on but do not implement:
//! - `DiagnosticSink` - where rejected operations are reported
//! - `SessionListener` - receiver of host session-boundary events

pub mod diagnostics;
pub mod session;

pub use diagnostics::{Diagnostic, DiagnosticSink, Operation};
pub use session::SessionListener;
