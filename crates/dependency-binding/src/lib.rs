//! # Dependency Binding
//!
//! Typed, single-assignment dependency slots. A binding is a named slot that
//! one component provides a value for and any number of components wait on.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no locking or I/O
//!   - `BindingType`, `Bindable`: type tags and the bound-value capability
//!   - `TypeCatalog`: configuration-time conformance relation
//!   - `TypedSlot`: the `Empty`/`Bound` state machine
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `DiagnosticSink`: side channel for rejected operations
//!   - `SessionListener`: receiver of host session events
//!
//! - **Adapters Layer** (`adapters/`): Sink implementations
//!   - `TracingDiagnosticSink`: warnings through `tracing`
//!   - `RecordingDiagnosticSink`: in-memory capture
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `DependencyBinding`: thread-safe named slot
//!   - `BindingRegistry`: bindings built from `RegistryConfig`
//!
//! - **Lifecycle** (`lifecycle`): `SessionLifecycle` hub that resets attached
//!   bindings when the host leaves a running session.
//!
//! ## Invariants
//!
//! - **SINGLE-ASSIGNMENT**: a value is bound at most once per epoch
//! - **EXACTLY-ONCE**: every registered callback runs once, or is dropped by a reset
//! - **ORDERED**: pending callbacks run in registration order
//!
//! ## Usage Example
//!
//! ```ignore
//! use dependency_binding::{Bindable, BindingType, DependencyBinding, TypeCatalog};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct AudioMixer;
//!
//! impl Bindable for AudioMixer {
//!     fn binding_type(&self) -> BindingType {
//!         BindingType::new("AudioMixer")
//!     }
//! }
//!
//! let mut catalog = TypeCatalog::new();
//! catalog.register(BindingType::new("Mixer"), &[])?;
//! catalog.register(BindingType::new("AudioMixer"), &[BindingType::new("Mixer")])?;
//!
//! let binding = DependencyBinding::new("mixer", BindingType::new("Mixer"), Arc::new(catalog));
//! binding.when_available(|mixer| println!("got {mixer:?}"));
//! binding.provide(AudioMixer);
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod telemetry;

// Re-exports for convenience
pub use adapters::{RecordingDiagnosticSink, TracingDiagnosticSink};
pub use config::{BindingDefinition, RegistryConfig, TypeDefinition};
pub use domain::{
    downcast_arc, AsAny, Bindable, BindingCallback, BindingType, SlotState, TypeCatalog, TypedSlot,
};
pub use error::{BindingError, ConfigError};
pub use lifecycle::{SessionAttachment, SessionEvent, SessionLifecycle};
pub use metrics::{BindingMetrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{Diagnostic, DiagnosticSink, Operation, SessionListener};
pub use service::{BindingRegistry, DependencyBinding, DependencyBindingBuilder};
pub use telemetry::{init_logging, LoggingConfig, TelemetryError};

/// Capacity of the broadcast channel feeding async lifecycle observers.
pub const DEFAULT_LIFECYCLE_CAPACITY: usize = 64;
