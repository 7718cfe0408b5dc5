//! Service Layer
//!
//! - `DependencyBinding`: a named slot with locking, diagnostics and metrics
//! - `BindingRegistry`: the bindings declared by a `RegistryConfig`

pub mod binding;
pub mod registry;

pub use binding::{DependencyBinding, DependencyBindingBuilder};
pub use registry::BindingRegistry;
