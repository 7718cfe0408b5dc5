//! Error types for dependency bindings

use crate::domain::BindingType;
use thiserror::Error;

/// Rejections produced by binding operations.
///
/// The lenient API (`provide`, `when_available`) reports these through a
/// `DiagnosticSink`; the strict API (`try_provide`, `try_when_available`)
/// returns them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// A value was provided to a binding that is already bound.
    #[error("binding of type {expected} is already satisfied")]
    AlreadyBound { expected: BindingType },

    /// The provided value does not conform to the expected type.
    #[error("binding of type {expected} cannot accept incompatible type {actual}")]
    TypeMismatch {
        expected: BindingType,
        actual: BindingType,
    },

    /// A null callback was passed to `bind_async`.
    #[error("null callback for binding of type {expected}")]
    NullCallback { expected: BindingType },

    /// The binding was reset before a value arrived.
    #[error("binding of type {expected} was reset before a value was provided")]
    SessionReset { expected: BindingType },
}

/// Errors from type catalog and registry configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Type registered twice: {0}")]
    DuplicateType(BindingType),

    #[error("Type {ty} names unknown supertype {supertype}")]
    UnknownSupertype {
        ty: BindingType,
        supertype: BindingType,
    },

    #[error("Binding declared twice: {0}")]
    DuplicateBinding(String),

    #[error("Binding {binding} expects unregistered type {ty}")]
    UnknownType { binding: String, ty: BindingType },

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
