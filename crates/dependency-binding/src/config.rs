//! Registry configuration
//!
//! Declares the bindable types and the named bindings a host wants. Loaded
//! from JSON:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "Renderer" },
//!     { "name": "VulkanRenderer", "supertypes": ["Renderer"] }
//!   ],
//!   "bindings": [
//!     { "name": "main-renderer", "expected_type": "Renderer" }
//!   ]
//! }
//! ```
//!
//! Types must be listed after their supertypes.

use crate::domain::{BindingType, TypeCatalog};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A bindable type and its direct supertypes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: BindingType,
    #[serde(default)]
    pub supertypes: Vec<BindingType>,
}

/// A named binding and the type it accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingDefinition {
    pub name: String,
    pub expected_type: BindingType,
}

/// Types and bindings for a [`BindingRegistry`](crate::BindingRegistry).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
    #[serde(default)]
    pub bindings: Vec<BindingDefinition>,
}

impl RegistryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a type definition.
    #[must_use]
    pub fn with_type(mut self, name: impl Into<BindingType>, supertypes: &[BindingType]) -> Self {
        self.types.push(TypeDefinition {
            name: name.into(),
            supertypes: supertypes.to_vec(),
        });
        self
    }

    /// Append a binding definition.
    #[must_use]
    pub fn with_binding(
        mut self,
        name: impl Into<String>,
        expected_type: impl Into<BindingType>,
    ) -> Self {
        self.bindings.push(BindingDefinition {
            name: name.into(),
            expected_type: expected_type.into(),
        });
        self
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the type catalog described by `types`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::DuplicateType` - a type is listed twice
    /// - `ConfigError::UnknownSupertype` - a supertype is missing or listed later
    pub fn build_catalog(&self) -> Result<TypeCatalog, ConfigError> {
        let mut catalog = TypeCatalog::new();
        for definition in &self.types {
            catalog.register(definition.name.clone(), &definition.supertypes)?;
        }
        Ok(catalog)
    }

    /// Check the whole configuration.
    ///
    /// # Errors
    ///
    /// Everything [`build_catalog`](Self::build_catalog) rejects, plus:
    /// - `ConfigError::DuplicateBinding` - two bindings share a name
    /// - `ConfigError::UnknownType` - a binding expects an unregistered type
    pub fn validate(&self) -> Result<(), ConfigError> {
        let catalog = self.build_catalog()?;
        self.validate_bindings(&catalog)
    }

    pub(crate) fn validate_bindings(&self, catalog: &TypeCatalog) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for binding in &self.bindings {
            if !seen.insert(binding.name.as_str()) {
                return Err(ConfigError::DuplicateBinding(binding.name.clone()));
            }
            if !catalog.contains(&binding.expected_type) {
                return Err(ConfigError::UnknownType {
                    binding: binding.name.clone(),
                    ty: binding.expected_type.clone(),
                });
            }
        }
        Ok(())
    }
}
