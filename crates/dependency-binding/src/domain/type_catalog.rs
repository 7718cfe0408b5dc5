//! Type catalog
//!
//! Records which binding types conform to which others. Types are registered
//! with their direct supertypes; the catalog stores the transitive closure so
//! conformance checks are a single set lookup.
//!
//! Supertypes must be registered before the types that name them, which keeps
//! the relation acyclic.

use super::BindingType;
use crate::error::ConfigError;
use std::collections::{BTreeSet, HashMap};

/// Configuration-time registry of bindable types.
#[derive(Clone, Debug, Default)]
pub struct TypeCatalog {
    /// Type -> every type it conforms to (excluding itself and ROOT).
    ancestors: HashMap<BindingType, BTreeSet<BindingType>>,
}

impl TypeCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ty` as conforming to each of `supertypes`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::DuplicateType` - `ty` is already registered, or is ROOT
    /// - `ConfigError::UnknownSupertype` - a supertype has not been registered
    pub fn register(
        &mut self,
        ty: BindingType,
        supertypes: &[BindingType],
    ) -> Result<(), ConfigError> {
        if ty.is_root() || self.ancestors.contains_key(&ty) {
            return Err(ConfigError::DuplicateType(ty));
        }

        let mut closure = BTreeSet::new();
        for supertype in supertypes {
            if supertype.is_root() {
                continue;
            }
            let Some(inherited) = self.ancestors.get(supertype) else {
                return Err(ConfigError::UnknownSupertype {
                    ty,
                    supertype: supertype.clone(),
                });
            };
            closure.extend(inherited.iter().cloned());
            closure.insert(supertype.clone());
        }

        self.ancestors.insert(ty, closure);
        Ok(())
    }

    /// Whether `ty` is registered. ROOT is always known.
    #[must_use]
    pub fn contains(&self, ty: &BindingType) -> bool {
        ty.is_root() || self.ancestors.contains_key(ty)
    }

    /// Whether a value of type `actual` may fill a slot expecting `expected`.
    ///
    /// Unregistered types conform only to themselves and to ROOT.
    #[must_use]
    pub fn conforms(&self, actual: &BindingType, expected: &BindingType) -> bool {
        if actual == expected || expected.is_root() {
            return true;
        }
        self.ancestors
            .get(actual)
            .is_some_and(|ancestors| ancestors.contains(expected))
    }

    /// Registered types that conform to `expected`, sorted by name.
    #[must_use]
    pub fn assignable_to(&self, expected: &BindingType) -> Vec<BindingType> {
        let mut types: Vec<BindingType> = self
            .ancestors
            .keys()
            .filter(|ty| self.conforms(ty, expected))
            .cloned()
            .collect();
        types.sort();
        types
    }

    /// Number of registered types (excluding ROOT).
    #[must_use]
    pub fn len(&self) -> usize {
        self.ancestors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ancestors.is_empty()
    }
}
