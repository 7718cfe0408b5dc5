//! Binding type tags and the bound-value capability

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Name of a bindable type.
///
/// Tags are compared by name. Conformance between tags is decided by a
/// [`TypeCatalog`](super::TypeCatalog) built at configuration time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingType(Cow<'static, str>);

impl BindingType {
    /// The capability every [`Bindable`] value satisfies.
    pub const ROOT: BindingType = BindingType(Cow::Borrowed("Bindable"));

    /// Create a tag from a type name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The tag's name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is [`BindingType::ROOT`].
    #[must_use]
    pub fn is_root(&self) -> bool {
        *self == Self::ROOT
    }
}

impl fmt::Display for BindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for BindingType {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for BindingType {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Upcasting helpers, implemented for every `Any + Send + Sync` type.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A value that can be bound into a dependency slot.
///
/// `binding_type` names the value's concrete type; a binding accepts the
/// value when that tag conforms to the binding's expected type.
pub trait Bindable: AsAny + fmt::Debug {
    fn binding_type(&self) -> BindingType;
}

impl dyn Bindable {
    /// Borrow the value as its concrete type.
    pub fn downcast_ref<T: Bindable>(&self) -> Option<&T> {
        <dyn Bindable as AsAny>::as_any(self).downcast_ref::<T>()
    }

    /// Whether the value is a `T`.
    pub fn is<T: Bindable>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

/// Recover a shared handle to the concrete type.
///
/// Returns `None` if the value is not a `T`.
pub fn downcast_arc<T: Bindable>(value: Arc<dyn Bindable>) -> Option<Arc<T>> {
    <dyn Bindable as AsAny>::into_any(value).downcast::<T>().ok()
}
