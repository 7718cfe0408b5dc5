//! Domain Layer
//!
//! Pure binding logic: type tags, conformance and the slot state machine.
//! Nothing here locks, logs or performs I/O.

pub mod binding_type;
pub mod slot;
pub mod type_catalog;

use std::sync::Arc;

pub use binding_type::{downcast_arc, AsAny, Bindable, BindingType};
pub use slot::{Fanout, Registration, SlotCallback, SlotState, TypedSlot};
pub use type_catalog::TypeCatalog;

/// Callback receiving a bound dependency.
pub type BindingCallback = SlotCallback<Arc<dyn Bindable>>;
