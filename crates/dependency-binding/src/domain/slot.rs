//! Single-assignment slot state machine
//!
//! ```text
//!            bind(v)                 bind(_)  (rejected)
//!   ┌───────┐ ──────▶ ┌───────┐ ◀──────┐
//!   │ Empty │         │ Bound │ ───────┘
//!   └───────┘ ◀────── └───────┘
//!       ▲      reset
//!       └──── reset (no-op)
//! ```
//!
//! `TypedSlot` never invokes callbacks itself. `bind` and `subscribe` hand
//! back the callbacks that are due so the caller can run them after releasing
//! whatever lock guards the slot.

use std::fmt;

/// Callback receiving the bound value.
pub type SlotCallback<V> = Box<dyn FnOnce(V) + Send + 'static>;

/// Observable state of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Bound,
}

/// Callbacks released by a successful `bind`.
pub struct Fanout<V> {
    /// Epoch the value was bound in.
    pub epoch: u64,
    /// The bound value.
    pub value: V,
    /// Pending callbacks, in registration order.
    pub callbacks: Vec<SlotCallback<V>>,
}

/// Outcome of `subscribe`.
pub enum Registration<V> {
    /// The slot is empty; the callback was queued.
    Deferred,
    /// The slot is bound; the caller must invoke `callback` with `value`.
    Immediate {
        callback: SlotCallback<V>,
        value: V,
    },
}

/// Holds at most one value per epoch plus the callbacks waiting for it.
pub struct TypedSlot<V> {
    value: Option<V>,
    pending: Vec<SlotCallback<V>>,
    epoch: u64,
}

impl<V: Clone> TypedSlot<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: None,
            pending: Vec::new(),
            epoch: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> SlotState {
        if self.value.is_some() {
            SlotState::Bound
        } else {
            SlotState::Empty
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of resets since creation.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Store `value` and release the pending callbacks.
    ///
    /// # Errors
    ///
    /// Returns the rejected value if the slot is already bound. The slot is
    /// left untouched.
    pub fn bind(&mut self, value: V) -> Result<Fanout<V>, V> {
        if self.value.is_some() {
            return Err(value);
        }
        self.value = Some(value.clone());
        Ok(Fanout {
            epoch: self.epoch,
            value,
            callbacks: std::mem::take(&mut self.pending),
        })
    }

    /// Queue `callback`, or hand it back with the value if already bound.
    pub fn subscribe(&mut self, callback: SlotCallback<V>) -> Registration<V> {
        match &self.value {
            Some(value) => Registration::Immediate {
                callback,
                value: value.clone(),
            },
            None => {
                self.pending.push(callback);
                Registration::Deferred
            }
        }
    }

    /// Clear the value, drop pending callbacks and start a new epoch.
    ///
    /// Returns the number of callbacks dropped without invocation.
    pub fn reset(&mut self) -> usize {
        let dropped = self.pending.len();
        self.value = None;
        self.pending.clear();
        self.epoch = self.epoch.wrapping_add(1);
        dropped
    }
}

impl<V: Clone> Default for TypedSlot<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for TypedSlot<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSlot")
            .field("value", &self.value)
            .field("pending", &self.pending.len())
            .field("epoch", &self.epoch)
            .finish()
    }
}
