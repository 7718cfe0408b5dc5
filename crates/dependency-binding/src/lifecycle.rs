//! # Session Lifecycle
//!
//! Host-driven session boundary signal.
//!
//! ```text
//!   EnteredEditing ──▶ ExitingEditing ──▶ EnteredRunning ──▶ ExitingRunning ─┐
//!         ▲                                                                  │
//!         └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host calls [`SessionLifecycle::emit`] from its own lifecycle hooks.
//! Attached [`SessionListener`]s are notified synchronously, in attach order;
//! async observers receive the same events through a broadcast channel.
//! Bindings reset on [`SessionEvent::ExitingRunning`].

use crate::ports::SessionListener;
use crate::DEFAULT_LIFECYCLE_CAPACITY;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, trace};
use uuid::Uuid;

/// Host session transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionEvent {
    EnteredEditing,
    ExitingEditing,
    EnteredRunning,
    ExitingRunning,
}

impl SessionEvent {
    /// Whether this event closes a run, i.e. bindings must reset.
    #[must_use]
    pub fn ends_run(&self) -> bool {
        matches!(self, Self::ExitingRunning)
    }
}

type ListenerList = Vec<(Uuid, Arc<dyn SessionListener>)>;

/// Fan-out point for session events.
pub struct SessionLifecycle {
    /// Broadcast sender for async observers.
    sender: broadcast::Sender<SessionEvent>,

    /// Attached listeners, in attach order.
    listeners: Arc<RwLock<ListenerList>>,

    /// Most recent event emitted.
    last_event: RwLock<Option<SessionEvent>>,

    /// Total events emitted.
    events_emitted: AtomicU64,
}

impl SessionLifecycle {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LIFECYCLE_CAPACITY)
    }

    /// Create a lifecycle whose observer channel buffers `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            listeners: Arc::new(RwLock::new(Vec::new())),
            last_event: RwLock::new(None),
            events_emitted: AtomicU64::new(0),
        }
    }

    /// Attach a listener until the returned handle is dropped.
    #[must_use = "dropping the attachment detaches the listener"]
    pub fn attach(&self, listener: Arc<dyn SessionListener>) -> SessionAttachment {
        let id = Uuid::new_v4();
        self.listeners.write().push((id, listener));
        debug!(listener = %id, "Session listener attached");
        SessionAttachment {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Receive every future event asynchronously.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Deliver `event` to all attached listeners, then to observers.
    ///
    /// Listeners run without the listener lock held, so they may attach or
    /// detach other listeners. Returns the number of listeners notified.
    pub fn emit(&self, event: SessionEvent) -> usize {
        let snapshot: Vec<Arc<dyn SessionListener>> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        *self.last_event.write() = Some(event);
        self.events_emitted.fetch_add(1, Ordering::Relaxed);

        for listener in &snapshot {
            listener.on_session_event(event);
        }

        match self.sender.send(event) {
            Ok(observers) => trace!(?event, observers, "Session event broadcast"),
            Err(_) => trace!(?event, "Session event had no observers"),
        }

        debug!(?event, listeners = snapshot.len(), "Session event emitted");
        snapshot.len()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }

    #[must_use]
    pub fn last_event(&self) -> Option<SessionEvent> {
        *self.last_event.read()
    }

    #[must_use]
    pub fn events_emitted(&self) -> u64 {
        self.events_emitted.load(Ordering::Relaxed)
    }
}

impl Default for SessionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a listener attached to a [`SessionLifecycle`].
///
/// When dropped, the listener is detached. Outliving the lifecycle is fine.
pub struct SessionAttachment {
    id: Uuid,
    listeners: Weak<RwLock<ListenerList>>,
}

impl SessionAttachment {
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the lifecycle this attachment belongs to still exists.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.listeners.strong_count() > 0
    }
}

impl Drop for SessionAttachment {
    fn drop(&mut self) {
        let Some(listeners) = self.listeners.upgrade() else {
            return;
        };
        listeners.write().retain(|(id, _)| *id != self.id);
        debug!(listener = %self.id, "Session listener detached");
    }
}
