//! Session listener port

use crate::lifecycle::SessionEvent;

/// Something that reacts to host session-boundary events.
///
/// Called synchronously from [`SessionLifecycle::emit`](crate::SessionLifecycle::emit),
/// without any lifecycle lock held.
pub trait SessionListener: Send + Sync {
    fn on_session_event(&self, event: SessionEvent);
}
