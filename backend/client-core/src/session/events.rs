//! Session lifecycle notifications.
//!
//! The HTTP client publishes, the navigator consumes. `Invalidated` is
//! latched: however many requests fail with 401 at the same time, subscribers
//! see it once until a token is seen again (a login here, or one written to
//! the shared store by another process).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A token was stored after a successful login.
    Established,
    /// The stored token was dropped (401 or logout).
    Invalidated,
}

#[derive(Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
    invalidated: Arc<AtomicBool>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            sender,
            invalidated: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Re-arms the invalidation latch.
    pub fn publish_established(&self) {
        self.invalidated.store(false, Ordering::SeqCst);
        self.send(SessionEvent::Established);
    }

    /// Re-arm the invalidation latch without announcing anything.
    ///
    /// Returns `true` if the latch was set.
    pub fn rearm(&self) -> bool {
        self.invalidated.swap(false, Ordering::SeqCst)
    }

    /// Returns `true` if this call published the event, `false` if the
    /// session was already invalidated.
    pub fn publish_invalidated(&self) -> bool {
        if self.invalidated.swap(true, Ordering::SeqCst) {
            debug!("Session already invalidated, suppressing duplicate event");
            return false;
        }

        self.send(SessionEvent::Invalidated);
        true
    }

    fn send(&self, event: SessionEvent) {
        // No subscribers is fine, nothing is navigating
        if self.sender.send(event).is_err() {
            debug!("No subscribers for {event:?}");
        }
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}
