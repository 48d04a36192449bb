//! Session state shared by the HTTP client and the navigator.
//!
//! The only state in the client is the session token. [`Session`] wraps the
//! store behind one handle so that both the request interceptor and the
//! navigation guard read the same value, and so that tests can swap in an
//! in-memory store.
//!
//! Token presence is the whole authentication check. Nothing here looks at
//! expiry; the backend's 401 is what ends a session.

pub mod events;
pub mod store;

pub use events::{SessionEvent, SessionEvents};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use crate::error::session::SessionError;

use common::SessionToken;

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    events: SessionEvents,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            events: SessionEvents::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    /// The stored token. An empty stored value counts as absent.
    ///
    /// Seeing a token re-arms the invalidation latch: the store may be shared
    /// with other processes, so a token can reappear without `establish`.
    pub fn token(&self) -> Result<Option<SessionToken>, SessionError> {
        let token = self.store.get()?.filter(|token| !token.is_empty());
        if token.is_some() && self.events.rearm() {
            debug!("Token present again, invalidation re-armed");
        }
        Ok(token)
    }

    /// Presence check used by the navigation guard.
    ///
    /// A store that cannot be read is treated as "no token".
    pub fn is_authenticated(&self) -> bool {
        match self.token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!("Session store unreadable, treating as signed out: {e}");
                false
            }
        }
    }

    pub fn establish(&self, token: SessionToken) -> Result<(), SessionError> {
        self.store.set(&token)?;
        self.events.publish_established();
        info!("Session established ({} char token)", token.len());
        Ok(())
    }

    /// Drop the stored token and announce it.
    ///
    /// Returns whether this call published [`SessionEvent::Invalidated`]. The
    /// event goes out even if clearing the store failed.
    pub fn invalidate(&self) -> Result<bool, SessionError> {
        let cleared = self.store.clear();
        let published = self.events.publish_invalidated();
        cleared.map(|_| published)
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
