// Unit tests for the Session manager

use crate::error::session::SessionError;
use crate::session::{MemorySessionStore, Session, SessionEvent, SessionStore};

use common::{ErrorLocation, SessionToken};

use std::panic::Location;
use std::sync::Arc;

struct BrokenStore;

impl SessionStore for BrokenStore {
    fn get(&self) -> Result<Option<SessionToken>, SessionError> {
        Err(SessionError::Poisoned {
            message: "broken".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn set(&self, _token: &SessionToken) -> Result<(), SessionError> {
        self.get().map(|_| ())
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.get().map(|_| ())
    }
}

#[test]
fn given_established_session_when_token_read_then_returns_token() {
    let session = Session::in_memory();

    session.establish(SessionToken::new("abc")).unwrap();

    assert!(session.is_authenticated());
    assert_eq!(session.token().unwrap().unwrap().expose(), "abc");
}

/// **VALUE**: Verifies invalidating an already-empty session is a harmless no-op.
///
/// **WHY THIS MATTERS**: Concurrent 401s each clear the token. The second clear finds nothing
/// and must not fail, or the caller would see a storage error instead of the 401.
#[test]
fn given_no_token_when_invalidated_twice_then_both_succeed() {
    let session = Session::in_memory();

    assert!(session.invalidate().is_ok());
    assert!(session.invalidate().is_ok());
    assert!(!session.is_authenticated());
}

#[test]
fn given_subscriber_when_session_established_and_invalidated_then_receives_both_events() {
    let session = Session::in_memory();
    let mut rx = session.subscribe();

    session.establish(SessionToken::new("abc")).unwrap();
    assert!(session.invalidate().unwrap());

    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Established);
    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
}

/// **VALUE**: Verifies an unreadable store means "signed out" for the guard.
#[test]
fn given_broken_store_when_is_authenticated_then_false() {
    let session = Session::new(Arc::new(BrokenStore));

    assert!(!session.is_authenticated());
    assert!(session.token().is_err());
}

/// **VALUE**: Verifies the invalidation event is published even if the store fails to clear.
///
/// **BUG THIS CATCHES**: Would catch a `?` placed before the publish, which would leave the user
/// on a protected view after a 401 just because storage misbehaved.
#[test]
fn given_broken_store_when_invalidated_then_event_still_published() {
    let session = Session::new(Arc::new(BrokenStore));
    let mut rx = session.subscribe();

    let result = session.invalidate();

    assert!(result.is_err());
    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
}

/// **VALUE**: Verifies a token written behind the session's back re-arms invalidation.
///
/// **WHY THIS MATTERS**: The file store is shared between processes. A login in another
/// process writes a token without calling `establish` here; the next 401 must still be
/// announced or the navigator stays on a protected view with no token.
///
/// **BUG THIS CATCHES**: Would catch a latch that only `establish` resets.
#[test]
fn given_token_written_directly_to_store_when_read_then_next_invalidation_publishes() {
    let store = Arc::new(MemorySessionStore::new());
    let session = Session::new(store.clone());
    let mut rx = session.subscribe();

    assert!(session.invalidate().unwrap());
    store.set(&SessionToken::new("from-elsewhere")).unwrap();

    assert!(session.token().unwrap().is_some());
    assert!(session.invalidate().unwrap());

    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
}

/// **VALUE**: Verifies reading an empty store does not re-arm the latch.
#[test]
fn given_no_token_when_read_after_invalidation_then_latch_stays_set() {
    let session = Session::in_memory();

    assert!(session.invalidate().unwrap());
    assert!(session.token().unwrap().is_none());
    assert!(!session.invalidate().unwrap());
}
