// Unit tests for the session event latch

use crate::session::{SessionEvent, SessionEvents};

use tokio::sync::broadcast::error::TryRecvError;

/// **VALUE**: Verifies concurrent invalidations publish exactly one event.
///
/// **WHY THIS MATTERS**: A view that fires several requests at once gets several 401s when the
/// token expires. Each one calls invalidate; the navigator must redirect only once.
#[test]
fn given_repeated_invalidation_when_published_then_only_first_is_delivered() {
    let events = SessionEvents::new();
    let mut rx = events.subscribe();

    assert!(events.publish_invalidated());
    assert!(!events.publish_invalidated());
    assert!(!events.publish_invalidated());

    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

/// **VALUE**: Verifies a new login re-arms the latch.
#[test]
fn given_established_after_invalidation_when_invalidated_again_then_publishes() {
    let events = SessionEvents::new();
    let mut rx = events.subscribe();

    events.publish_invalidated();
    events.publish_established();
    assert!(events.publish_invalidated());

    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Established);
    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
}

/// **VALUE**: Verifies `rearm` resets the latch silently and reports whether it was set.
#[test]
fn given_invalidated_latch_when_rearmed_then_next_invalidation_publishes_without_extra_event() {
    let events = SessionEvents::new();
    let mut rx = events.subscribe();

    assert!(!events.rearm(), "Fresh latch is not set");
    events.publish_invalidated();
    assert!(events.rearm());
    assert!(events.publish_invalidated());

    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn given_no_subscribers_when_published_then_does_not_fail() {
    let events = SessionEvents::new();

    assert!(events.publish_invalidated());
    events.publish_established();
}

#[test]
fn given_cloned_events_when_invalidated_from_clone_then_latch_is_shared() {
    let events = SessionEvents::new();
    let clone = events.clone();

    assert!(clone.publish_invalidated());
    assert!(!events.publish_invalidated());
}
