// Unit tests for the navigator: guard redirects, history and session events

use crate::error::router::RouterError;
use crate::router::{NavigationMode, Navigator, RouteName, RouteRecord, RouteTable};
use crate::session::{MemorySessionStore, Session, SessionEvent, SessionStore};

use common::SessionToken;

use std::sync::Arc;

fn signed_in() -> Session {
    let session = Session::in_memory();
    session.establish(SessionToken::new("abc")).unwrap();
    session
}

/// **VALUE**: Verifies a signed-out visit to a protected view ends on the login route.
#[test]
fn given_no_token_when_push_protected_route_then_lands_on_login() {
    let mut navigator = Navigator::new(RouteTable::default(), Session::in_memory());

    let navigation = navigator.push("/app/users/5").unwrap();

    assert!(navigation.route.is(RouteName::Login));
    assert_eq!(navigation.redirected_from.as_deref(), Some("/app/users/5"));
    assert_eq!(navigator.history_len(), 1);
}

/// **VALUE**: Verifies a signed-in visit to login ends on the dashboard.
#[test]
fn given_token_when_push_login_then_lands_on_dashboard() {
    let mut navigator = Navigator::new(RouteTable::default(), signed_in());

    let navigation = navigator.push("/").unwrap();

    assert!(navigation.route.is(RouteName::Dashboard));
    assert_eq!(navigation.route.path, "/app/dashboard");
}

#[test]
fn given_token_when_push_protected_route_then_proceeds_unmodified() {
    let mut navigator = Navigator::new(RouteTable::default(), signed_in());

    let navigation = navigator.push("/app/calls?day=today").unwrap();

    assert!(navigation.route.is(RouteName::Calls));
    assert_eq!(navigation.redirected_from, None);
    assert_eq!(navigation.mode, NavigationMode::Push);
}

/// **VALUE**: Verifies replace overwrites the current entry instead of stacking one.
#[test]
fn given_history_when_replace_then_length_is_unchanged() {
    let mut navigator = Navigator::new(RouteTable::default(), signed_in());
    navigator.push("/app/dashboard").unwrap();
    navigator.push("/app/orders").unwrap();

    navigator.replace("/app/products").unwrap();

    assert_eq!(navigator.history_len(), 2);
    assert!(navigator.current().unwrap().is(RouteName::Products));
}

/// **VALUE**: Verifies an invalidated session sends the user back to `/` with a replace.
///
/// **WHY THIS MATTERS**: After a 401 the protected view must go away, and pressing back must
/// not bring it back. Replace keeps the history length, so the protected entry is gone.
#[test]
fn given_protected_view_when_session_invalidated_then_replaces_with_login() {
    let session = signed_in();
    let mut navigator = Navigator::new(RouteTable::default(), session.clone());
    navigator.push("/app/dashboard").unwrap();
    navigator.push("/app/orders").unwrap();

    session.invalidate().unwrap();
    let redirect = navigator.sync_session().unwrap().expect("redirect");

    assert!(redirect.route.is(RouteName::Login));
    assert_eq!(redirect.mode, NavigationMode::Replace);
    assert_eq!(navigator.history_len(), 2);
    assert_eq!(navigator.current().unwrap().path, "/");
}

/// **VALUE**: Verifies no redirect happens when the user is already on `/`.
#[test]
fn given_login_view_when_session_invalidated_then_no_redirect() {
    let session = Session::in_memory();
    let mut navigator = Navigator::new(RouteTable::default(), session.clone());
    navigator.push("/").unwrap();

    let result = navigator.on_session_event(SessionEvent::Invalidated).unwrap();

    assert_eq!(result, None);
    assert_eq!(navigator.history_len(), 1);
}

#[test]
fn given_established_event_when_handled_then_no_navigation() {
    let mut navigator = Navigator::new(RouteTable::default(), signed_in());
    navigator.push("/app/admin").unwrap();

    assert_eq!(navigator.on_session_event(SessionEvent::Established).unwrap(), None);
}

/// **VALUE**: Verifies going back re-runs the guard.
///
/// **BUG THIS CATCHES**: Would catch back() restoring a protected entry after the token was
/// dropped by some other path (e.g. logout in another window).
#[test]
fn given_token_dropped_when_back_to_protected_entry_then_guard_redirects() {
    let store = Arc::new(MemorySessionStore::with_token(SessionToken::new("abc")));
    let mut navigator = Navigator::new(RouteTable::default(), Session::new(store.clone()));
    navigator.push("/app/users").unwrap();
    navigator.push("/missing-page").unwrap();

    store.clear().unwrap();
    let navigation = navigator.back().unwrap().expect("back navigation");

    assert!(navigation.route.is(RouteName::Login));
    assert_eq!(navigator.history_len(), 1);
}

#[test]
fn given_single_entry_when_back_then_nothing_happens() {
    let mut navigator = Navigator::new(RouteTable::default(), Session::in_memory());
    navigator.push("/").unwrap();

    assert_eq!(navigator.back().unwrap(), None);
}

/// **VALUE**: Verifies a table whose guard redirects forever fails instead of spinning.
#[test]
fn given_login_route_that_requires_auth_when_signed_out_then_redirect_loop_error() {
    let table = RouteTable::new(vec![
        RouteRecord::new("/", RouteName::Login).requires_auth(),
    ]);
    let mut navigator = Navigator::new(table, Session::in_memory());

    let result = navigator.push("/");

    assert!(matches!(result, Err(RouterError::RedirectLoop { .. })));
    assert!(navigator.current().is_none());
}

#[test]
fn given_table_without_catch_all_when_push_unknown_then_no_match_error() {
    let table = RouteTable::new(vec![RouteRecord::new("/", RouteName::Login)]);
    let mut navigator = Navigator::new(table, Session::in_memory());

    assert!(matches!(navigator.push("/x"), Err(RouterError::NoMatch { .. })));
}
