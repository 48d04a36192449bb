// Unit tests for the navigation guard rule

use crate::router::guard::{GuardDecision, NavigationGuard, evaluate};
use crate::router::{RouteName, RouteTable};
use crate::session::Session;

use common::SessionToken;

/// **VALUE**: Verifies the full decision table of the guard.
///
/// **WHY THIS MATTERS**: This rule is the whole client-side access control. Each row is one of
/// the three branches: protected without token, login with token, everything else.
#[test]
fn given_route_and_token_presence_when_evaluated_then_follows_guard_rules() {
    let table = RouteTable::default();
    let dashboard = table.resolve("/app/dashboard").unwrap();
    let login = table.resolve("/").unwrap();
    let missing = table.resolve("/missing").unwrap();

    assert_eq!(evaluate(&dashboard, false), GuardDecision::Redirect(RouteName::Login));
    assert_eq!(evaluate(&dashboard, true), GuardDecision::Proceed);
    assert_eq!(evaluate(&login, true), GuardDecision::Redirect(RouteName::Dashboard));
    assert_eq!(evaluate(&login, false), GuardDecision::Proceed);
    assert_eq!(evaluate(&missing, false), GuardDecision::Proceed);
    assert_eq!(evaluate(&missing, true), GuardDecision::Proceed);
}

/// **VALUE**: Verifies the guard reads token presence from the shared session.
#[test]
fn given_session_when_token_changes_then_guard_decision_follows() {
    let session = Session::in_memory();
    let guard = NavigationGuard::new(session.clone());
    let orders = RouteTable::default().resolve("/app/orders").unwrap();

    assert_eq!(guard.before_each(&orders), GuardDecision::Redirect(RouteName::Login));

    session.establish(SessionToken::new("t0k3n")).unwrap();
    assert_eq!(guard.before_each(&orders), GuardDecision::Proceed);

    session.invalidate().unwrap();
    assert_eq!(guard.before_each(&orders), GuardDecision::Redirect(RouteName::Login));
}

/// **VALUE**: Verifies an empty stored token counts as signed out.
#[test]
fn given_empty_token_when_guarded_then_treated_as_absent() {
    let session = Session::in_memory();
    session.establish(SessionToken::new("")).unwrap();
    let guard = NavigationGuard::new(session);

    let admin = RouteTable::default().resolve("/app/admin").unwrap();

    assert_eq!(guard.before_each(&admin), GuardDecision::Redirect(RouteName::Login));
}
