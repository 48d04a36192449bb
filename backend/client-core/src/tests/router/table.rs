// Unit tests for route matching

use crate::error::router::RouterError;
use crate::router::{RouteName, RouteRecord, RouteTable};

/// **VALUE**: Verifies every CRM view path resolves to its named route with the auth marker.
///
/// **WHY THIS MATTERS**: The guard only sees `requires_auth` on the matched route. If a child
/// route stopped inheriting the marker from the `/app` layout, its view would open without a
/// session.
#[test]
fn given_app_paths_when_resolved_then_are_named_and_protected() {
    let table = RouteTable::default();

    let cases = [
        ("/app/dashboard", RouteName::Dashboard),
        ("/app/users", RouteName::Users),
        ("/app/users/17", RouteName::UserProfile),
        ("/app/companies", RouteName::Companies),
        ("/app/companies/4", RouteName::CompanyProfile),
        ("/app/calls", RouteName::Calls),
        ("/app/followups", RouteName::Followups),
        ("/app/orders", RouteName::Orders),
        ("/app/products", RouteName::Products),
        ("/app/admin", RouteName::Admin),
    ];

    for (path, name) in cases {
        let route = table.resolve(path).unwrap();
        assert_eq!(route.name, Some(name), "{path}");
        assert!(route.requires_auth, "{path} must require auth");
    }
}

#[test]
fn given_root_when_resolved_then_is_unprotected_login() {
    let route = RouteTable::default().resolve("/").unwrap();

    assert!(route.is(RouteName::Login));
    assert!(!route.requires_auth);
}

/// **VALUE**: Verifies unknown paths fall through to the unprotected not-found route.
///
/// **BUG THIS CATCHES**: Would catch the catch-all being placed under the layout (and so
/// bouncing signed-out users to login instead of showing not-found).
#[test]
fn given_unknown_path_when_resolved_then_matches_unprotected_not_found() {
    let table = RouteTable::default();

    for path in ["/nope", "/app/dashboard/extra", "/apps", "/app/users/1/calls"] {
        let route = table.resolve(path).unwrap();
        assert!(route.is(RouteName::NotFound), "{path}");
        assert!(!route.requires_auth, "{path}");
    }

    let route = table.resolve("/a/b/c").unwrap();
    assert_eq!(route.param("pathMatch"), Some("a/b/c"));
}

#[test]
fn given_profile_path_when_resolved_then_captures_id_param() {
    let route = RouteTable::default().resolve("/app/companies/42").unwrap();

    assert_eq!(route.param("id"), Some("42"));
}

/// **VALUE**: Verifies query strings, fragments and trailing slashes do not affect matching.
#[test]
fn given_path_with_query_and_trailing_slash_when_resolved_then_matches_same_route() {
    let table = RouteTable::default();

    let route = table.resolve("/app/users/?page=2#top").unwrap();

    assert!(route.is(RouteName::Users));
    assert_eq!(route.path, "/app/users");
    assert_eq!(route.full_path, "/app/users/?page=2#top");
}

/// **VALUE**: Verifies the bare layout path is protected too.
#[test]
fn given_layout_path_when_resolved_then_is_unnamed_and_protected() {
    let route = RouteTable::default().resolve("/app").unwrap();

    assert_eq!(route.name, None);
    assert!(route.requires_auth);
}

#[test]
fn given_named_route_when_path_for_then_builds_concrete_path() {
    let table = RouteTable::default();

    assert_eq!(table.path_for(RouteName::Login, &[]).unwrap(), "/");
    assert_eq!(
        table.path_for(RouteName::Dashboard, &[]).unwrap(),
        "/app/dashboard"
    );
    assert_eq!(
        table.path_for(RouteName::UserProfile, &[("id", "9")]).unwrap(),
        "/app/users/9"
    );
}

#[test]
fn given_missing_param_when_path_for_then_returns_missing_param_error() {
    let result = RouteTable::default().path_for(RouteName::CompanyProfile, &[]);

    assert!(matches!(result, Err(RouterError::MissingParam { .. })));
}

#[test]
fn given_table_without_route_when_path_for_then_returns_unknown_route_error() {
    let table = RouteTable::new(vec![RouteRecord::new("/", RouteName::Login)]);

    let result = table.path_for(RouteName::Dashboard, &[]);

    assert!(matches!(result, Err(RouterError::UnknownRoute { .. })));
    assert!(table.resolve("/elsewhere").is_none());
}

#[test]
fn given_default_table_when_templates_listed_then_catch_all_is_last() {
    let table = RouteTable::default();
    let templates: Vec<_> = table.templates().collect();

    assert_eq!(templates.first().map(|t| t.0), Some("/"));
    assert_eq!(templates.last().map(|t| t.0), Some("*"));
    assert!(templates.iter().any(|t| t.0 == "/app/users/:id" && t.2));
}
