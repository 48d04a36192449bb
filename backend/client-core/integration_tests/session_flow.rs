//! End-to-end flow: navigator + client sharing one session.

use client_core::session::{FileSessionStore, Session, SessionStore};
use client_core::{CrmClient, Navigator, RouteName, RouteTable};

use common::SessionToken;

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn wire(server: &MockServer, session: &Session) -> (CrmClient, Navigator) {
    let client = CrmClient::with_base_url(
        &format!("{}/api", server.uri()),
        Duration::from_secs(5),
        session.clone(),
    )
    .unwrap();
    let navigator = Navigator::new(RouteTable::default(), session.clone());
    (client, navigator)
}

/// **VALUE**: Verifies the whole 401 path: protected view -> 401 -> token gone -> back on `/`.
///
/// **WHY THIS MATTERS**: This is the only mechanism that evicts a stale token. The guard lets
/// the view open on token presence alone; the first API call must bring the user back.
#[tokio::test]
async fn given_stale_token_on_protected_view_when_api_returns_401_then_redirected_to_login_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let session = Session::in_memory();
    session.establish(SessionToken::new("stale")).unwrap();
    let (client, mut navigator) = wire(&server, &session);

    // Guard lets the view open: presence is enough
    let opened = navigator.push("/app/companies").unwrap();
    assert!(opened.route.is(RouteName::Companies));

    // Two requests from the view both fail
    let (a, b) = tokio::join!(client.get::<Value>("/companies"), client.get::<Value>("/users"));
    assert!(a.unwrap_err().is_unauthorized());
    assert!(b.unwrap_err().is_unauthorized());

    let redirect = navigator.sync_session().unwrap().expect("redirect to login");
    assert!(redirect.route.is(RouteName::Login));
    assert_eq!(navigator.history_len(), 1);

    // Nothing left to handle
    assert_eq!(navigator.sync_session().unwrap(), None);

    // And the guard now keeps the user out
    let retry = navigator.push("/app/companies").unwrap();
    assert!(retry.route.is(RouteName::Login));
}

/// **VALUE**: Verifies a 401 while already on `/` causes no redirect.
#[tokio::test]
async fn given_login_view_when_login_attempt_returns_401_then_no_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let session = Session::in_memory();
    let (client, mut navigator) = wire(&server, &session);
    navigator.push("/").unwrap();

    assert!(client.login("admin", "nope").await.is_err());

    assert_eq!(navigator.sync_session().unwrap(), None);
    assert_eq!(navigator.current().unwrap().path, "/");
}

/// **VALUE**: Verifies 5xx errors never move the user.
#[tokio::test]
async fn given_protected_view_when_api_returns_500_then_stays_on_view() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let session = Session::in_memory();
    session.establish(SessionToken::new("good")).unwrap();
    let (client, mut navigator) = wire(&server, &session);
    navigator.push("/app/orders").unwrap();

    assert!(client.get::<Value>("/orders").await.is_err());

    assert_eq!(navigator.sync_session().unwrap(), None);
    assert!(navigator.current().unwrap().is(RouteName::Orders));
}

/// **VALUE**: Verifies login followed by a visit to `/` lands on the dashboard, and a later
/// 401 triggers a second redirect (the latch re-arms on login).
#[tokio::test]
async fn given_login_then_expiry_when_navigating_then_guard_and_latch_cooperate() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "t1", "username": "admin", "role": "admin"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard-stats"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let session = Session::in_memory();
    let (client, mut navigator) = wire(&server, &session);
    navigator.push("/").unwrap();

    // First session
    client.login("admin", "pw").await.unwrap();
    assert_eq!(navigator.sync_session().unwrap(), None);
    assert!(navigator.push("/").unwrap().route.is(RouteName::Dashboard));
    assert!(client.get::<Value>("/dashboard-stats").await.is_err());
    assert!(navigator.sync_session().unwrap().is_some());

    // Second session
    client.login("admin", "pw").await.unwrap();
    navigator.push("/app/dashboard").unwrap();
    assert!(client.get::<Value>("/dashboard-stats").await.is_err());
    assert!(navigator.sync_session().unwrap().is_some());
    assert_eq!(navigator.current().unwrap().path, "/");
}

/// **VALUE**: Verifies a token written by another process still gets the 401 redirect.
///
/// **WHY THIS MATTERS**: `crm` processes share `storage.json`. After one 401 here, another
/// process signs in and writes a fresh token. When that token also expires, this navigator
/// must leave the protected view again.
///
/// **BUG THIS CATCHES**: Would catch an invalidation latch that only a local login re-arms,
/// leaving the user on `/app/users` with no token.
#[tokio::test]
async fn given_token_rewritten_by_other_process_when_second_401_then_redirected_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let shared_dir = tempfile::tempdir().unwrap();
    let other_process = FileSessionStore::new(shared_dir.path());
    other_process.set(&SessionToken::new("first")).unwrap();

    let session = Session::new(Arc::new(FileSessionStore::new(shared_dir.path())));
    let (client, mut navigator) = wire(&server, &session);

    // First expiry
    assert!(navigator.push("/app/users").unwrap().route.is(RouteName::Users));
    assert!(client.get::<Value>("/users").await.unwrap_err().is_unauthorized());
    let first = navigator.sync_session().unwrap().expect("first redirect");
    assert_eq!(first.route.path, "/");

    // Another process signs in
    other_process.set(&SessionToken::new("second")).unwrap();
    assert!(navigator.push("/app/users").unwrap().route.is(RouteName::Users));

    // Second expiry
    assert!(client.get::<Value>("/users").await.unwrap_err().is_unauthorized());
    assert!(session.token().unwrap().is_none());
    let second = navigator.sync_session().unwrap().expect("second redirect");
    assert_eq!(second.route.path, "/");
    assert_eq!(navigator.current().unwrap().path, "/");
}
