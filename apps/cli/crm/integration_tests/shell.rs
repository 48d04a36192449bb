use crm::shell::CrmShell;

use client_core::session::{FileSessionStore, Session};
use client_core::{CrmClient, RouteName};

use common::SessionToken;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Integration tests for the shell over a mocked CRM backend
// ============================================================================

fn shell_for(server: &MockServer, session: Session) -> CrmShell {
    let client = CrmClient::with_base_url(
        &format!("{}/api", server.uri()),
        Duration::from_secs(5),
        session,
    )
    .expect("Failed to build client");
    CrmShell::new(client)
}

fn signed_in(token: &str) -> Session {
    let session = Session::in_memory();
    session
        .establish(SessionToken::new(token))
        .expect("Failed to store token");
    session
}

/// **VALUE**: Logging in lands on the dashboard with its statistics loaded.
///
/// **WHY THIS MATTERS**: This is the first thing every user does. The guard must
/// turn the visit to `/` into the dashboard once a token exists, and the
/// dashboard request must already carry the new token.
///
/// **BUG THIS CATCHES**: Would catch a shell that opens `/` before the session is
/// established, leaving the user on the login view.
#[tokio::test]
async fn given_valid_credentials_when_login_then_dashboard_is_loaded() {
    // GIVEN: A backend accepting the login and serving dashboard stats
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh-token",
            "username": "admin",
            "role": "admin"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard-stats"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "companies": 12 })))
        .mount(&server)
        .await;
    let mut shell = shell_for(&server, Session::in_memory());

    // WHEN: Logging in
    let (token, view) = shell.login("admin", "secret").await.unwrap();

    // THEN: The dashboard is shown with its data
    assert_eq!(token.username, "admin");
    assert_eq!(view.path, "/app/dashboard");
    assert_eq!(view.route, Some(RouteName::Dashboard.as_str()));
    assert_eq!(view.redirected_from.as_deref(), Some("/"));
    assert_eq!(view.data, Some(json!({ "companies": 12 })));
}

/// **VALUE**: A stale token sends the user back to the login view.
///
/// **WHY THIS MATTERS**: Token presence is all the guard checks, so a protected
/// view opens with an expired token. The 401 from its first request is the
/// only thing that ends the session.
///
/// **BUG THIS CATCHES**: Would catch a shell that surfaces the 401 as a failure
/// without following the redirect, or a client that keeps the token.
#[tokio::test]
async fn given_stale_token_when_opening_protected_view_then_login_view_is_shown() {
    // GIVEN: A backend rejecting every request
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let session = signed_in("stale");
    let mut shell = shell_for(&server, session.clone());

    // WHEN: Opening the companies list
    let view = shell.open("/app/companies").await.unwrap();

    // THEN: The login view, explaining where the user came from
    assert_eq!(view.path, "/");
    assert_eq!(view.route, Some(RouteName::Login.as_str()));
    assert_eq!(view.redirected_from.as_deref(), Some("/app/companies"));
    assert!(view.notice.is_some());
    assert!(view.data.is_none());

    // AND: The token is gone
    assert!(session.token().unwrap().is_none());
    assert_eq!(shell.navigator().history_len(), 1);
}

/// **VALUE**: Without a token, protected views never reach the backend.
///
/// **WHY THIS MATTERS**: The guard runs before the view loads. Sending the
/// request anyway would leak a pointless unauthenticated call per navigation.
#[tokio::test]
async fn given_no_token_when_opening_protected_view_then_no_request_is_sent() {
    // GIVEN: No session
    let server = MockServer::start().await;
    let mut shell = shell_for(&server, Session::in_memory());

    // WHEN: Opening the orders view
    let view = shell.open("/app/orders").await.unwrap();

    // THEN: Redirected to login, backend untouched
    assert_eq!(view.path, "/");
    assert_eq!(view.redirected_from.as_deref(), Some("/app/orders"));
    let received = server.received_requests().await.unwrap();
    assert!(received.is_empty(), "Unexpected requests: {received:?}");
}

/// **VALUE**: Route params reach the backend resource path.
///
/// **BUG THIS CATCHES**: Would catch a view mapping that ignores `:id`.
#[tokio::test]
async fn given_user_profile_path_when_opened_then_profile_resource_is_fetched() {
    // GIVEN: A signed-in session and a profile endpoint
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/7/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;
    let mut shell = shell_for(&server, signed_in("token"));

    // WHEN: Opening the profile
    let view = shell.open("/app/users/7").await.unwrap();

    // THEN: The profile data is shown
    assert_eq!(view.route, Some(RouteName::UserProfile.as_str()));
    assert_eq!(view.data, Some(json!({ "id": 7 })));
}

/// **VALUE**: Server failures are reported and do not move the user.
///
/// **WHY THIS MATTERS**: A 5xx says nothing about the session. Logging the user
/// out on a backend outage would lose their place for no reason.
#[tokio::test]
async fn given_server_error_when_opening_view_then_error_is_returned_and_session_kept() {
    // GIVEN: A failing backend
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let session = signed_in("token");
    let mut shell = shell_for(&server, session.clone());

    // WHEN: Opening the calls view
    let result = shell.open("/app/calls").await;

    // THEN: The error comes back, the session and location stay
    assert!(result.is_err());
    assert!(session.token().unwrap().is_some());
    assert_eq!(shell.navigator().current().unwrap().path, "/app/calls");
}

/// **VALUE**: Logout ends the local session even when the server call fails.
///
/// **BUG THIS CATCHES**: Would catch a logout that returns early on the server
/// error and leaves the token on disk.
#[tokio::test]
async fn given_failing_logout_endpoint_when_logout_then_session_is_cleared_and_error_returned() {
    // GIVEN: A logout endpoint that fails
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let session = signed_in("token");
    let mut shell = shell_for(&server, session.clone());

    // WHEN: Logging out
    let result = shell.logout().await;

    // THEN: The failure is reported but the token is gone
    assert!(result.is_err());
    assert!(session.token().unwrap().is_none());
}

/// **VALUE**: A login persists across shell runs through the file store.
///
/// **WHY THIS MATTERS**: Each `crm` command is a new process. Without the file
/// store every command after `login` would be bounced to the login view.
#[tokio::test]
async fn given_login_in_one_shell_when_new_shell_opens_view_then_token_is_reused() {
    // GIVEN: A backend with login and products
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "persisted",
            "username": "sara",
            "role": "user"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard-stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .and(header("authorization", "Bearer persisted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let data_dir = tempfile::tempdir().unwrap();

    let file_session = || Session::new(Arc::new(FileSessionStore::new(data_dir.path())));

    // WHEN: Logging in with one shell, then opening products with another
    let mut first = shell_for(&server, file_session());
    first.login("sara", "secret").await.unwrap();
    drop(first);

    let mut second = shell_for(&server, file_session());
    let view = second.open("/app/products").await.unwrap();

    // THEN: The second shell is signed in
    assert_eq!(view.path, "/app/products");
    assert_eq!(view.data, Some(json!([])));
}
