use crate::api_client::helpers::{TEST_TOKEN, client_for, signed_in_session};

use client_core::error::{ApiError, SessionError};
use client_core::session::{FileSessionStore, Session, SessionEvent, SessionStore};

use common::{ErrorLocation, SessionToken};

use std::panic::Location;
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies a successful login stores the returned token and announces the session.
#[tokio::test]
async fn given_valid_credentials_when_login_then_token_is_stored() {
    // GIVEN: A backend accepting admin/admin123
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"username": "admin", "password": "admin123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh-token", "username": "admin", "role": "admin"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let session = Session::in_memory();
    let mut events = session.subscribe();
    let client = client_for(&server, session.clone());

    // WHEN: Logging in
    let response = client.login("admin", "admin123").await.unwrap();

    // THEN: The token is stored and Established is published
    assert_eq!(response.username, "admin");
    assert_eq!(response.role, "admin");
    assert_eq!(session.token().unwrap().unwrap().expose(), "fresh-token");
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Established);
}

/// **VALUE**: Verifies rejected credentials leave no token behind and reach the caller as 401.
#[tokio::test]
async fn given_wrong_credentials_when_login_then_unauthorized_and_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "bad credentials"})))
        .mount(&server)
        .await;
    let session = Session::in_memory();
    let client = client_for(&server, session.clone());

    let err = client.login("admin", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated());
}

/// **VALUE**: Verifies blank credentials are rejected locally.
#[tokio::test]
async fn given_blank_username_when_login_then_validation_error_without_request() {
    let server = MockServer::start().await;
    let client = client_for(&server, Session::in_memory());

    let err = client.login("", "secret").await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// **VALUE**: Verifies logout sends the token, then drops it locally.
#[tokio::test]
async fn given_signed_in_when_logout_then_server_called_with_token_and_token_removed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "bye"})))
        .expect(1)
        .mount(&server)
        .await;
    let session = signed_in_session();
    let client = client_for(&server, session.clone());

    let response = client.logout().await.unwrap();

    assert_eq!(response.message, "bye");
    assert!(!session.is_authenticated());
}

/// **VALUE**: Verifies the local token is removed even when the server logout fails.
///
/// **WHY THIS MATTERS**: A user who clicked "log out" must be logged out locally, whether or
/// not the backend was reachable.
#[tokio::test]
async fn given_server_error_when_logout_then_token_removed_and_error_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let session = signed_in_session();
    let client = client_for(&server, session.clone());

    let err = client.logout().await.unwrap_err();

    assert!(matches!(err, ApiError::Server { .. }));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn given_signed_in_when_me_then_returns_account() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "admin", "role": "admin", "linked_user_id": null
        })))
        .mount(&server)
        .await;
    let client = client_for(&server, signed_in_session());

    let me = client.me().await.unwrap();

    assert_eq!(me.id, 1);
    assert!(me.is_admin());
}

/// **VALUE**: Verifies a login through a file-backed session is visible to the next process.
#[tokio::test]
async fn given_file_session_when_login_then_token_persists_for_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "on-disk", "username": "sara", "role": "user"
        })))
        .mount(&server)
        .await;
    let client = client_for(
        &server,
        Session::new(Arc::new(FileSessionStore::new(dir.path()))),
    );

    client.login("sara", "pw").await.unwrap();

    let next_run = Session::new(Arc::new(FileSessionStore::new(dir.path())));
    assert_eq!(next_run.token().unwrap().unwrap().expose(), "on-disk");
}

struct StuckStore;

impl SessionStore for StuckStore {
    fn get(&self) -> Result<Option<SessionToken>, SessionError> {
        Ok(Some(SessionToken::new(TEST_TOKEN)))
    }

    fn set(&self, _token: &SessionToken) -> Result<(), SessionError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        Err(SessionError::Poisoned {
            message: "read-only storage".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// **VALUE**: Verifies logout reports the server's answer even when the token cannot be cleared.
///
/// **WHY THIS MATTERS**: The caller needs to know whether the backend ended the session. A
/// local storage failure is logged; it must not replace the server outcome.
///
/// **BUG THIS CATCHES**: Would catch `invalidate()?` short-circuiting logout with the store
/// error and dropping a successful (or failed) server response.
#[tokio::test]
async fn given_store_that_cannot_clear_when_logout_then_server_outcome_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "bye"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, Session::new(Arc::new(StuckStore)));

    let response = client.logout().await.unwrap();

    assert_eq!(response.message, "bye");
}
