use crate::api_client::helpers::{
    TEST_TOKEN, client_for, received_authorization, signed_in_session, unreachable_base_url,
};

use client_core::CrmClient;
use client_core::error::{ApiError, SessionError};
use client_core::session::{Session, SessionEvent, SessionStore};

use common::{ErrorLocation, HttpStatusCode, SessionToken};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::broadcast::error::TryRecvError;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================
// OUTBOUND
// ============================================

/// **VALUE**: Verifies a stored token is sent as `Authorization: Bearer <token>`.
///
/// **WHY THIS MATTERS**: Every protected backend endpoint rejects requests without it.
///
/// **BUG THIS CATCHES**: Would catch a missing "Bearer " prefix or a header attached only on
/// some methods.
#[tokio::test]
async fn given_stored_token_when_get_then_sends_bearer_header() {
    // GIVEN: A signed-in session and a backend that requires the header
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, signed_in_session());

    // WHEN: Fetching users
    let users: Value = client.get("/users").await.unwrap();

    // THEN: The body is passed through unchanged
    assert_eq!(users, json!([{"id": 1}]));
}

#[tokio::test]
async fn given_stored_token_when_post_put_delete_then_each_sends_bearer_header() {
    let server = MockServer::start().await;
    let bearer = format!("Bearer {TEST_TOKEN}");
    for verb in ["POST", "PUT", "DELETE"] {
        Mock::given(method(verb))
            .and(path("/api/products/3"))
            .and(header("authorization", bearer.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;
    }
    let client = client_for(&server, signed_in_session());

    let _: Value = client.post("/products/3", &json!({"name": "box"})).await.unwrap();
    let _: Value = client.put("/products/3", &json!({"name": "box"})).await.unwrap();
    let _: Value = client.delete("/products/3").await.unwrap();
}

/// **VALUE**: Verifies no Authorization header is added without a token.
#[tokio::test]
async fn given_no_token_when_get_then_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let client = client_for(&server, Session::in_memory());

    let _: Value = client.get("/products").await.unwrap();

    assert_eq!(received_authorization(&server).await, None);
}

/// **VALUE**: Verifies `/login` requests never carry the stored token.
///
/// **WHY THIS MATTERS**: A stale token sent with fresh credentials makes the request look
/// authenticated as the old user in proxy logs, and some backends reject the mix outright.
#[tokio::test]
async fn given_stored_token_when_post_login_then_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "new-token", "username": "admin", "role": "admin"
        })))
        .mount(&server)
        .await;
    let client = client_for(&server, signed_in_session());

    let _: Value = client
        .post("/login", &json!({"username": "admin", "password": "x"}))
        .await
        .unwrap();

    assert_eq!(received_authorization(&server).await, None);
}

/// **VALUE**: Verifies only paths that END in `/login` skip the header.
#[tokio::test]
async fn given_path_containing_login_elsewhere_when_get_then_still_sends_bearer_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/login-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let client = client_for(&server, signed_in_session());

    let _: Value = client.get("/login-history").await.unwrap();

    assert_eq!(
        received_authorization(&server).await,
        Some(format!("Bearer {TEST_TOKEN}"))
    );
}

#[tokio::test]
async fn given_query_string_when_get_then_query_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/calls"))
        .and(query_param("status", "done"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server, signed_in_session());

    let calls: Vec<Value> = client.get("/calls?status=done").await.unwrap();

    assert!(calls.is_empty());
}

struct UnreadableStore;

impl SessionStore for UnreadableStore {
    fn get(&self) -> Result<Option<SessionToken>, SessionError> {
        Err(SessionError::Poisoned {
            message: "storage unavailable".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    fn set(&self, _token: &SessionToken) -> Result<(), SessionError> {
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

/// **VALUE**: Verifies an outbound interceptor failure rejects the request unsent.
#[tokio::test]
async fn given_unreadable_store_when_get_then_rejects_with_session_error_and_sends_nothing() {
    let server = MockServer::start().await;
    let client = client_for(&server, Session::new(Arc::new(UnreadableStore)));

    let result: Result<Value, ApiError> = client.get("/users").await;

    assert!(matches!(result, Err(ApiError::Session(SessionError::Poisoned { .. }))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================
// INBOUND
// ============================================

/// **VALUE**: Verifies a 401 removes the stored token, publishes one invalidation and is
/// still returned to the caller.
///
/// **WHY THIS MATTERS**: This is the only place a stale or forged token is ever discovered.
///
/// **BUG THIS CATCHES**: Would catch the 401 being swallowed (views would show empty data) or
/// the token surviving (every later request would 401 again).
#[tokio::test]
async fn given_401_when_get_then_clears_token_publishes_invalidated_and_rejects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard-stats"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&server)
        .await;
    let session = signed_in_session();
    let mut events = session.subscribe();
    let client = client_for(&server, session.clone());

    let result: Result<Value, ApiError> = client.get("/dashboard-stats").await;

    let err = result.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.status(), Some(HttpStatusCode(401)));
    assert!(err.to_string().contains("expired"));
    assert!(session.token().unwrap().is_none());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Invalidated);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

/// **VALUE**: Verifies concurrent 401s clear idempotently and publish a single event.
#[tokio::test]
async fn given_concurrent_401s_when_requests_fail_then_single_invalidation_event() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let session = signed_in_session();
    let mut events = session.subscribe();
    let client = client_for(&server, session.clone());

    let (a, b, c) = tokio::join!(
        client.get::<Value>("/users"),
        client.get::<Value>("/calls"),
        client.get::<Value>("/orders"),
    );

    assert!(a.unwrap_err().is_unauthorized());
    assert!(b.unwrap_err().is_unauthorized());
    assert!(c.unwrap_err().is_unauthorized());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Invalidated);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

/// **VALUE**: Verifies 5xx errors leave the session alone and reach the caller.
#[tokio::test]
async fn given_500_when_get_then_keeps_token_and_rejects_with_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
        .mount(&server)
        .await;
    let session = signed_in_session();
    let mut events = session.subscribe();
    let client = client_for(&server, session.clone());

    let err = client.get::<Value>("/orders").await.unwrap_err();

    assert!(matches!(err, ApiError::Server { .. }));
    assert!(err.is_server_or_network());
    assert_eq!(err.status(), Some(HttpStatusCode(503)));
    assert_eq!(session.token().unwrap().unwrap().expose(), TEST_TOKEN);
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

/// **VALUE**: Verifies other 4xx statuses are returned without any session side effects.
#[tokio::test]
async fn given_403_when_get_then_rejects_with_status_error_and_keeps_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/app-users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "admins only"})))
        .mount(&server)
        .await;
    let session = signed_in_session();
    let client = client_for(&server, session.clone());

    let err = client.get::<Value>("/admin/app-users").await.unwrap_err();

    assert!(matches!(err, ApiError::Status { .. }));
    assert_eq!(err.status(), Some(HttpStatusCode(403)));
    assert!(session.is_authenticated());
}

/// **VALUE**: Verifies a refused connection surfaces as a response-less Network error.
#[tokio::test]
async fn given_unreachable_backend_when_get_then_rejects_with_network_error() {
    let session = signed_in_session();
    let client =
        CrmClient::with_base_url(&unreachable_base_url(), Duration::from_secs(2), session.clone())
            .unwrap();

    let err = client.get::<Value>("/users").await.unwrap_err();

    assert!(matches!(err, ApiError::Network { timed_out: false, .. }));
    assert_eq!(err.status(), None);
    assert!(session.is_authenticated());
}

/// **VALUE**: Verifies the per-request timeout turns a slow backend into a Network error.
#[tokio::test]
async fn given_slow_backend_when_timeout_elapses_then_rejects_with_timed_out_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    let client = CrmClient::with_base_url(
        &format!("{}/api", server.uri()),
        Duration::from_millis(50),
        signed_in_session(),
    )
    .unwrap();

    let err = client.get::<Value>("/products").await.unwrap_err();

    assert!(matches!(err, ApiError::Network { timed_out: true, .. }));
}

#[tokio::test]
async fn given_non_json_success_body_when_get_then_rejects_with_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;
    let client = client_for(&server, signed_in_session());

    let err = client.get::<Value>("/users").await.unwrap_err();

    assert!(matches!(err, ApiError::Json { .. }));
}

/// **VALUE**: Verifies the raw `send` path runs the same interceptors.
#[tokio::test]
async fn given_raw_send_when_response_is_401_then_token_is_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/backup-db"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let session = signed_in_session();
    let client = client_for(&server, session.clone());

    let result = client.send(reqwest::Method::GET, "/admin/backup-db").await;

    assert!(result.unwrap_err().is_unauthorized());
    assert!(!session.is_authenticated());
}
