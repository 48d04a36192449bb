//! Test helpers for CrmClient integration tests.
//!
//! - Starting a mock backend with the `/api` prefix
//! - Building clients over in-memory or file sessions
//! - Reading the Authorization header the mock received

use client_core::CrmClient;
use client_core::session::Session;

use common::SessionToken;

use std::time::Duration;

use wiremock::MockServer;

pub const TEST_TOKEN: &str = "5f0e8c1d2b3a49e7a6c4d2b1e0f9a8c7";
pub const TEST_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Client pointed at `{server}/api`.
pub fn client_for(server: &MockServer, session: Session) -> CrmClient {
    CrmClient::with_base_url(&format!("{}/api", server.uri()), TEST_TIMEOUT, session)
        .expect("Failed to build client")
}

pub fn signed_in_session() -> Session {
    let session = Session::in_memory();
    session
        .establish(SessionToken::new(TEST_TOKEN))
        .expect("Failed to store token");
    session
}

/// Authorization header of the only request the server received.
pub async fn received_authorization(server: &MockServer) -> Option<String> {
    let requests = server
        .received_requests()
        .await
        .expect("Request recording is enabled");
    assert_eq!(requests.len(), 1, "Expected exactly one request");

    requests[0]
        .headers
        .get("authorization")
        .map(|value| value.to_str().expect("ASCII header").to_string())
}

/// An address nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("Local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api")
}
