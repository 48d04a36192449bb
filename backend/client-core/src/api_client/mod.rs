//! Session-aware HTTP client for the CRM backend.
//!
//! Every request goes through the same two steps:
//!
//! - **outbound**: attach `Authorization: Bearer <token>` when a token is
//!   stored and the path does not end in `/login`
//! - **inbound**: pass 2xx through; on 401 drop the token and publish
//!   [`SessionEvent::Invalidated`](crate::SessionEvent); on 5xx or no response
//!   log the failure. Every failure is returned to the caller.
//!
//! One attempt per request, no retries.

use crate::config::ApiConfig;
use crate::error::api_client::ApiError;
use crate::session::Session;

use common::{ErrorLocation, HttpStatusCode, SessionToken};
use models::{LoginRequest, MessageResponse, TokenResponse, UserAuthInfo};

use std::panic::Location;
use std::time::Duration;

use log::{debug, error, info, warn};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

const LOGIN_ENDPOINT: &str = "/login";
const LOGOUT_ENDPOINT: &str = "/logout";
const ME_ENDPOINT: &str = "/me";

#[derive(Clone)]
pub struct CrmClient {
    base_url: Url,
    client: Client,
    session: Session,
}

impl CrmClient {
    /// Client for the base address `config` resolves to.
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, ApiError> {
        config.validate()?;
        let base_url = config.resolve_base_url()?;
        info!(
            "CRM API base URL: {base_url} ({:?}, timeout {} ms)",
            config.environment, config.timeout_ms
        );
        Self::build(base_url, config.timeout(), session)
    }

    /// Client for an explicit absolute base address.
    pub fn with_base_url(
        base_url_str: &str,
        timeout: Duration,
        session: Session,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url_str)?;
        Self::build(base_url, timeout, session)
    }

    fn build(base_url: Url, timeout: Duration, session: Session) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            client,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `path` appended to the base address, keeping the base path (`/api`).
    pub fn endpoint(&self, path: &str) -> Url {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };

        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(query);

        url
    }

    // ============================================
    // INTERCEPTORS
    // ============================================

    /// Outbound step. A token store failure rejects the request before it is sent.
    fn prepare_request(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, ApiError> {
        match self.session.token()? {
            Some(token) if !is_login_path(path) => {
                Ok(request.header(AUTHORIZATION, token.bearer_header_value()))
            }
            _ => Ok(request),
        }
    }

    /// Inbound step.
    async fn handle_response(
        &self,
        path: &str,
        outcome: Result<Response, reqwest::Error>,
    ) -> Result<Response, ApiError> {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                let err = ApiError::from(e);
                error!("Network Error or Server Down: {path}: {err}");
                return Err(err);
            }
        };

        let status = HttpStatusCode::from(response.status().as_u16());
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();

        if status.is_unauthorized() {
            match self.session.invalidate() {
                Ok(true) => info!("HTTP 401 on {path}, session invalidated"),
                Ok(false) => debug!("HTTP 401 on {path}, session already invalidated"),
                Err(e) => warn!("HTTP 401 on {path}, failed to clear session token: {e}"),
            }

            return Err(ApiError::Unauthorized {
                status,
                message,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if status.is_server_error() {
            let err = ApiError::Server {
                status,
                message,
                location: ErrorLocation::from(Location::caller()),
            };
            error!("Network Error or Server Down: {path}: {err}");
            return Err(err);
        }

        Err(ApiError::Status {
            status,
            message,
            location: ErrorLocation::from(Location::caller()),
        })
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = self.prepare_request(path, request)?;
        let outcome = request.send().await;
        self.handle_response(path, outcome).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    // ============================================
    // REQUEST METHODS
    // ============================================

    /// Send a request and return the raw response once both interceptors ran.
    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<Response, ApiError> {
        let url = self.endpoint(path);
        self.execute(path, self.client.request(method, url)).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let response = self.execute(path, self.client.get(url)).await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let response = self.execute(path, self.client.post(url).json(body)).await?;
        Self::decode(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let response = self.execute(path, self.client.put(url).json(body)).await?;
        Self::decode(response).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        let response = self.execute(path, self.client.delete(url)).await?;
        Self::decode(response).await
    }

    // ============================================
    // AUTHENTICATION
    // ============================================

    /// Exchange credentials for a session token and store it.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, ApiError> {
        let request = LoginRequest::new(username, password);
        request.validate()?;

        let response: TokenResponse = self.post(LOGIN_ENDPOINT, &request).await?;
        self.session.establish(SessionToken::new(response.token.as_str()))?;

        info!("Logged in as {} ({})", response.username, response.role);
        Ok(response)
    }

    /// End the session on the server. The local token is dropped whatever the
    /// server answers, and the server's answer is what gets returned.
    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        let outcome = self
            .post::<_, MessageResponse>(LOGOUT_ENDPOINT, &serde_json::json!({}))
            .await;

        match self.session.invalidate() {
            Ok(_) => info!("Logged out"),
            Err(e) => warn!("Logged out, but failed to clear session token: {e}"),
        }

        outcome
    }

    pub async fn me(&self) -> Result<UserAuthInfo, ApiError> {
        self.get(ME_ENDPOINT).await
    }
}

/// Requests to the login endpoint never carry a bearer token.
pub fn is_login_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.ends_with(LOGIN_ENDPOINT)
}
