use crate::ErrorLocation;
use crate::error::model_error::ModelError;

use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};

/// Body of `POST /login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reject blank credentials before they reach the network.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.username.trim().is_empty() {
            return Err(ModelError::Validation {
                field: "username",
                message: String::from("username is required"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.password.is_empty() {
            return Err(ModelError::Validation {
                field: "password",
                message: String::from("password is required"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response of a successful `POST /login`.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub username: String,
    pub role: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"[REDACTED]")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish()
    }
}

/// The account behind the current token, from `GET /me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAuthInfo {
    pub id: i64,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub linked_user_id: Option<i64>,
}

impl UserAuthInfo {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Generic `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
