use crate::error::config::ConfigError;
use crate::error::session::SessionError;

use common::{ErrorLocation, HttpStatusCode};
use models::ModelError;

use std::panic::Location;

use thiserror::Error as ThisError;

/// Failure of a single request through [`crate::CrmClient`].
///
/// Variants that carry a `status` had a response; `Network` had none.
#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("Unauthorized Error: HTTP {status} - {message} {location}")]
    Unauthorized {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Server Error: HTTP {status} - {message} {location}")]
    Server {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Status Error: HTTP {status} - {message} {location}")]
    Status {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Network Error: {message} {location}")]
    Network {
        message: String,
        timed_out: bool,
        location: ErrorLocation,
    },

    #[error("Request Error: {message} {location}")]
    Request {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ModelError),
}

impl ApiError {
    /// Status of the response that caused the error, if there was one.
    pub fn status(&self) -> Option<HttpStatusCode> {
        match self {
            ApiError::Unauthorized { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// True for failures the response interceptor logs as "server down".
    pub fn is_server_or_network(&self) -> bool {
        matches!(self, ApiError::Server { .. } | ApiError::Network { .. })
    }
}

impl From<url::ParseError> for ApiError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ApiError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        let location = ErrorLocation::from(Location::caller());

        if error.is_builder() {
            return ApiError::Request {
                message: error.to_string(),
                location,
            };
        }

        if error.is_decode() {
            return ApiError::Json {
                message: error.to_string(),
                location,
            };
        }

        ApiError::Network {
            message: error.to_string(),
            timed_out: error.is_timeout(),
            location,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ApiError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
