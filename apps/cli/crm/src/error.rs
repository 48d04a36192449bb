use client_core::error::{ApiError, ConfigError, CoreError, RouterError, SessionError};
use common::ErrorLocation;

use thiserror::Error;

/// Errors surfaced by the `crm` command line shell.
#[derive(Debug, Error)]
pub enum CrmError {
    /// Error from the shell itself (IO, output, setup)
    #[error("Crm Error: {message} {location}")]
    Crm {
        message: String,
        location: ErrorLocation,
    },

    /// Error from client-core (HTTP, session, routing, config)
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ApiError> for CrmError {
    fn from(error: ApiError) -> Self {
        CrmError::Core(CoreError::from(error))
    }
}

impl From<RouterError> for CrmError {
    fn from(error: RouterError) -> Self {
        CrmError::Core(CoreError::from(error))
    }
}

impl From<SessionError> for CrmError {
    fn from(error: SessionError) -> Self {
        CrmError::Core(CoreError::from(error))
    }
}

impl From<ConfigError> for CrmError {
    fn from(error: ConfigError) -> Self {
        CrmError::Core(CoreError::from(error))
    }
}
