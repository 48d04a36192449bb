use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Raised when a secret-bearing value is asked to leave the process implicitly.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Redacted Serialization Error: {type_name} must be exposed explicitly {location}")]
    Serialization {
        type_name: &'static str,
        location: ErrorLocation,
    },
}
