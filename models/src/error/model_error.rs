use crate::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("Validation Error: {field}: {message} {location}")]
    Validation {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },
}
