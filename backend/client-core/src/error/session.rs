use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session Store Read Error: {path}: {source} {location}")]
    Read {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session Store Write Error: {path}: {source} {location}")]
    Write {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session Store Corrupt Error: {path}: {reason} {location}")]
    Corrupt {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Session Store Lock Error: {message} {location}")]
    Poisoned {
        message: String,
        location: ErrorLocation,
    },

    #[error("Session Data Directory Not Found Error {location}")]
    DataDirNotFound { location: ErrorLocation },
}
