use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

/// Failure to load, save or validate [`crate::ApiConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Api Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Api Config Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Api Config Write Error: {path}: {source} {location}")]
    WriteError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Api Config Serialization Error: {reason} {location}")]
    SerializeError {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Api Config Validation Error: {reason} {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Api Config Environment Error: {variable}={value}: {reason} {location}")]
    EnvironmentError {
        location: ErrorLocation,
        variable: &'static str,
        value: String,
        reason: String,
    },
}
