//! Payloads exchanged with the CRM backend.
//!
//! Only the authentication contract is modelled. Every other resource is
//! passed through as JSON untouched; the client does not validate or reshape
//! backend data.

pub mod auth;
pub mod error;


pub use auth::{LoginRequest, MessageResponse, TokenResponse, UserAuthInfo};
pub use common::ErrorLocation;
pub use error::model_error::ModelError;
