//! Shared building blocks for the CRM client workspace.
//!
//! Everything here is dependency-light so that `models`, `client-core` and the
//! `crm` binary can all lean on the same error location tracking, status code
//! helpers and token handling.
//!
//! ## Architecture
//!
//! - **common** (this crate): error locations, status codes, session token
//! - **models**: request/response payloads exchanged with the CRM backend
//! - **client-core**: HTTP client, session, router and formatters
//! - **crm**: command line shell wiring everything together

pub mod error;
pub mod http_status;
pub mod session_token;


pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use session_token::SessionToken;
