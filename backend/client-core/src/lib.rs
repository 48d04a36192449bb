pub mod api_client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod router;
pub mod session;

#[cfg(test)]
mod tests;

pub use api_client::CrmClient;
pub use config::{ApiConfig, Environment};
pub use router::{Navigator, RouteName, RouteTable};
pub use session::{Session, SessionEvent};

pub const CRM_DEV_SERVER_HOSTNAME: &str = "127.0.0.1";
pub const CRM_DEV_SERVER_PORT: u16 = 8000;
pub const CRM_DEV_SERVER_ORIGIN: &str =
    const_format::concatcp!("http://", CRM_DEV_SERVER_HOSTNAME, ":", CRM_DEV_SERVER_PORT);
pub const CRM_API_PATH: &str = "/api";
pub const CRM_PRODUCTION_API_URL: &str =
    const_format::concatcp!("https://fardapack-crm-6.onrender.com", CRM_API_PATH);

/// Storage key of the session token.
pub const SESSION_TOKEN_KEY: &str = "crm-token";
