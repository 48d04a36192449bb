pub mod api_client;
pub mod config;
pub mod router;
pub mod session;

pub use api_client::ApiError;
pub use config::ConfigError;
pub use router::RouterError;
pub use session::SessionError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Router(#[from] RouterError),
}
