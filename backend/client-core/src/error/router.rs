use common::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RouterError {
    #[error("Redirect Loop Error: {path} after {hops} redirects {location}")]
    RedirectLoop {
        path: String,
        hops: usize,
        location: ErrorLocation,
    },

    #[error("No Route Error: {path} {location}")]
    NoMatch {
        path: String,
        location: ErrorLocation,
    },

    #[error("Unknown Route Error: {name} {location}")]
    UnknownRoute {
        name: &'static str,
        location: ErrorLocation,
    },

    #[error("Missing Route Param Error: {name} requires :{param} {location}")]
    MissingParam {
        name: &'static str,
        param: String,
        location: ErrorLocation,
    },
}
