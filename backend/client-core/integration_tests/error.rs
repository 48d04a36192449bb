use client_core::error::{ApiError, ConfigError, CoreError, RouterError, SessionError};
use common::{ErrorLocation, HttpStatusCode};

use std::error::Error;
use std::panic::Location;
use std::path::PathBuf;

/// **VALUE**: Verifies API errors carry status, body and source location in Display.
///
/// **WHY THIS MATTERS**: Views show or log the error as-is. Without the status and the body
/// (`{"detail": ...}` from the backend) users and developers see nothing actionable.
#[test]
fn given_unauthorized_error_when_formatted_then_includes_status_message_and_location() {
    let err = ApiError::Unauthorized {
        status: HttpStatusCode(401),
        message: "token expired".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    let text = err.to_string();

    assert!(text.contains("401"));
    assert!(text.contains("token expired"));
    assert!(text.contains("error.rs"));
}

/// **VALUE**: Verifies URL parse failures convert with location tracking.
#[test]
fn given_url_parse_error_when_converted_then_is_url_parse_variant() {
    let parse_err = url::Url::parse("not a url").unwrap_err();

    let err = ApiError::from(parse_err);

    assert!(matches!(err, ApiError::UrlParse { .. }));
    assert_eq!(err.status(), None);
}

/// **VALUE**: Verifies session IO errors keep their source chain through CoreError.
#[test]
fn given_session_write_error_when_wrapped_in_core_error_then_source_is_preserved() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let session_err = SessionError::Write {
        location: ErrorLocation::from(Location::caller()),
        path: PathBuf::from("/tmp/crm/storage.json"),
        source: io,
    };

    let core = CoreError::from(session_err);

    let text = core.to_string();
    assert!(text.contains("storage.json"));
    let source = core.source().expect("io source");
    assert!(source.to_string().contains("read-only"));
}

#[test]
fn given_router_and_config_errors_when_wrapped_then_display_is_transparent() {
    let router = CoreError::from(RouterError::NoMatch {
        path: "/x".to_string(),
        location: ErrorLocation::from(Location::caller()),
    });
    let config = CoreError::from(ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason: "timeout_ms must be greater than zero".to_string(),
    });

    assert!(router.to_string().starts_with("No Route Error: /x"));
    assert!(config.to_string().contains("timeout_ms"));
}
