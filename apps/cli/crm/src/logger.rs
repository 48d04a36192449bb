//! Logging for the `crm` command line shell.
//!
//! Dual output: colored stderr (stdout is reserved for command output) and a
//! plain log file. Initialization runs once per process.

use crate::error::CrmError;

use common::ErrorLocation;

use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

static INIT_LOGGER_ONCE: Once = Once::new();

static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

const LOG_FILE_NAME: &str = "crm.log";

/// Level used unless `--verbose` is given.
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// Initialize the logger with dual output (stderr + file).
///
/// Safe to call more than once; later calls log a warning and return Ok.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or the global logger
/// cannot be installed.
pub fn initialize(log_dir: &Path, level: LevelFilter) -> Result<(), CrmError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("Logger already initialized");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = build_dispatch(log_dir, level).and_then(|dispatch| {
            dispatch.apply().map_err(|e| CrmError::Crm {
                message: format!("Failed to initialize logger: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
        });
        if result.is_ok() {
            info!("Logger initialized with level: {level:?}");
        }
    });

    result
}

/// Whether log records currently reach an output. False until
/// [`initialize`] has installed the dispatch.
pub fn is_active() -> bool {
    log::max_level() != LevelFilter::Off
}

/// Build the stderr + file dispatch without installing it.
#[track_caller]
pub fn build_dispatch(log_dir: &Path, level: LevelFilter) -> Result<Dispatch, CrmError> {
    let log_file_path = log_dir.join(LOG_FILE_NAME);

    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let stderr_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message}",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
            ))
        })
        .chain(stderr());

    let log_file = fern::log_file(&log_file_path).map_err(|e| CrmError::Crm {
        message: format!("Failed to create log file {}: {e}", log_file_path.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let file_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = record.level(),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0)
            ))
        })
        .chain(log_file);

    Ok(Dispatch::new()
        .level(level)
        .chain(stderr_dispatch)
        .chain(file_dispatch))
}
