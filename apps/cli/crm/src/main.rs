use crm::error::CrmError;
use crm::logger::{DEFAULT_LOG_LEVEL, initialize as LoggerInitialize, is_active as is_logger_active};
use crm::shell::CrmShell;

use client_core::formatters::{
    DigitStyle, format_jalali_date_time_with, format_jalali_date_with, to_english_digits,
};
use client_core::session::FileSessionStore;
use client_core::{ApiConfig, CrmClient, Session};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{LevelFilter, error, info};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "crm", version, about = "Command line client for the CRM backend")]
struct Cli {
    /// Directory holding the session store, config and log file
    #[arg(long, env = "CRM_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and open the dashboard
    Login {
        username: String,
        #[arg(long, env = "CRM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// End the session
    Logout,
    /// Navigate to an application path, e.g. /app/users/3
    Open { path: String },
    /// Show the signed-in user
    Whoami,
    /// Format an ISO date as a Jalali date
    Date {
        value: String,
        /// Include HH:mm
        #[arg(long)]
        time: bool,
        /// ASCII digits instead of Persian ones
        #[arg(long)]
        latin: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if is_logger_active() {
                error!("{e}");
            } else {
                eprintln!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CrmError> {
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => FileSessionStore::default_dir()?,
    };

    create_dir_all(&data_dir).map_err(|e| CrmError::Crm {
        message: format!("Failed to create data directory {}: {e}", data_dir.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        DEFAULT_LOG_LEVEL
    };
    LoggerInitialize(&data_dir, level)?;
    info!("Data directory: {}", data_dir.display());

    if let Command::Date { value, time, latin } = &cli.command {
        let style = if *latin {
            DigitStyle::Latin
        } else {
            DigitStyle::Persian
        };
        let value = to_english_digits(value);
        let formatted = if *time {
            format_jalali_date_time_with(&value, style)
        } else {
            format_jalali_date_with(&value, style)
        };
        println!("{formatted}");
        return Ok(());
    }

    let config = ApiConfig::load(&data_dir)?.with_env_overrides()?;
    let session = Session::new(Arc::new(FileSessionStore::new(&data_dir)));
    let client = CrmClient::new(&config, session)?;
    let mut shell = CrmShell::new(client);

    match cli.command {
        Command::Login { username, password } => {
            let (token, view) = shell.login(&username, &password).await?;
            print_json(&serde_json::json!({
                "username": token.username,
                "role": token.role,
                "view": view,
            }))
        }
        Command::Logout => print_json(&shell.logout().await?),
        Command::Open { path } => print_json(&shell.open(&path).await?),
        Command::Whoami => print_json(&shell.whoami().await?),
        Command::Date { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CrmError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CrmError::Crm {
        message: format!("Failed to render output: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;
    println!("{json}");
    Ok(())
}
