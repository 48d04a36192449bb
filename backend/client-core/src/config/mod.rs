use crate::error::config::ConfigError;
use crate::{CRM_API_PATH, CRM_DEV_SERVER_ORIGIN, CRM_PRODUCTION_API_URL};

use common::ErrorLocation;

use std::panic::Location;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE_NAME: &str = "crm-config.json";
const CONFIG_VERSION: u32 = 1;
const DEFAULT_TIMEOUT_MS: u64 = 15_000;

pub const ENV_ENVIRONMENT: &str = "CRM_ENV";
pub const ENV_API_URL: &str = "CRM_API_URL";
pub const ENV_DEV_ORIGIN: &str = "CRM_DEV_ORIGIN";

// ============================================
// ENVIRONMENT
// ============================================

/// Which backend address this process talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Absolute production address.
    Production,
    /// Relative `/api` path behind the local reverse proxy.
    Development,
}

impl Default for Environment {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(format!("expected production or development, got '{other}'")),
        }
    }
}

// ============================================
// CONFIG STRUCT
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default = "default_production_url")]
    pub production_url: String,

    #[serde(default = "default_development_path")]
    pub development_path: String,

    /// Origin the development path is resolved against (the reverse proxy).
    #[serde(default = "default_development_origin")]
    pub development_origin: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            environment: Environment::default(),
            production_url: default_production_url(),
            development_path: default_development_path(),
            development_origin: default_development_origin(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_production_url() -> String {
    CRM_PRODUCTION_API_URL.to_string()
}
fn default_development_path() -> String {
    CRM_API_PATH.to_string()
}
fn default_development_origin() -> String {
    CRM_DEV_SERVER_ORIGIN.to_string()
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ApiConfig {
    /// Defaults with `.env` and process environment overrides applied.
    ///
    /// A missing `.env` file is not an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply `CRM_ENV`, `CRM_API_URL` and `CRM_DEV_ORIGIN` from `.env` and the
    /// process environment on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from: {}", path.display()),
            Err(e) => debug!("No .env loaded: {e}"),
        }

        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ENVIRONMENT) {
            self.environment =
                value
                    .parse()
                    .map_err(|reason| ConfigError::EnvironmentError {
                        location: ErrorLocation::from(Location::caller()),
                        variable: ENV_ENVIRONMENT,
                        value: value.clone(),
                        reason,
                    })?;
        }

        if let Some(value) = lookup(ENV_API_URL) {
            self.production_url = value;
        }

        if let Some(value) = lookup(ENV_DEV_ORIGIN) {
            self.development_origin = value;
        }

        self.validate()?;
        Ok(self)
    }

    /// Load config from {config_dir}/crm-config.json.
    ///
    /// Returns defaults if the file does not exist; a present but corrupt or
    /// invalid file is an error.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ApiConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/crm-config.json (temp file + rename).
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(invalid(format!(
                "Invalid version: {} (expected 1-{})",
                self.version, CONFIG_VERSION
            )));
        }

        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms must be greater than zero".to_string()));
        }

        check_absolute_http(&self.production_url, "production_url")?;
        check_absolute_http(&self.development_origin, "development_origin")?;

        if !self.development_path.starts_with('/') {
            return Err(invalid(format!(
                "development_path must start with '/': {}",
                self.development_path
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The one base address used for every request of this process.
    pub fn resolve_base_url(&self) -> Result<Url, ConfigError> {
        let resolved = match self.environment {
            Environment::Production => Url::parse(&self.production_url),
            Environment::Development => Url::parse(&self.development_origin)
                .and_then(|origin| origin.join(&self.development_path)),
        };

        resolved.map_err(|e| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason: format!("Cannot resolve base URL for {:?}: {e}", self.environment),
        })
    }
}

#[track_caller]
fn invalid(reason: String) -> ConfigError {
    ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason,
    }
}

#[track_caller]
fn check_absolute_http(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(invalid(format!("Invalid URL format for {field}: {url}")));
    }

    Url::parse(url).map_err(|e| invalid(format!("Invalid URL for {field}: {e}")))?;
    Ok(())
}
