//! Client configuration

use super::ClientError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `COURIER_BASE_URL`
pub const ENV_PREFIX: &str = "COURIER";

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Settings shared by every request a client issues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root URL that relative request paths are appended to
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_user_agent() -> String {
    concat!("courier/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: default_user_agent(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from the `COURIER_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `COURIER_BASE_URL` is missing or a value cannot be parsed
    pub fn from_env() -> Result<Self, ClientError> {
        Self::load(None, None)
    }

    /// Load configuration from a file, with environment variables taking precedence
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or no base URL is configured
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        Self::load(Some(path.as_ref()), None)
    }

    /// Load configuration from an optional file and the environment.
    ///
    /// `base_url` is only a default: a file or `COURIER_BASE_URL` still
    /// overrides it.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed, or no base URL is configured
    pub fn load(path: Option<&Path>, base_url: Option<&str>) -> Result<Self, ClientError> {
        let mut builder = config::Config::builder()
            .set_default("timeout_ms", DEFAULT_TIMEOUT_MS)
            .map_err(config_error)?
            .set_default("user_agent", default_user_agent())
            .map_err(config_error)?;

        if let Some(base_url) = base_url {
            builder = builder
                .set_default("base_url", base_url)
                .map_err(config_error)?;
        }

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(config_error)?;

        let config: Self = settings.try_deserialize().map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings can produce a working client
    ///
    /// # Errors
    ///
    /// Returns an error for an empty base URL or a zero timeout
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::Configuration("base_url is required".into()));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::Configuration(
                "timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn config_error(err: config::ConfigError) -> ClientError {
    ClientError::Configuration(err.to_string())
}
