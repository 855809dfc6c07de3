//! CLI configuration utilities

use anyhow::{Context, Result};
use courier_http::ClientConfig;
use std::path::{Path, PathBuf};

/// Global options that shape the client configuration
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Optional configuration file, overridden by `COURIER_*` variables
    pub config_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl Settings {
    /// Resolve the client configuration; command-line flags win over file and environment
    pub fn load_client_config(&self) -> Result<ClientConfig> {
        let mut config =
            ClientConfig::load(self.config_file.as_deref(), self.base_url.as_deref())
                .with_context(|| match &self.config_file {
                    Some(path) => format!("loading {}", path.display()),
                    None => "set COURIER_BASE_URL, pass --base-url or use --config".to_string(),
                })?;

        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Save client configuration to a TOML file
pub fn save_client_config<P: AsRef<Path>>(config: &ClientConfig, path: P) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Generate a default configuration file
pub fn generate_default_config<P: AsRef<Path>>(path: P, base_url: &str) -> Result<()> {
    let config = ClientConfig::new(base_url);
    save_client_config(&config, path)
}
