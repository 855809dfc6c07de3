//! CLI commands

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use courier_http::{ApiClient, FileTokenStore, RequestDescriptor};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config;
use crate::notifier::ConsoleNotifier;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Subcommand)]
pub enum Commands {
    /// Send a request and print the response payload
    Request {
        /// HTTP method, e.g. GET or post
        method: String,

        /// Path relative to the base URL, or an absolute URL
        url: String,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,

        /// Extra header as "Name: value" (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Query parameter as key=value (repeatable)
        #[arg(short = 'q', long = "param")]
        params: Vec<String>,

        /// Notification shown when the request succeeds
        #[arg(long)]
        success: Option<String>,

        /// Notification shown when the request fails
        #[arg(long)]
        error: Option<String>,

        /// Credential file holding {"token": "..."}
        #[arg(long)]
        token_file: Option<PathBuf>,
    },

    /// Write a configuration file with default values
    Config {
        /// Output file path; the global --base-url is written into it
        #[arg(default_value = "courier.toml")]
        output: PathBuf,
    },
}

impl Commands {
    pub async fn execute(self, settings: &config::Settings) -> Result<()> {
        match self {
            Commands::Request {
                method,
                url,
                data,
                headers,
                params,
                success,
                error,
                token_file,
            } => {
                let mut descriptor = RequestDescriptor {
                    url,
                    ..RequestDescriptor::default()
                }
                .method_name(&method)?;

                if let Some(data) = data {
                    let body: serde_json::Value =
                        serde_json::from_str(&data).context("--data must be valid JSON")?;
                    descriptor = descriptor.data(body);
                }
                for header in &headers {
                    let (name, value) = parse_header(header)?;
                    descriptor = descriptor.header(name, value);
                }
                for param in &params {
                    let (key, value) = parse_param(param)?;
                    descriptor = descriptor.param(key, value);
                }
                if let Some(success) = success {
                    descriptor = descriptor.success_toast(success);
                }
                if let Some(error) = error {
                    descriptor = descriptor.error_toast(error);
                }

                let token_file = token_file.unwrap_or_else(FileTokenStore::default_path);
                let client = ApiClient::builder()
                    .config(settings.load_client_config()?)
                    .credentials(FileTokenStore::new(token_file))
                    .notifier(Arc::new(ConsoleNotifier))
                    .build()?;

                let payload = client.make_request(descriptor).await?;
                println!("{}", serde_json::to_string_pretty(&payload)?);
                Ok(())
            }
            Commands::Config { output } => {
                let base_url = settings.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
                config::generate_default_config(&output, base_url)?;
                info!("Wrote default configuration to {}", output.display());
                Ok(())
            }
        }
    }
}

/// Split `"Name: value"` into its parts
fn parse_header(raw: &str) -> Result<(&str, &str)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("header {raw:?} must look like \"Name: value\"");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("header {raw:?} has an empty name");
    }
    Ok((name, value.trim()))
}

/// Split `key=value`; the value may be empty
fn parse_param(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("query parameter {raw:?} must look like key=value"),
    }
}
