//! Courier CLI - issue API requests from the terminal

mod commands;
mod config;
mod logging;
mod notifier;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use tracing::{Level, debug, error};

#[derive(Parser)]
#[command(name = "courier")]
#[command(about = "Send authenticated API requests with user-facing notifications")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short = 'c', long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Base URL, overrides configuration and COURIER_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(short = 't', long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.into())?;

    let settings = config::Settings {
        config_file: cli.config,
        base_url: cli.base_url,
        timeout_ms: cli.timeout_ms,
    };

    match cli.command.execute(&settings).await {
        Ok(()) => {
            debug!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
