//! RazerGenie CLI
//!
//! Custom lighting matrix editor for devices managed by the openrazer daemon.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use genie_transport::MatrixDimensions;
use razergenie::config::GenieConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Log file used while the terminal editor owns the screen
fn log_file_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("razergenie")
        .join("razergenie.log")
}

/// Initialize logging; `RUST_LOG` wins over the configured level
fn init_logging(level: &str, to_file: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if to_file {
        let path = log_file_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&path)
            .with_context(|| format!("Cannot create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
        info!("Logging to {}", path.display());
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(GenieConfig::default_path);
    let config = GenieConfig::load(&config_path)?;

    let editing = matches!(cli.command, None | Some(Commands::Edit { .. }));
    let level = cli
        .log_level
        .as_deref()
        .or(config.log_level.as_deref())
        .unwrap_or(DEFAULT_LOG_LEVEL);
    init_logging(level, editing)?;
    info!("Config: {}", config_path.display());

    match cli.command {
        None => commands::edit::edit(&cli.device, &config, false).await,
        Some(Commands::Edit { discover }) => {
            commands::edit::edit(&cli.device, &config, discover).await
        }
        Some(Commands::List) => commands::query::list(&cli.device).await,
        Some(Commands::Info) => commands::query::info(&cli.device).await,
        Some(Commands::Layout {
            device_type,
            rows,
            cols,
            physical,
            discover,
        }) => commands::layout::layout(
            &config,
            &device_type,
            MatrixDimensions::new(rows, cols),
            &physical,
            discover,
        ),
        Some(Commands::Paint { row, col, color }) => {
            commands::paint::paint(&cli.device, row, col, color).await
        }
        Some(Commands::Clear) => commands::paint::clear(&cli.device).await,
        Some(Commands::Config { init }) => {
            commands::settings::config(&config, &config_path, init)
        }
    }
}
