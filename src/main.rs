//! AutoSlide - vision-oracle driven slider puzzle solver
//!
//! Main entry point for the AutoSlide CLI.

mod cli;
mod cmd_config;
mod cmd_solve;
mod providers;

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use autoslide_config::ConfigLoader;

use crate::cli::{Cli, Commands};

/// Get the AutoSlide home directory (~/.autoslide).
fn autoslide_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".autoslide"))
        .unwrap_or_else(|| PathBuf::from(".autoslide"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.autoslide/logs/ with daily rotation.
fn init_tracing() -> anyhow::Result<()> {
    let log_dir = autoslide_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("autoslide")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes buffered file output on exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; keys may come from the config or the shell.
    let dotenv = dotenvy::dotenv();

    init_tracing()?;
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Solve(args) => {
            let config = ConfigLoader::load_or_default(&cli.config)?;
            cmd_solve::handle_solve(config, args).await
        }
        Commands::CheckConfig => cmd_config::handle_check_config(&cli.config),
    }
}
