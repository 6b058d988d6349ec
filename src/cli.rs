//! CLI definitions for AutoSlide.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use autoslide_config::DEFAULT_CONFIG_PATH;

/// AutoSlide CLI.
#[derive(Parser)]
#[command(name = "autoslide")]
#[command(about = "Vision-oracle driven slider puzzle solver")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Solve puzzles in a running Chrome
    Solve(SolveArgs),

    /// Load and validate the configuration
    CheckConfig,
}

#[derive(Args)]
pub(crate) struct SolveArgs {
    /// Vision provider (openai, gemini)
    #[arg(short, long, default_value = "gemini")]
    pub provider: String,

    /// Model override for every oracle question
    #[arg(short, long)]
    pub model: Option<String>,

    /// Chrome debugging endpoint (default from [browser])
    #[arg(long, env = "AUTOSLIDE_CDP_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Puzzle page URL (default from [puzzle])
    #[arg(long)]
    pub url: Option<String>,

    /// Number of puzzles to solve
    #[arg(short, long, default_value_t = 1)]
    pub runs: u32,
}
