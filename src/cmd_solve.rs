//! `solve` subcommand: run the solver against puzzles in a live Chrome tab.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};

use autoslide_config::{Config, ConfigError, ConfigValidator};
use autoslide_core::{CalibrationProfile, OracleAdapter, PuzzleTargets, solve_puzzle};
use autoslide_surface_cdp::{CdpClient, GeetestSurface};

use crate::cli::SolveArgs;
use crate::providers;

/// Outcomes of a batch of runs.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Summary {
    pub runs: usize,
    pub solved: usize,
    /// Solved runs keyed by the attempt that succeeded.
    pub by_attempt: BTreeMap<u32, usize>,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[u32]) -> Self {
        let mut summary = Summary {
            runs: outcomes.len(),
            ..Default::default()
        };
        for &attempt in outcomes.iter().filter(|&&a| a > 0) {
            summary.solved += 1;
            *summary.by_attempt.entry(attempt).or_default() += 1;
        }
        summary
    }

    pub fn success_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.solved as f64 / self.runs as f64 * 100.0
        }
    }

    fn print(&self) {
        println!();
        println!("Solved {}/{} ({:.1}%)", self.solved, self.runs, self.success_rate());
        println!("{:<10} {}", "ATTEMPT", "SOLVED");
        println!("{}", "-".repeat(20));
        for (attempt, count) in &self.by_attempt {
            println!("{:<10} {}", attempt, count);
        }
        println!("{:<10} {}", "failed", self.runs - self.solved);
    }
}

/// Handle `autoslide solve`.
pub(crate) async fn handle_solve(config: Config, args: SolveArgs) -> anyhow::Result<()> {
    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    if let Some(first) = validation.errors.first() {
        return Err(ConfigError::InvalidValue {
            field: first.path.clone(),
            message: first.message.clone(),
        }
        .into());
    }

    let provider = providers::build(&args.provider, config.provider(&args.provider))?;
    let calibration = CalibrationProfile::resolve(provider.id(), &config.providers);
    let mut oracle = OracleAdapter::from_config(provider, calibration, &config.solver);
    if let Some(model) = &args.model {
        oracle = oracle.with_model(model.clone());
    }
    info!(
        provider = oracle.provider_id(),
        calibration = oracle.calibration().factor,
        "Oracle ready"
    );

    let endpoint = args.endpoint.clone().unwrap_or_else(|| config.browser.endpoint());
    let url = args.url.clone().unwrap_or_else(|| config.puzzle.url.clone());

    let client = CdpClient::connect_with_timeout(
        &endpoint,
        Duration::from_secs(config.browser.request_timeout_secs),
    )
    .await
    .with_context(|| format!("Connecting to Chrome at {}", endpoint))?;
    let page = client.new_page(None).await.context("Opening a tab")?;
    let target_id = page.target_id().to_string();
    let surface = GeetestSurface::from_config(page, &config.puzzle, &config.browser);
    let targets = PuzzleTargets::from_config(&config.puzzle);

    let mut outcomes = Vec::with_capacity(args.runs as usize);
    for run in 1..=args.runs {
        info!("Run {}/{}", run, args.runs);
        if let Err(e) = surface.open(&url).await {
            error!(run, "Could not open puzzle page: {}", e);
            outcomes.push(0);
            continue;
        }
        let attempt = solve_puzzle(&surface, &oracle, &targets, &config.solver).await;
        if attempt > 0 {
            info!(run, attempt, "Run solved");
        } else {
            warn!(run, "Run failed");
        }
        outcomes.push(attempt);
    }

    if let Err(e) = client.close_page(&target_id).await {
        warn!("Failed to close tab {}: {}", target_id, e);
    }

    Summary::from_outcomes(&outcomes).print();
    Ok(())
}
