//! Attempt retry manager.

use autoslide_config::SolverConfig;
use autoslide_protocols::Surface;
use tracing::{error, info, warn};

use crate::controller::{AlignmentController, PuzzleTargets};
use crate::oracle::OracleAdapter;

/// Solve the puzzle currently shown on `surface`, resetting it between attempts.
///
/// Returns the 1-based attempt number that succeeded, or `0` when every
/// attempt failed or the puzzle could not be reset.
pub async fn solve_puzzle(
    surface: &dyn Surface,
    oracle: &OracleAdapter,
    targets: &PuzzleTargets,
    config: &SolverConfig,
) -> u32 {
    let max_attempts = config.max_attempts;
    for attempt in 1..=max_attempts {
        info!(
            provider = oracle.provider_id(),
            "Puzzle attempt {}/{}", attempt, max_attempts
        );
        tokio::time::sleep(config.render_settle()).await;

        let report = AlignmentController::new(surface, oracle, targets, config)
            .run()
            .await;
        if report.result.is_success() {
            info!(
                attempt,
                offset = report.result.offset().map(|o| o.px()),
                "Puzzle solved"
            );
            return attempt;
        }
        warn!(
            attempt,
            state = ?report.states.iter().rev().nth(1),
            offset = report.result.offset().map(|o| o.px()),
            "Attempt failed"
        );

        if attempt < max_attempts {
            if let Err(e) = surface.trigger_reset().await {
                error!("Could not reset puzzle, giving up: {}", e);
                return 0;
            }
            info!("Puzzle reset for next attempt");
        }
    }

    warn!("All {} puzzle attempts failed", max_attempts);
    0
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
