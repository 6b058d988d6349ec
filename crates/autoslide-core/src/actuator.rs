//! Drag actuator.
//!
//! Moves the slider handle from rest to a target offset in a few uneven
//! increments with pauses in between, then releases. Both the first slide and
//! the corrected slide go through here; scan positions never do.

use std::time::Duration;

use autoslide_config::{DragPolicy, SolverConfig};
use autoslide_protocols::{Selector, Surface, SurfaceError};
use rand::Rng;
use tracing::{debug, warn};

use crate::model::Offset;

const GEOMETRIC_RATIO: f64 = 0.5;
const GEOMETRIC_THRESHOLD: f64 = 0.5;
const SUBPIXEL_GRID: f64 = 64.0;

/// Increments and pacing for one drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPlan {
    pub increments: Vec<f64>,
    /// Pause after the grab and after every increment.
    pub pause: Duration,
}

impl DragPlan {
    pub fn total(&self) -> f64 {
        self.increments.iter().sum()
    }
}

/// Executes human-paced drags.
#[derive(Debug, Clone)]
pub struct DragActuator {
    policy: DragPolicy,
    pause_ms: [u64; 2],
}

impl DragActuator {
    pub fn new(policy: DragPolicy, pause_ms: [u64; 2]) -> Self {
        Self { policy, pause_ms }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(config.drag_policy, config.grab_pause_ms)
    }

    pub fn plan(&self, target: Offset) -> DragPlan {
        self.plan_with(target, &mut rand::rng())
    }

    pub fn plan_with<R: Rng + ?Sized>(&self, target: Offset, rng: &mut R) -> DragPlan {
        let target = f64::from(target.px());
        let increments = match self.policy {
            DragPolicy::ThreeStage => three_stage(target, rng),
            DragPolicy::Geometric => geometric(target),
        };
        let [low, high] = self.pause_ms;
        let pause = Duration::from_millis(rng.random_range(low.min(high)..=high.max(low)));
        DragPlan { increments, pause }
    }

    /// Press on `handle`, move to `target`, release.
    ///
    /// The pointer is released even when a move fails.
    pub async fn drag(
        &self,
        surface: &dyn Surface,
        handle: &Selector,
        target: Offset,
    ) -> Result<(), SurfaceError> {
        let plan = self.plan(target);
        debug!(
            target = target.px(),
            increments = ?plan.increments,
            pause_ms = plan.pause.as_millis() as u64,
            "Dragging"
        );

        surface.press_hold(handle).await?;
        match perform(surface, &plan).await {
            Ok(()) => surface.release().await,
            Err(e) => {
                if let Err(release_err) = surface.release().await {
                    warn!("Failed to release pointer after aborted drag: {}", release_err);
                }
                Err(e)
            }
        }
    }
}

async fn perform(surface: &dyn Surface, plan: &DragPlan) -> Result<(), SurfaceError> {
    tokio::time::sleep(plan.pause).await;
    for increment in &plan.increments {
        surface.move_by(*increment).await?;
        tokio::time::sleep(plan.pause).await;
    }
    Ok(())
}

/// Fast approach, slowing second move, then whatever is left.
///
/// The first two parts sit on a 1/64 px grid, so the remainder is exact and
/// the three parts add back to `target` with no float drift.
fn three_stage<R: Rng + ?Sized>(target: f64, rng: &mut R) -> Vec<f64> {
    let first = snap(target * rng.random_range(0.70..0.80));
    let second = snap(target * rng.random_range(0.15..0.25));
    vec![first, second, target - first - second]
}

fn snap(px: f64) -> f64 {
    (px * SUBPIXEL_GRID).round() / SUBPIXEL_GRID
}

/// Halve the remaining distance until it drops to the threshold, then place the rest.
fn geometric(target: f64) -> Vec<f64> {
    let mut steps = Vec::new();
    if target <= 0.0 {
        return steps;
    }
    let mut remaining = target;
    while remaining > GEOMETRIC_THRESHOLD {
        let step = remaining * GEOMETRIC_RATIO;
        steps.push(step);
        remaining -= step;
    }
    if remaining > 0.0 {
        steps.push(remaining);
    }
    steps
}

#[cfg(test)]
#[path = "actuator_tests.rs"]
mod tests;
