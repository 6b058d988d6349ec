//! Alignment controller.
//!
//! One attempt against one puzzle instance: estimate, drag, verify, and if
//! that misses, pick a direction, scan around the estimate, let the oracle
//! choose the best fit and drag again.

use std::time::Duration;

use autoslide_config::{PuzzleConfig, SolverConfig};
use autoslide_protocols::{Indicator, Selector, Surface};
use tracing::{debug, error, info, warn};

use crate::actuator::DragActuator;
use crate::error::AttemptError;
use crate::model::{AttemptResult, Direction, Offset};
use crate::oracle::OracleAdapter;
use crate::scan::ScanGenerator;

/// Page elements an attempt interacts with.
#[derive(Debug, Clone)]
pub struct PuzzleTargets {
    /// Region captured for every observation.
    pub window: Selector,
    /// Slider handle the pointer grips.
    pub handle: Selector,
    /// Piece moved together with the handle during scans.
    pub piece: Selector,
    pub success: Indicator,
}

impl PuzzleTargets {
    pub fn new(
        window: impl Into<Selector>,
        handle: impl Into<Selector>,
        piece: impl Into<Selector>,
        success: impl Into<Selector>,
    ) -> Self {
        Self {
            window: window.into(),
            handle: handle.into(),
            piece: piece.into(),
            success: Indicator::new(success),
        }
    }

    pub fn from_config(config: &PuzzleConfig) -> Self {
        let mut targets = Self::new(
            config.window.as_str(),
            config.handle.as_str(),
            config.piece.as_str(),
            config.success.as_str(),
        );
        if let Some(text) = &config.success_text {
            targets.success = targets.success.with_text(text.clone());
        }
        targets
    }
}

/// Phase of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    InitialEstimate,
    InitialDrag,
    VerifyInitial,
    DirectionEstimate,
    Scanning,
    BestFitSelection,
    FinalDrag,
    VerifyFinal,
    Success,
    Failed,
}

impl AttemptState {
    pub fn is_terminal(self) -> bool {
        matches!(self, AttemptState::Success | AttemptState::Failed)
    }
}

/// What happened during one attempt.
#[derive(Debug, Clone)]
pub struct AttemptReport {
    pub result: AttemptResult,
    /// Every state entered, in order, ending in a terminal state.
    pub states: Vec<AttemptState>,
    pub initial: Option<Offset>,
    pub direction: Option<Direction>,
    pub best_fit: Option<usize>,
    dragged: Option<Offset>,
}

impl AttemptReport {
    fn new() -> Self {
        Self {
            result: AttemptResult::Failure(None),
            states: Vec::new(),
            initial: None,
            direction: None,
            best_fit: None,
            dragged: None,
        }
    }

    fn enter(&mut self, state: AttemptState) {
        debug!(?state, "Attempt state");
        self.states.push(state);
    }

    pub fn state(&self) -> AttemptState {
        self.states.last().copied().unwrap_or(AttemptState::Idle)
    }

    pub fn visited(&self, state: AttemptState) -> bool {
        self.states.contains(&state)
    }
}

/// Drives one attempt against one puzzle instance.
pub struct AlignmentController<'a> {
    surface: &'a dyn Surface,
    oracle: &'a OracleAdapter,
    targets: &'a PuzzleTargets,
    config: &'a SolverConfig,
    actuator: DragActuator,
    scanner: ScanGenerator,
}

impl<'a> AlignmentController<'a> {
    pub fn new(
        surface: &'a dyn Surface,
        oracle: &'a OracleAdapter,
        targets: &'a PuzzleTargets,
        config: &'a SolverConfig,
    ) -> Self {
        Self {
            surface,
            oracle,
            targets,
            config,
            actuator: DragActuator::from_config(config),
            scanner: ScanGenerator::from_config(config),
        }
    }

    /// Run the attempt to a terminal state. Never fails; errors end the attempt as `Failed`.
    pub async fn run(&self) -> AttemptReport {
        let mut report = AttemptReport::new();
        match self.drive(&mut report).await {
            Ok(result) => {
                report.enter(if result.is_success() {
                    AttemptState::Success
                } else {
                    AttemptState::Failed
                });
                report.result = result;
            }
            Err(e) => {
                if e.is_expected() {
                    warn!(state = ?report.state(), "Attempt aborted: {}", e);
                } else {
                    error!(state = ?report.state(), "Attempt failed unexpectedly: {}", e);
                }
                report.enter(AttemptState::Failed);
                report.result = AttemptResult::Failure(report.dragged);
            }
        }
        report
    }

    async fn drive(&self, report: &mut AttemptReport) -> Result<AttemptResult, AttemptError> {
        let max = self.config.max_offset;

        report.enter(AttemptState::Idle);
        let baseline = self
            .surface
            .screenshot(&self.targets.window)
            .await?
            .labelled("baseline");

        report.enter(AttemptState::InitialEstimate);
        let raw = self.oracle.estimate_distance(&baseline).await?;
        let initial = self.oracle.calibration().apply(raw, max);
        info!(
            raw,
            factor = self.oracle.calibration().factor,
            offset = initial.px(),
            "Initial distance estimate"
        );
        report.initial = Some(initial);

        report.enter(AttemptState::InitialDrag);
        self.actuator
            .drag(self.surface, &self.targets.handle, initial)
            .await?;
        report.dragged = Some(initial);
        let after_initial = self
            .surface
            .screenshot(&self.targets.window)
            .await?
            .labelled("after-initial");

        report.enter(AttemptState::VerifyInitial);
        if self.verify().await {
            info!(offset = initial.px(), "Solved on the first slide");
            return Ok(AttemptResult::Success(initial));
        }

        report.enter(AttemptState::DirectionEstimate);
        let direction = match Direction::inferred(
            initial,
            self.config.direction_low_threshold,
            self.config.direction_high_threshold,
        ) {
            Some(direction) => {
                debug!(?direction, offset = initial.px(), "Direction inferred from offset");
                direction
            }
            None => self.oracle.estimate_direction(&after_initial).await?,
        };
        report.direction = Some(direction);

        report.enter(AttemptState::Scanning);
        let candidates = self
            .scanner
            .scan(self.surface, self.targets, initial, direction)
            .await?;

        report.enter(AttemptState::BestFitSelection);
        let best = self.oracle.select_best_fit(&candidates).await?;
        report.best_fit = Some(best);
        let final_offset = initial.stepped(best, self.scanner.step(), direction, max);
        info!(
            best,
            ?direction,
            offset = final_offset.px(),
            "Correcting to best-fit candidate"
        );

        report.enter(AttemptState::FinalDrag);
        self.actuator
            .drag(self.surface, &self.targets.handle, final_offset)
            .await?;
        report.dragged = Some(final_offset);

        report.enter(AttemptState::VerifyFinal);
        if self.verify().await {
            Ok(AttemptResult::Success(final_offset))
        } else {
            Ok(AttemptResult::Failure(Some(final_offset)))
        }
    }

    /// Poll the success indicator a bounded number of times.
    async fn verify(&self) -> bool {
        let interval = self.config.verify_interval();
        for poll in 0..self.config.verify_polls {
            match self
                .surface
                .poll_for_indicator(&self.targets.success, Duration::ZERO)
                .await
            {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => debug!(poll, "Indicator poll failed: {}", e),
            }
            tokio::time::sleep(interval).await;
        }
        false
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
