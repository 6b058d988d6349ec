//! Scan generator.
//!
//! While the pointer holds the handle, positions the handle and piece at a
//! few candidate offsets around an estimate and captures one observation per
//! candidate. Positions are set directly, never dragged, and everything is
//! put back to zero before the pointer is released.

use std::time::Duration;

use autoslide_config::SolverConfig;
use autoslide_protocols::{Observation, Surface, SurfaceError};
use tracing::{debug, warn};

use crate::controller::PuzzleTargets;
use crate::model::{Direction, Offset};

/// One scan slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanCandidate {
    pub index: usize,
    /// Unclamped position; negative slots are skipped.
    pub offset: i64,
    /// `None` for skipped slots.
    pub observation: Option<Observation>,
}

impl ScanCandidate {
    pub fn is_observed(&self) -> bool {
        self.observation.is_some()
    }
}

/// Produces candidate alignments in a single held gesture.
#[derive(Debug, Clone)]
pub struct ScanGenerator {
    step: u32,
    count: u32,
    hold: Duration,
    settle: Duration,
    post: Duration,
}

impl ScanGenerator {
    pub fn new(step: u32, count: u32) -> Self {
        Self {
            step,
            count,
            hold: Duration::ZERO,
            settle: Duration::ZERO,
            post: Duration::ZERO,
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            step: config.scan_step,
            count: config.scan_count,
            hold: config.scan_hold(),
            settle: config.scan_settle(),
            post: config.post_scan(),
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Candidate positions `initial + i·step·sign` for every slot.
    pub fn offsets(&self, initial: Offset, direction: Direction) -> Vec<i64> {
        (0..self.count as usize)
            .map(|i| initial.step_target(i, self.step, direction))
            .collect()
    }

    /// Sweep the candidates, returning exactly one entry per slot.
    pub async fn scan(
        &self,
        surface: &dyn Surface,
        targets: &PuzzleTargets,
        initial: Offset,
        direction: Direction,
    ) -> Result<Vec<ScanCandidate>, SurfaceError> {
        surface.press_hold(&targets.handle).await?;
        tokio::time::sleep(self.hold).await;

        let swept = self.sweep(surface, targets, initial, direction).await;
        let restored = self.restore(surface, targets).await;
        tokio::time::sleep(self.post).await;

        match (swept, restored) {
            (Ok(candidates), Ok(())) => Ok(candidates),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), restored) => {
                if let Err(restore_err) = restored {
                    warn!("Failed to restore slider after scan error: {}", restore_err);
                }
                Err(e)
            }
        }
    }

    async fn sweep(
        &self,
        surface: &dyn Surface,
        targets: &PuzzleTargets,
        initial: Offset,
        direction: Direction,
    ) -> Result<Vec<ScanCandidate>, SurfaceError> {
        let mut candidates = Vec::with_capacity(self.count as usize);
        for (index, offset) in self.offsets(initial, direction).into_iter().enumerate() {
            if offset < 0 {
                debug!(index, offset, "Skipping negative scan slot");
                candidates.push(ScanCandidate {
                    index,
                    offset,
                    observation: None,
                });
                continue;
            }

            let px = offset as f64;
            surface.set_visual_offset(&targets.handle, px).await?;
            surface.set_visual_offset(&targets.piece, px).await?;
            tokio::time::sleep(self.settle).await;

            let observation = surface
                .screenshot(&targets.window)
                .await?
                .labelled(format!("scan-{}@{}px", index, offset));
            debug!(index, offset, "Captured scan candidate");
            candidates.push(ScanCandidate {
                index,
                offset,
                observation: Some(observation),
            });
        }
        Ok(candidates)
    }

    async fn restore(&self, surface: &dyn Surface, targets: &PuzzleTargets) -> Result<(), SurfaceError> {
        let positioned = match surface.set_visual_offset(&targets.handle, 0.0).await {
            Ok(()) => surface.set_visual_offset(&targets.piece, 0.0).await,
            Err(e) => Err(e),
        };
        tokio::time::sleep(self.hold).await;
        let released = surface.release().await;
        positioned.and(released)
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
