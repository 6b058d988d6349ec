//! Solver tuning parameters.
//!
//! Every constant the alignment loop depends on lives here so it can be
//! overridden from the `[solver]` table.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a drag gesture is split into increments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPolicy {
    /// Fast approach, slowing second move, remainder placement.
    #[default]
    ThreeStage,
    /// Halving steps until the remainder is below half a pixel.
    Geometric,
}

/// Alignment loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Largest slider offset in pixels.
    #[serde(default = "default_max_offset")]
    pub max_offset: u32,

    /// Below this offset the correction direction is always positive.
    #[serde(default = "default_direction_low_threshold")]
    pub direction_low_threshold: u32,

    /// Above this offset the correction direction is always negative.
    #[serde(default = "default_direction_high_threshold")]
    pub direction_high_threshold: u32,

    /// Pixel distance between scan candidates.
    #[serde(default = "default_scan_step")]
    pub scan_step: u32,

    /// Number of scan candidates.
    #[serde(default = "default_scan_count")]
    pub scan_count: u32,

    /// Success indicator checks after a drag.
    #[serde(default = "default_verify_polls")]
    pub verify_polls: u32,

    #[serde(default = "default_verify_interval_ms")]
    pub verify_interval_ms: u64,

    /// Fresh puzzles tried before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait for a (re)loaded puzzle to render before observing it.
    #[serde(default = "default_render_settle_ms")]
    pub render_settle_ms: u64,

    /// Inclusive-exclusive range pauses inside a drag are drawn from.
    #[serde(default = "default_grab_pause_ms")]
    pub grab_pause_ms: [u64; 2],

    #[serde(default)]
    pub drag_policy: DragPolicy,

    /// Pause after gripping the handle for a scan.
    #[serde(default = "default_scan_hold_ms")]
    pub scan_hold_ms: u64,

    /// Pause after positioning a scan candidate, before capturing it.
    #[serde(default = "default_scan_settle_ms")]
    pub scan_settle_ms: u64,

    /// Pause after releasing the scan gesture.
    #[serde(default = "default_post_scan_ms")]
    pub post_scan_ms: u64,

    /// Extra tries for a retryable oracle failure.
    #[serde(default = "default_oracle_retries")]
    pub oracle_retries: u32,

    #[serde(default = "default_oracle_retry_backoff_ms")]
    pub oracle_retry_backoff_ms: u64,

    /// Concurrent oracle calls when checking tiles.
    #[serde(default = "default_tile_concurrency")]
    pub tile_concurrency: usize,

    /// Clicks in one round after which the next round is treated as a new challenge.
    #[serde(default = "default_tile_reset_threshold")]
    pub tile_reset_threshold: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_offset: default_max_offset(),
            direction_low_threshold: default_direction_low_threshold(),
            direction_high_threshold: default_direction_high_threshold(),
            scan_step: default_scan_step(),
            scan_count: default_scan_count(),
            verify_polls: default_verify_polls(),
            verify_interval_ms: default_verify_interval_ms(),
            max_attempts: default_max_attempts(),
            render_settle_ms: default_render_settle_ms(),
            grab_pause_ms: default_grab_pause_ms(),
            drag_policy: DragPolicy::default(),
            scan_hold_ms: default_scan_hold_ms(),
            scan_settle_ms: default_scan_settle_ms(),
            post_scan_ms: default_post_scan_ms(),
            oracle_retries: default_oracle_retries(),
            oracle_retry_backoff_ms: default_oracle_retry_backoff_ms(),
            tile_concurrency: default_tile_concurrency(),
            tile_reset_threshold: default_tile_reset_threshold(),
        }
    }
}

impl SolverConfig {
    pub fn verify_interval(&self) -> Duration {
        Duration::from_millis(self.verify_interval_ms)
    }

    pub fn render_settle(&self) -> Duration {
        Duration::from_millis(self.render_settle_ms)
    }

    pub fn scan_hold(&self) -> Duration {
        Duration::from_millis(self.scan_hold_ms)
    }

    pub fn scan_settle(&self) -> Duration {
        Duration::from_millis(self.scan_settle_ms)
    }

    pub fn post_scan(&self) -> Duration {
        Duration::from_millis(self.post_scan_ms)
    }

    /// Backoff before retry number `retry` (0-based).
    pub fn oracle_backoff(&self, retry: u32) -> Duration {
        Duration::from_millis(self.oracle_retry_backoff_ms.saturating_mul(u64::from(retry) + 1))
    }
}

fn default_max_offset() -> u32 {
    260
}

fn default_direction_low_threshold() -> u32 {
    50
}

fn default_direction_high_threshold() -> u32 {
    250
}

fn default_scan_step() -> u32 {
    5
}

fn default_scan_count() -> u32 {
    3
}

fn default_verify_polls() -> u32 {
    6
}

fn default_verify_interval_ms() -> u64 {
    500
}

fn default_max_attempts() -> u32 {
    3
}

fn default_render_settle_ms() -> u64 {
    3000
}

fn default_grab_pause_ms() -> [u64; 2] {
    [300, 400]
}

fn default_scan_hold_ms() -> u64 {
    100
}

fn default_scan_settle_ms() -> u64 {
    50
}

fn default_post_scan_ms() -> u64 {
    1000
}

fn default_oracle_retries() -> u32 {
    3
}

fn default_oracle_retry_backoff_ms() -> u64 {
    3000
}

fn default_tile_concurrency() -> usize {
    9
}

fn default_tile_reset_threshold() -> usize {
    3
}
