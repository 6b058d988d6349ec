//! Surface trait definition.

use std::time::Duration;

use async_trait::async_trait;

use super::{Indicator, Observation, Selector};
use crate::error::SurfaceError;

/// Page-automation capability consumed by the solver.
///
/// Pointer operations form a gesture: `press_hold` grips an element,
/// `move_by` moves the held pointer horizontally relative to its current
/// position, and `release` lets go. A surface is driven by one caller at a
/// time; implementations may assume no interleaved gestures.
#[async_trait]
pub trait Surface: Send + Sync {
    /// Capture the pixels of the element matched by `region`.
    async fn screenshot(&self, region: &Selector) -> Result<Observation, SurfaceError>;

    /// Instantly render `element` shifted right by `offset_px`, without pointer motion.
    async fn set_visual_offset(&self, element: &Selector, offset_px: f64) -> Result<(), SurfaceError>;

    /// Press and hold the pointer on the centre of `element`.
    async fn press_hold(&self, element: &Selector) -> Result<(), SurfaceError>;

    /// Move the held pointer horizontally by `delta_px`.
    async fn move_by(&self, delta_px: f64) -> Result<(), SurfaceError>;

    /// Release the pointer.
    async fn release(&self) -> Result<(), SurfaceError>;

    /// Wait up to `timeout` for `indicator` to be present; `Ok(false)` when it never appears.
    async fn poll_for_indicator(
        &self,
        indicator: &Indicator,
        timeout: Duration,
    ) -> Result<bool, SurfaceError>;

    /// Ask the page for a fresh puzzle instance.
    async fn trigger_reset(&self) -> Result<(), SurfaceError>;
}
