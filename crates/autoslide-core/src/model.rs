//! Offsets, directions and calibration.

use std::collections::HashMap;
use std::fmt;

use autoslide_config::ProviderConfig;

/// Horizontal slider displacement in pixels, always within `[0, max_offset]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Offset(u32);

impl Offset {
    /// Clamp an arbitrary signed pixel value into `[0, max]`.
    pub fn clamped(value: i64, max: u32) -> Self {
        Self(value.clamp(0, i64::from(max)) as u32)
    }

    /// Apply a calibration factor to a raw oracle estimate, truncating toward zero, then clamp.
    pub fn calibrated(raw: i64, factor: f64, max: u32) -> Self {
        let scaled = (raw as f64 * factor).trunc();
        let value = if scaled.is_finite() { scaled as i64 } else { 0 };
        Self::clamped(value, max)
    }

    /// Offset `slot` scan steps away in `direction`, clamped.
    pub fn stepped(self, slot: usize, step: u32, direction: Direction, max: u32) -> Self {
        Self::clamped(self.step_target(slot, step, direction), max)
    }

    /// Unclamped position `slot` scan steps away in `direction`.
    pub fn step_target(self, slot: usize, step: u32, direction: Direction) -> i64 {
        i64::from(self.0) + slot as i64 * i64::from(step) * direction.sign()
    }

    pub fn px(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.0)
    }
}

/// Which way the target lies relative to the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Target is further right.
    Positive,
    /// Target is further left.
    Negative,
}

impl Direction {
    pub fn sign(self) -> i64 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }

    /// Direction implied by the offset alone, when it sits outside `[low, high]`.
    pub fn inferred(offset: Offset, low: u32, high: u32) -> Option<Self> {
        if offset.px() < low {
            Some(Direction::Positive)
        } else if offset.px() > high {
            Some(Direction::Negative)
        } else {
            None
        }
    }
}

/// Outcome of one attempt together with the last offset dragged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    Success(Offset),
    /// `None` when the attempt failed before any drag.
    Failure(Option<Offset>),
}

impl AttemptResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptResult::Success(_))
    }

    pub fn offset(&self) -> Option<Offset> {
        match *self {
            AttemptResult::Success(offset) => Some(offset),
            AttemptResult::Failure(offset) => offset,
        }
    }
}

/// Provider-specific multiplier correcting systematic bias in distance estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationProfile {
    pub provider: String,
    pub factor: f64,
}

impl CalibrationProfile {
    pub const GEMINI_FACTOR: f64 = 0.791;

    pub fn new(provider: impl Into<String>, factor: f64) -> Self {
        Self {
            provider: provider.into(),
            factor,
        }
    }

    /// Built-in profile for a provider; unknown providers are uncorrected.
    pub fn builtin(provider: &str) -> Self {
        let factor = match provider {
            "gemini" => Self::GEMINI_FACTOR,
            _ => 1.0,
        };
        Self::new(provider, factor)
    }

    /// Profile for `provider`, preferring a configured factor over the built-in one.
    pub fn resolve(provider: &str, providers: &HashMap<String, ProviderConfig>) -> Self {
        match providers.get(provider).and_then(|p| p.calibration) {
            Some(factor) => Self::new(provider, factor),
            None => Self::builtin(provider),
        }
    }

    pub fn apply(&self, raw: i64, max: u32) -> Offset {
        Offset::calibrated(raw, self.factor, max)
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
