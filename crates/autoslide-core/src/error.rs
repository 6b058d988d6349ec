//! Attempt-level errors.

use autoslide_protocols::{OracleError, SurfaceError};
use thiserror::Error;

/// Anything that ends a single attempt early.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The oracle could not produce a usable answer.
    #[error("Oracle failure: {0}")]
    Oracle(#[from] OracleError),

    /// The page did not cooperate.
    #[error("Surface failure: {0}")]
    Surface(#[from] SurfaceError),
}

impl AttemptError {
    /// Oracle failures are expected outcomes; everything else is logged as an error.
    pub fn is_expected(&self) -> bool {
        matches!(self, AttemptError::Oracle(_))
    }
}
