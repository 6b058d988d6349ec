//! # AutoSlide Core
//!
//! Closed-loop alignment controller for slider puzzles.
//!
//! ## Components
//!
//! - [`OracleAdapter`] - Asks a vision provider questions and normalizes the answers
//! - [`DragActuator`] - Human-paced multi-increment drags
//! - [`ScanGenerator`] - Held-pointer sweep rendering candidate alignments
//! - [`AlignmentController`] - Estimate, drag, verify, correct, verify
//! - [`solve_puzzle`] - Bounded retries over fresh puzzle instances
//! - [`TileTracker`] / [`check_tiles`] - Tile-challenge bookkeeping

pub mod actuator;
pub mod controller;
pub mod error;
pub mod model;
pub mod oracle;
pub mod retry;
pub mod scan;
pub mod tiles;

pub use actuator::{DragActuator, DragPlan};
pub use controller::{AlignmentController, AttemptReport, AttemptState, PuzzleTargets};
pub use error::AttemptError;
pub use model::{AttemptResult, CalibrationProfile, Direction, Offset};
pub use oracle::OracleAdapter;
pub use retry::solve_puzzle;
pub use scan::{ScanCandidate, ScanGenerator};
pub use tiles::{RoundStart, TileState, TileTracker, check_tiles};

#[cfg(test)]
mod testing;
