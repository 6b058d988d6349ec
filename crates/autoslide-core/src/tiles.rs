//! Tile-challenge bookkeeping.
//!
//! A tile challenge ("select all squares with buses") may be served several
//! rounds in a row. [`TileTracker`] remembers which tiles were already
//! clicked so they are not toggled off again, and forgets them when the
//! challenge evidently changed.

use std::collections::BTreeSet;

use autoslide_protocols::Observation;
use futures::StreamExt;
use futures::stream;
use tracing::{debug, warn};

use crate::oracle::OracleAdapter;

/// Tracker state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TileState {
    /// No round seen yet.
    #[default]
    Fresh,
    Tracking {
        subject: String,
        clicked: BTreeSet<usize>,
        last_round_clicks: usize,
    },
}

/// How a new round relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStart {
    /// Subject differs from the previous round; clicked set cleared.
    NewSubject,
    /// Same subject, but the previous round clicked enough tiles to mean a fresh grid.
    ClickVolumeReset,
    /// Same challenge continues; already clicked tiles are kept.
    Continue,
}

/// Per-challenge deduplication of clicked tiles.
#[derive(Debug, Clone)]
pub struct TileTracker {
    state: TileState,
    reset_threshold: usize,
}

impl TileTracker {
    pub fn new(reset_threshold: usize) -> Self {
        Self {
            state: TileState::Fresh,
            reset_threshold,
        }
    }

    pub fn state(&self) -> &TileState {
        &self.state
    }

    /// Start a round for `subject`.
    pub fn begin_round(&mut self, subject: &str) -> RoundStart {
        let threshold = self.reset_threshold;
        let same_subject = match &mut self.state {
            TileState::Tracking {
                subject: current,
                clicked,
                last_round_clicks,
            } if current.eq_ignore_ascii_case(subject) => {
                if *last_round_clicks >= threshold {
                    clicked.clear();
                    Some(RoundStart::ClickVolumeReset)
                } else {
                    Some(RoundStart::Continue)
                }
            }
            _ => None,
        };

        let start = same_subject.unwrap_or_else(|| {
            self.state = TileState::Tracking {
                subject: subject.to_string(),
                clicked: BTreeSet::new(),
                last_round_clicks: 0,
            };
            RoundStart::NewSubject
        });
        debug!(subject, ?start, "Tile round started");
        start
    }

    /// Tiles to click this round: matching tiles not clicked before, ascending.
    ///
    /// Planning before any [`begin_round`](Self::begin_round) tracks under an empty subject.
    pub fn plan_clicks(&mut self, matches: &[bool]) -> Vec<usize> {
        if matches!(self.state, TileState::Fresh) {
            self.begin_round("");
        }
        let TileState::Tracking {
            clicked,
            last_round_clicks,
            ..
        } = &mut self.state
        else {
            return Vec::new();
        };

        let fresh: Vec<usize> = matches
            .iter()
            .enumerate()
            .filter(|(i, matched)| **matched && !clicked.contains(i))
            .map(|(i, _)| i)
            .collect();
        clicked.extend(fresh.iter().copied());
        *last_round_clicks = fresh.len();
        fresh
    }

    pub fn clicked(&self) -> Vec<usize> {
        match &self.state {
            TileState::Fresh => Vec::new(),
            TileState::Tracking { clicked, .. } => clicked.iter().copied().collect(),
        }
    }
}

/// Ask whether each tile shows `subject`, at most `concurrency` calls at a time.
///
/// The result is indexed like `tiles`; a failed call counts as `false`.
pub async fn check_tiles(
    oracle: &OracleAdapter,
    tiles: &[Observation],
    subject: &str,
    concurrency: usize,
) -> Vec<bool> {
    let mut results = vec![false; tiles.len()];
    let mut answers = stream::iter(tiles.iter().enumerate())
        .map(|(index, tile)| async move { (index, oracle.tile_contains(tile, subject).await) })
        .buffer_unordered(concurrency.max(1));

    while let Some((index, answer)) = answers.next().await {
        match answer {
            Ok(contains) => results[index] = contains,
            Err(e) => warn!(tile = index, "Tile check failed: {}", e),
        }
    }
    results
}

#[cfg(test)]
#[path = "tiles_tests.rs"]
mod tests;
