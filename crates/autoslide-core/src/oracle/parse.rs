//! Answer normalization.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::Direction;

static SIGNED_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-?\d+").expect("valid regex"));

/// First signed integer token in `answer`.
pub fn signed_int(answer: &str) -> Option<i64> {
    SIGNED_INT
        .find(answer)
        .and_then(|m| m.as_str().parse().ok())
}

/// First integer token in `answer`, sign included so `-1` is not read as `1`.
pub fn index(answer: &str) -> Option<i64> {
    signed_int(answer)
}

/// `+` anywhere means the target is to the right.
pub fn direction(answer: &str) -> Direction {
    if answer.contains('+') {
        Direction::Positive
    } else {
        Direction::Negative
    }
}

/// Trimmed, lowercased subject noun; `None` for a blank answer.
pub fn subject(answer: &str) -> Option<String> {
    let subject = answer.trim().to_lowercase();
    (!subject.is_empty()).then_some(subject)
}

/// Only an exact `true` counts.
pub fn affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("true")
}
