//! Oracle answer errors.

use thiserror::Error;

use super::ProviderError;

/// An oracle answer that cannot be turned into a usable value.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Oracle call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Unparseable {question} answer: {answer:?}")]
    Unparseable {
        question: &'static str,
        answer: String,
    },

    #[error("Best-fit index {index} outside [0, {len})")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("No observations to choose from")]
    NoObservations,
}
