//! Oracle adapter.
//!
//! Wraps a [`VisionProvider`] and turns its free-text answers into typed
//! values. Every question is side-effect free apart from the external call,
//! so retryable provider failures are retried here with linear backoff.

mod parse;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use autoslide_config::SolverConfig;
use autoslide_protocols::{
    ContentPart, Observation, OracleError, ProviderError, VisionProvider, VisionRequest,
};
use tracing::{debug, warn};

use crate::model::{CalibrationProfile, Direction};
use crate::scan::ScanCandidate;

/// Typed questions against one vision provider.
pub struct OracleAdapter {
    provider: Arc<dyn VisionProvider>,
    model: Option<String>,
    calibration: CalibrationProfile,
    retries: u32,
    backoff: Duration,
}

impl OracleAdapter {
    pub fn new(provider: Arc<dyn VisionProvider>, calibration: CalibrationProfile) -> Self {
        Self {
            provider,
            model: None,
            calibration,
            retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Override the provider's default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Retry retryable provider errors up to `retries` times, waiting `backoff × (k + 1)`.
    pub fn with_retry(mut self, retries: u32, backoff: Duration) -> Self {
        self.retries = retries;
        self.backoff = backoff;
        self
    }

    /// Adapter with retry policy taken from solver configuration.
    pub fn from_config(
        provider: Arc<dyn VisionProvider>,
        calibration: CalibrationProfile,
        config: &SolverConfig,
    ) -> Self {
        Self::new(provider, calibration).with_retry(
            config.oracle_retries,
            Duration::from_millis(config.oracle_retry_backoff_ms),
        )
    }

    pub fn provider_id(&self) -> &str {
        self.provider.id()
    }

    pub fn calibration(&self) -> &CalibrationProfile {
        &self.calibration
    }

    /// Raw pixel distance from handle centre to slot centre, uncalibrated.
    pub async fn estimate_distance(&self, observation: &Observation) -> Result<i64, OracleError> {
        let request = VisionRequest::new(vec![observation.to_content_part()])
            .with_system(prompts::DISTANCE)
            .with_temperature(0.0)
            .with_max_tokens(50);
        let answer = self.ask("distance", request).await?;
        parse::signed_int(&answer).ok_or(OracleError::Unparseable {
            question: "distance",
            answer,
        })
    }

    /// Which way the piece must still move.
    pub async fn estimate_direction(
        &self,
        observation: &Observation,
    ) -> Result<Direction, OracleError> {
        let request = VisionRequest::new(vec![observation.to_content_part()])
            .with_system(prompts::DIRECTION);
        let answer = self.ask("direction", request).await?;
        Ok(parse::direction(&answer))
    }

    /// Slot index of the candidate whose piece sits flush in the slot.
    ///
    /// Only candidates carrying an observation are shown; the oracle's answer
    /// indexes that shown list and is mapped back to the candidate's slot.
    pub async fn select_best_fit(&self, candidates: &[ScanCandidate]) -> Result<usize, OracleError> {
        let shown: Vec<&ScanCandidate> = candidates
            .iter()
            .filter(|c| c.observation.is_some())
            .collect();
        if shown.is_empty() {
            return Err(OracleError::NoObservations);
        }

        let mut parts = Vec::with_capacity(shown.len() + 1);
        parts.push(ContentPart::text(prompts::BEST_FIT));
        parts.extend(
            shown
                .iter()
                .filter_map(|c| c.observation.as_ref())
                .map(Observation::to_content_part),
        );
        let request = VisionRequest::new(parts).with_system(prompts::BEST_FIT_SYSTEM);

        let answer = self.ask("best-fit", request).await?;
        let index = parse::index(&answer).ok_or_else(|| OracleError::Unparseable {
            question: "best-fit",
            answer: answer.clone(),
        })?;
        usize::try_from(index)
            .ok()
            .and_then(|i| shown.get(i))
            .map(|c| c.index)
            .ok_or(OracleError::IndexOutOfRange {
                index,
                len: shown.len(),
            })
    }

    /// Object noun a tile challenge asks for, lowercased.
    pub async fn identify_subject(&self, observation: &Observation) -> Result<String, OracleError> {
        let request = VisionRequest::new(vec![
            ContentPart::text(prompts::SUBJECT),
            observation.to_content_part(),
        ])
        .with_temperature(0.0)
        .with_max_tokens(50);
        let answer = self.ask("subject", request).await?;
        parse::subject(&answer).ok_or(OracleError::Unparseable {
            question: "subject",
            answer,
        })
    }

    /// Whether a tile clearly shows `subject`.
    pub async fn tile_contains(
        &self,
        observation: &Observation,
        subject: &str,
    ) -> Result<bool, OracleError> {
        let request = VisionRequest::new(vec![
            ContentPart::text(prompts::tile_contains(subject)),
            observation.to_content_part(),
        ])
        .with_temperature(0.0)
        .with_max_tokens(10);
        let answer = self.ask("tile", request).await?;
        Ok(parse::affirmative(&answer))
    }

    async fn ask(&self, question: &'static str, request: VisionRequest) -> Result<String, OracleError> {
        let request = match &self.model {
            Some(model) => request.with_model(model.clone()),
            None => request,
        };

        let mut retry = 0;
        loop {
            match self.provider.complete(request.clone()).await {
                Ok(response) => {
                    debug!(
                        provider = self.provider.id(),
                        model = %response.model,
                        question,
                        answer = %response.text.trim(),
                        "Oracle answered"
                    );
                    return Ok(response.text);
                }
                Err(e) if e.is_retryable() && retry < self.retries => {
                    let wait = self.backoff_for(retry, &e);
                    warn!(
                        provider = self.provider.id(),
                        question,
                        "Oracle call failed ({}), retrying in {:?}",
                        e,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    retry += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn backoff_for(&self, retry: u32, error: &ProviderError) -> Duration {
        let linear = self.backoff.saturating_mul(retry + 1);
        match error {
            ProviderError::RateLimited {
                retry_after_seconds,
            } => linear.max(Duration::from_secs(*retry_after_seconds)),
            _ => linear,
        }
    }
}
