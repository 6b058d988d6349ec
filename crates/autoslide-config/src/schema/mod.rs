//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod schema_browser;
mod schema_solver;

pub use schema_browser::*;
pub use schema_solver::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub solver: SolverConfig,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub puzzle: PuzzleConfig,
}

impl Config {
    /// Provider section for `id`, if configured.
    pub fn provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.get(id)
    }
}

/// Vision provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    /// Multiplier applied to this provider's raw distance estimates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<f64>,
}

impl ProviderConfig {
    /// API key, treating an empty string (e.g. an unset `${VAR:-}`) as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
