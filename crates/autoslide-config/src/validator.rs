//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_solver(config, &mut result);
        Self::validate_providers(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_puzzle(config, &mut result);

        Ok(result)
    }

    fn validate_solver(config: &Config, result: &mut ValidationResult) {
        let solver = &config.solver;

        if solver.max_offset == 0 {
            result.add_error(ValidationError::new(
                "solver.max_offset",
                "max_offset must be greater than 0",
            ));
        }

        if solver.direction_low_threshold >= solver.direction_high_threshold {
            result.add_error(ValidationError::new(
                "solver.direction_low_threshold",
                format!(
                    "direction_low_threshold ({}) must be below direction_high_threshold ({})",
                    solver.direction_low_threshold, solver.direction_high_threshold
                ),
            ));
        }

        if solver.direction_high_threshold > solver.max_offset {
            result.add_warning(ValidationWarning::new(
                "solver.direction_high_threshold",
                "direction_high_threshold exceeds max_offset, the high band is unreachable",
            ));
        }

        if solver.scan_step == 0 {
            result.add_error(ValidationError::new(
                "solver.scan_step",
                "scan_step must be greater than 0",
            ));
        }

        if solver.scan_count == 0 {
            result.add_error(ValidationError::new(
                "solver.scan_count",
                "scan_count must be greater than 0",
            ));
        }

        if solver.max_attempts == 0 {
            result.add_error(ValidationError::new(
                "solver.max_attempts",
                "max_attempts must be greater than 0",
            ));
        }

        if solver.verify_polls == 0 {
            result.add_error(ValidationError::new(
                "solver.verify_polls",
                "verify_polls must be greater than 0",
            ));
        }

        let [low, high] = solver.grab_pause_ms;
        if low > high {
            result.add_error(ValidationError::new(
                "solver.grab_pause_ms",
                format!("grab_pause_ms lower bound {} exceeds upper bound {}", low, high),
            ));
        }

        if solver.tile_concurrency == 0 {
            result.add_error(ValidationError::new(
                "solver.tile_concurrency",
                "tile_concurrency must be greater than 0",
            ));
        }
    }

    fn validate_providers(config: &Config, result: &mut ValidationResult) {
        for (name, provider) in &config.providers {
            if provider.api_key().is_none() {
                result.add_warning(ValidationWarning::new(
                    format!("providers.{}.api_key", name),
                    "API key is not set, may need to be set via environment variable",
                ));
            }

            if let Some(ref url) = provider.base_url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.base_url", name),
                        "base_url must start with http:// or https://",
                    ));
                }
            }

            if let Some(factor) = provider.calibration {
                if !factor.is_finite() || factor <= 0.0 {
                    result.add_error(ValidationError::new(
                        format!("providers.{}.calibration", name),
                        "calibration must be a positive number",
                    ));
                }
            }
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        if config.browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if config.browser.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_puzzle(config: &Config, result: &mut ValidationResult) {
        let puzzle = &config.puzzle;
        let selectors = [
            ("puzzle.start", &puzzle.start),
            ("puzzle.window", &puzzle.window),
            ("puzzle.handle", &puzzle.handle),
            ("puzzle.piece", &puzzle.piece),
            ("puzzle.success", &puzzle.success),
            ("puzzle.refresh", &puzzle.refresh),
        ];
        for (path, selector) in selectors {
            if selector.trim().is_empty() {
                result.add_error(ValidationError::new(path, "Selector cannot be empty"));
            }
        }

        if !puzzle.url.starts_with("http://") && !puzzle.url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "puzzle.url",
                "url must start with http:// or https://",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
