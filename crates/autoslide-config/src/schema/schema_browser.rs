//! Browser connection and puzzle page configuration.

use serde::{Deserialize, Serialize};

/// Chrome DevTools connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Full endpoint override (e.g. a remote `http://host:9222`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Bound on a single DevTools command round trip.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Bound on waiting for a required control to become interactable.
    #[serde(default = "default_element_timeout_secs")]
    pub element_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            endpoint: None,
            request_timeout_secs: default_request_timeout_secs(),
            element_timeout_secs: default_element_timeout_secs(),
        }
    }
}

impl BrowserConfig {
    /// Get the CDP endpoint URL.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.debug_port))
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_element_timeout_secs() -> u64 {
    10
}

/// Puzzle page location and the selectors of its parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    #[serde(default = "default_url")]
    pub url: String,

    /// Control that opens the challenge.
    #[serde(default = "default_start")]
    pub start: String,

    /// Region captured for every observation.
    #[serde(default = "default_window")]
    pub window: String,

    /// Slider handle the pointer grips.
    #[serde(default = "default_handle")]
    pub handle: String,

    /// Puzzle piece moved along with the handle.
    #[serde(default = "default_piece")]
    pub piece: String,

    #[serde(default = "default_success")]
    pub success: String,

    #[serde(default = "default_success_text")]
    pub success_text: Option<String>,

    /// Control that loads a fresh puzzle.
    #[serde(default = "default_refresh")]
    pub refresh: String,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            start: default_start(),
            window: default_window(),
            handle: default_handle(),
            piece: default_piece(),
            success: default_success(),
            success_text: default_success_text(),
            refresh: default_refresh(),
        }
    }
}

fn default_url() -> String {
    "https://2captcha.com/demo/geetest".to_string()
}

fn default_start() -> String {
    ".geetest_radar_tip".to_string()
}

fn default_window() -> String {
    ".geetest_window".to_string()
}

fn default_handle() -> String {
    ".geetest_slider_button".to_string()
}

fn default_piece() -> String {
    ".geetest_canvas_slice".to_string()
}

fn default_success() -> String {
    ".geetest_success_radar_tip_content".to_string()
}

fn default_success_text() -> Option<String> {
    Some("Verification Success".to_string())
}

fn default_refresh() -> String {
    ".geetest_refresh_1".to_string()
}
