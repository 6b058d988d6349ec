//! Surface (page automation) errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("Surface not connected: {0}")]
    NotConnected(String),
}

impl SurfaceError {
    /// A required UI control did not appear (as opposed to an action failing).
    pub fn is_missing_element(&self) -> bool {
        matches!(self, SurfaceError::ElementNotFound(_) | SurfaceError::Timeout(_))
    }
}
