//! Geetest slider puzzle surface.

mod scripts;

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use autoslide_config::{BrowserConfig, PuzzleConfig};
use autoslide_protocols::{Indicator, Observation, Selector, Surface, SurfaceError};

use crate::cdp::{CdpError, PageSession, ScreenshotFormat};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// [`Surface`] over one Chrome tab showing a Geetest slider puzzle.
///
/// The pointer position of the current gesture is tracked here, since CDP
/// mouse events take absolute coordinates.
pub struct GeetestSurface {
    page: PageSession,
    start: Selector,
    refresh: Selector,
    element_timeout: Duration,
    pointer: Mutex<Option<(f64, f64)>>,
}

impl GeetestSurface {
    pub fn new(page: PageSession, start: impl Into<Selector>, refresh: impl Into<Selector>) -> Self {
        Self {
            page,
            start: start.into(),
            refresh: refresh.into(),
            element_timeout: Duration::from_secs(10),
            pointer: Mutex::new(None),
        }
    }

    pub fn from_config(page: PageSession, puzzle: &PuzzleConfig, browser: &BrowserConfig) -> Self {
        Self::new(page, puzzle.start.as_str(), puzzle.refresh.as_str())
            .with_element_timeout(Duration::from_secs(browser.element_timeout_secs))
    }

    /// How long to wait for a control before giving up on it.
    pub fn with_element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    pub fn page(&self) -> &PageSession {
        &self.page
    }

    /// Load the puzzle page and open the challenge.
    ///
    /// A missing start control is not an error: some pages render the puzzle
    /// immediately.
    pub async fn open(&self, url: &str) -> Result<(), SurfaceError> {
        *self.pointer.lock() = None;
        self.page.navigate(url).await?;
        info!("Opened puzzle page {}", url);

        match self
            .page
            .wait_for_selector(self.start.as_str(), self.element_timeout)
            .await
        {
            Ok(model) => {
                let (x, y) = model.center();
                self.page.click(x, y).await?;
                debug!("Clicked start control {}", self.start);
            }
            Err(CdpError::ElementNotFound(_)) => {
                warn!("Start control {} not present, continuing", self.start);
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    async fn indicator_present(&self, indicator: &Indicator) -> Result<bool, SurfaceError> {
        let text = self
            .page
            .evaluate(&scripts::element_text(indicator.selector.as_str()))
            .await?;
        Ok(text
            .as_str()
            .is_some_and(|text| indicator.matches_text(text)))
    }
}

#[async_trait]
impl Surface for GeetestSurface {
    async fn screenshot(&self, region: &Selector) -> Result<Observation, SurfaceError> {
        let model = self.page.element_box(region.as_str()).await?;
        let data = self
            .page
            .screenshot(ScreenshotFormat::Png, Some(model.clip()))
            .await
            .map_err(|e| SurfaceError::ScreenshotFailed(format!("{}: {}", region, e)))?;
        check_png(region, &data)?;
        Ok(Observation::png(region.to_string(), data))
    }

    async fn set_visual_offset(&self, element: &Selector, offset_px: f64) -> Result<(), SurfaceError> {
        let applied = self
            .page
            .evaluate(&scripts::translate_x(element.as_str(), offset_px))
            .await?;
        if applied.as_bool() != Some(true) {
            return Err(SurfaceError::ElementNotFound(element.to_string()));
        }
        Ok(())
    }

    async fn press_hold(&self, element: &Selector) -> Result<(), SurfaceError> {
        let (x, y) = self.page.element_box(element.as_str()).await?.center();
        self.page.mouse_press(x, y).await?;
        *self.pointer.lock() = Some((x, y));
        debug!("Holding {} at ({:.1}, {:.1})", element, x, y);
        Ok(())
    }

    async fn move_by(&self, delta_px: f64) -> Result<(), SurfaceError> {
        let (x, y) = (*self.pointer.lock())
            .ok_or_else(|| SurfaceError::ActionFailed("move without a held pointer".to_string()))?;
        let x = x + delta_px;
        self.page.mouse_move(x, y, true).await?;
        *self.pointer.lock() = Some((x, y));
        Ok(())
    }

    async fn release(&self) -> Result<(), SurfaceError> {
        let Some((x, y)) = self.pointer.lock().take() else {
            debug!("Release without a held pointer ignored");
            return Ok(());
        };
        self.page.mouse_release(x, y).await?;
        Ok(())
    }

    async fn poll_for_indicator(
        &self,
        indicator: &Indicator,
        timeout: Duration,
    ) -> Result<bool, SurfaceError> {
        let start = tokio::time::Instant::now();
        loop {
            if self.indicator_present(indicator).await? {
                return Ok(true);
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL.min(timeout - elapsed)).await;
        }
    }

    async fn trigger_reset(&self) -> Result<(), SurfaceError> {
        *self.pointer.lock() = None;
        let model = self
            .page
            .wait_for_selector(self.refresh.as_str(), self.element_timeout)
            .await?;
        let (x, y) = model.center();
        self.page.click(x, y).await?;
        info!("Requested a fresh puzzle via {}", self.refresh);
        Ok(())
    }
}

/// Reject captures that are not a PNG before they reach the oracle.
fn check_png(region: &Selector, data: &str) -> Result<(), SurfaceError> {
    let bytes = BASE64
        .decode(data)
        .map_err(|e| SurfaceError::ScreenshotFailed(format!("{}: {}", region, e)))?;
    if !bytes.starts_with(PNG_SIGNATURE) {
        return Err(SurfaceError::ScreenshotFailed(format!(
            "{}: capture is not a PNG image",
            region
        )));
    }
    Ok(())
}
