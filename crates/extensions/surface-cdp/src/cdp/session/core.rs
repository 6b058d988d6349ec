//! Core session struct and CDP command dispatch.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{ScreenshotFormat, Viewport};
use crate::cdp::transport::Transport;

/// A session attached to a single page/target.
///
/// Shares the browser connection of the [`CdpClient`](crate::CdpClient)
/// that created it and must not outlive that client.
pub struct PageSession {
    pub(super) target_id: String,
    pub(super) session_id: String,
    pub(super) transport: Arc<Transport>,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, transport: Arc<Transport>) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Take a screenshot, optionally clipped to a page rectangle. Returns base64 data.
    pub async fn screenshot(
        &self,
        format: ScreenshotFormat,
        clip: Option<Viewport>,
    ) -> Result<String, CdpError> {
        let mut params = json!({ "format": format });

        if let Some(c) = clip {
            params["clip"] = serde_json::to_value(c)?;
        }

        let result = self.call("Page.captureScreenshot", Some(params)).await?;

        result["data"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CdpError::InvalidResponse("Missing screenshot data".to_string()))
    }
}
