//! DOM operations for CDP page session.

use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{BoxModel, DomNode};

use super::core::PageSession;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Get document root node.
    pub async fn get_document(&self) -> Result<DomNode, CdpError> {
        let result = self
            .call("DOM.getDocument", Some(json!({"depth": 0})))
            .await?;

        let root: DomNode = serde_json::from_value(result["root"].clone())?;
        Ok(root)
    }

    /// Query selector. `None` when nothing matches.
    pub async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let doc = self.get_document().await?;

        let result = self
            .call(
                "DOM.querySelector",
                Some(json!({
                    "nodeId": doc.node_id,
                    "selector": selector,
                })),
            )
            .await?;

        let node_id = result["nodeId"].as_i64().unwrap_or(0);
        if node_id == 0 {
            Ok(None)
        } else {
            Ok(Some(node_id))
        }
    }

    /// Get box model for node. `None` when the node is not rendered.
    pub async fn get_box_model(&self, node_id: i64) -> Result<Option<BoxModel>, CdpError> {
        let result = self
            .call("DOM.getBoxModel", Some(json!({"nodeId": node_id})))
            .await;

        match result {
            Ok(r) => {
                let model: BoxModel = serde_json::from_value(r["model"].clone())?;
                Ok(Some(model))
            }
            Err(CdpError::Protocol { code: -32000, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Box model of the first element matching `selector`.
    pub async fn element_box(&self, selector: &str) -> Result<BoxModel, CdpError> {
        let node_id = self
            .query_selector(selector)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(selector.to_string()))?;

        self.get_box_model(node_id)
            .await?
            .ok_or_else(|| CdpError::ElementNotFound(format!("{} (not visible)", selector)))
    }

    /// Wait until `selector` matches a rendered element and return its box model.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<BoxModel, CdpError> {
        let start = Instant::now();

        loop {
            match self.element_box(selector).await {
                Ok(model) => return Ok(model),
                Err(CdpError::ElementNotFound(_)) => {}
                Err(e) => return Err(e),
            }

            if start.elapsed() >= timeout {
                return Err(CdpError::ElementNotFound(selector.to_string()));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Click on element by selector.
    pub async fn click_selector(&self, selector: &str) -> Result<(), CdpError> {
        let (x, y) = self.element_box(selector).await?.center();
        self.click(x, y).await
    }
}
