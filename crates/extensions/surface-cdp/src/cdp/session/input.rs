//! Mouse input for CDP page session.

use serde_json::json;
use tracing::{debug, trace};

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{MouseButton, MouseEventType};

use super::core::PageSession;

impl PageSession {
    async fn dispatch_mouse(
        &self,
        event: MouseEventType,
        x: f64,
        y: f64,
        button: MouseButton,
    ) -> Result<(), CdpError> {
        let mut params = json!({
            "type": event,
            "x": x,
            "y": y,
            "button": button,
        });
        match event {
            MouseEventType::MousePressed | MouseEventType::MouseReleased => {
                params["clickCount"] = json!(1);
            }
            MouseEventType::MouseMoved => {
                // Bitmask of buttons held during the move; left is 1.
                let buttons = if matches!(button, MouseButton::Left) { 1 } else { 0 };
                params["buttons"] = json!(buttons);
            }
        }

        self.call("Input.dispatchMouseEvent", Some(params)).await?;
        Ok(())
    }

    /// Press the left button at coordinates.
    pub async fn mouse_press(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.dispatch_mouse(MouseEventType::MouseMoved, x, y, MouseButton::None)
            .await?;
        self.dispatch_mouse(MouseEventType::MousePressed, x, y, MouseButton::Left)
            .await?;
        trace!("Mouse pressed at ({}, {})", x, y);
        Ok(())
    }

    /// Move the mouse; `held` drags with the left button down.
    pub async fn mouse_move(&self, x: f64, y: f64, held: bool) -> Result<(), CdpError> {
        let button = if held { MouseButton::Left } else { MouseButton::None };
        self.dispatch_mouse(MouseEventType::MouseMoved, x, y, button)
            .await
    }

    /// Release the left button at coordinates.
    pub async fn mouse_release(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.dispatch_mouse(MouseEventType::MouseReleased, x, y, MouseButton::Left)
            .await?;
        trace!("Mouse released at ({}, {})", x, y);
        Ok(())
    }

    /// Click at coordinates.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.mouse_press(x, y).await?;
        self.mouse_release(x, y).await?;
        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }
}
