//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! Connects to Chrome/Chromium via WebSocket and speaks the CDP JSON-RPC
//! protocol.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let page = client.new_page(None).await?;
//! page.navigate("https://2captcha.com/demo/geetest").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;
mod transport;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
