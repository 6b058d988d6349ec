//! Chrome DevTools Protocol surface for AutoSlide.
//!
//! Provides a pure Rust CDP client and [`GeetestSurface`], a
//! [`Surface`](autoslide_protocols::Surface) implementation driving a slider
//! puzzle in a Chrome tab started with `--remote-debugging-port`.

pub mod cdp;
mod surface;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use surface::GeetestSurface;

#[cfg(test)]
mod testing;
