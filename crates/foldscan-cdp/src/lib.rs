//! Chrome DevTools Protocol render surface.
//!
//! Implements `foldscan_core::RenderSurface` over a live Chrome/Chromium
//! instance via CDP. Pure Rust, no driver binaries: an HTTP endpoint for
//! target discovery and one WebSocket for the protocol itself.
//!
//! The browser process is managed externally. Start it with remote
//! debugging enabled:
//!
//! ```bash
//! chromium --headless --remote-debugging-port=9222
//! ```
//!
//! Each scan attaches to a fresh page target, applies mobile emulation
//! (390×844, iPhone Safari user agent), navigates, and hands the page
//! session to the core scanner as a [`CdpRenderSurface`].

mod client;
mod error;
mod js;
mod protocol;
mod session;
mod surface;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::{BrowserVersion, PageInfo};
pub use session::PageSession;
pub use surface::{CdpElement, CdpRenderSurface, MOBILE_USER_AGENT};
