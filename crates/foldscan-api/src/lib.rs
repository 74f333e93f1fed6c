//! HTTP API server.
//!
//! Exposes the scan pipeline over a small JSON API:
//!
//! ```text
//! GET  /          - health check
//! POST /scan      - run one scan against a product page URL
//! GET  /scans/... - captured screenshots (static)
//! ```
//!
//! Each scan opens a fresh page on the externally managed browser, applies
//! mobile emulation, navigates, runs the detectors and persists the
//! above-the-fold screenshot under the scans directory.

mod error;
mod handlers;
mod rate_limit;
mod routes;
mod screenshots;
mod server;
mod state;

pub use error::ApiError;
pub use rate_limit::RateLimiter;
pub use screenshots::ScreenshotStore;
pub use server::ApiServer;
pub use state::AppState;
