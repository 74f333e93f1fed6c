//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use foldscan_config::Config;
use foldscan_core::{ScanTiming, SelectorSet};

use crate::rate_limit::RateLimiter;
use crate::screenshots::ScreenshotStore;

/// State shared by all request handlers.
pub struct AppState {
    /// Browser debugging endpoint scans attach to.
    pub cdp_endpoint: String,
    /// Navigation timeout for page loads.
    pub navigation_timeout: Duration,
    /// Selector lists driving the detectors.
    pub selectors: SelectorSet,
    /// Settle and poll timings.
    pub timing: ScanTiming,
    /// Per-client cooldown.
    pub rate_limiter: RateLimiter,
    /// Screenshot persistence.
    pub screenshots: ScreenshotStore,
}

impl AppState {
    /// Build state from configuration. `base_url` must already be
    /// resolved (config or environment).
    pub fn from_config(config: &Config, base_url: &str) -> std::io::Result<Arc<Self>> {
        Ok(Arc::new(Self {
            cdp_endpoint: config.browser.cdp_endpoint.clone(),
            navigation_timeout: config.browser.navigation_timeout(),
            selectors: config.selectors.selector_set(),
            timing: config.scan.timing(),
            rate_limiter: RateLimiter::new(Duration::from_millis(config.server.rate_limit_ms)),
            screenshots: ScreenshotStore::new(&config.server.scans_dir, base_url)?,
        }))
    }
}
