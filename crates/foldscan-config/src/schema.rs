//! Configuration schema.

use std::path::PathBuf;
use std::time::Duration;

use foldscan_core::{ScanTiming, SelectorSet};
use serde::Deserialize;

use crate::defaults;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub browser: BrowserConfig,
    pub scan: ScanConfig,
    pub selectors: SelectorConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL used to build screenshot links. Required in
    /// production; also read from the `BASE_URL` environment variable.
    pub base_url: Option<String>,
    pub scans_dir: PathBuf,
    /// Per-client cooldown between scans.
    pub rate_limit_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            base_url: None,
            scans_dir: PathBuf::from("public/scans"),
            rate_limit_ms: 3000,
        }
    }
}

/// Rendering engine settings. The browser process itself is managed
/// externally; foldscan only attaches to its debugging endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub cdp_endpoint: String,
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            cdp_endpoint: "http://localhost:9222".to_string(),
            navigation_timeout_ms: 30_000,
        }
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

/// Scan timing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub settle_ms: u64,
    pub modal_poll_interval_ms: u64,
    pub modal_poll_window_ms: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            settle_ms: 1500,
            modal_poll_interval_ms: 500,
            modal_poll_window_ms: 12_000,
        }
    }
}

impl ScanConfig {
    pub fn timing(&self) -> ScanTiming {
        ScanTiming {
            settle: Duration::from_millis(self.settle_ms),
            poll_interval: Duration::from_millis(self.modal_poll_interval_ms),
            poll_window: Duration::from_millis(self.modal_poll_window_ms),
        }
    }
}

/// Selector lists. Empty lists fall back to the built-in defaults, so a
/// config file can override one list without restating the others.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub price: Vec<String>,
    pub reviews: Vec<String>,
    pub shipping_phrases: Vec<String>,
    pub dialogs: Vec<String>,
}

impl SelectorConfig {
    pub fn selector_set(&self) -> SelectorSet {
        SelectorSet {
            reviews: or_default(&self.reviews, defaults::REVIEW_SELECTORS),
            price: or_default(&self.price, defaults::PRICE_SELECTORS),
            shipping_phrases: or_default(&self.shipping_phrases, defaults::SHIPPING_PHRASES),
            dialogs: or_default(&self.dialogs, defaults::DIALOG_SELECTORS),
        }
    }
}

fn or_default(configured: &[String], fallback: &[&str]) -> Vec<String> {
    if configured.is_empty() {
        fallback.iter().map(|s| s.to_string()).collect()
    } else {
        configured.to_vec()
    }
}
