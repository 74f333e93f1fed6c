//! Scan orchestration.
//!
//! Sequences the detectors into one coherent scan and resolves the timing
//! race between modal appearance and screenshot capture: overlays can show
//! up seconds after initial paint, so the modal detector is polled over a
//! fixed window and the screenshot is taken only once that window closes.
//! The captured image and the reported modal state therefore describe the
//! same instant.

use std::time::Duration;

use tracing::{debug, info};

use crate::detect::{ModalDetector, PriceDetector, ReviewClassifier, ShippingDetector};
use crate::geometry::{Rect, VIEWPORT};
use crate::report::{ModalState, ScanResult};
use crate::surface::{RenderSurface, SurfaceError};

/// Selector lists and keyword phrases driving the detectors. Configuration
/// data, not logic.
#[derive(Debug, Clone, Default)]
pub struct SelectorSet {
    pub reviews: Vec<String>,
    pub price: Vec<String>,
    pub shipping_phrases: Vec<String>,
    pub dialogs: Vec<String>,
}

/// Settle and poll timings. Injectable so tests can run the orchestrator
/// under `tokio::time::pause`.
#[derive(Debug, Clone)]
pub struct ScanTiming {
    /// Delay after load before modal polling starts, giving widgets time
    /// to mount.
    pub settle: Duration,
    /// Fixed interval between modal polls.
    pub poll_interval: Duration,
    /// Total modal polling window, always run to completion.
    pub poll_window: Duration,
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(1500),
            poll_interval: Duration::from_millis(500),
            poll_window: Duration::from_secs(12),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub include_diagnostics: bool,
}

/// Result plus the screenshot captured at the modal-consistent instant.
#[derive(Debug)]
pub struct ScanOutcome {
    pub result: ScanResult,
    pub screenshot: Vec<u8>,
}

/// Runs one full scan against a loaded surface.
pub struct Scanner {
    selectors: SelectorSet,
    timing: ScanTiming,
}

impl Scanner {
    pub fn new(selectors: SelectorSet) -> Self {
        Self {
            selectors,
            timing: ScanTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: ScanTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Scan `surface` end to end.
    ///
    /// The modal poll always runs to the end of its window rather than
    /// stopping on first detection, so the last observed state reflects
    /// the page even when an overlay flickers or closes mid-window. The
    /// screenshot is captured immediately after the window closes; the
    /// remaining detectors are timing-independent and run afterwards.
    pub async fn scan<S: RenderSurface>(
        &self,
        surface: &S,
        options: ScanOptions,
    ) -> Result<ScanOutcome, SurfaceError> {
        tokio::time::sleep(self.timing.settle).await;

        let modal = self.poll_modal(surface).await?;

        let clip = Rect::new(0.0, 0.0, VIEWPORT.width, VIEWPORT.height);
        let screenshot = surface.capture_viewport(clip).await?;

        let (reviews, diagnostics) = ReviewClassifier::new(&self.selectors.reviews)
            .classify(surface, options.include_diagnostics)
            .await?;
        let price = PriceDetector::new(&self.selectors.price)
            .detect(surface)
            .await?;
        let shipping = ShippingDetector::new(&self.selectors.shipping_phrases)
            .detect(surface)
            .await?;

        info!(?reviews, ?price, ?shipping, ?modal, "scan complete");
        Ok(ScanOutcome {
            result: ScanResult {
                reviews,
                price,
                shipping,
                modal,
                diagnostics: options.include_diagnostics.then_some(diagnostics),
            },
            screenshot,
        })
    }

    /// Strictly sequential fixed-interval poll: each detector call
    /// completes before the next tick fires. The last observation wins.
    async fn poll_modal<S: RenderSurface>(&self, surface: &S) -> Result<ModalState, SurfaceError> {
        let detector = ModalDetector::new(&self.selectors.dialogs);
        let deadline = tokio::time::Instant::now() + self.timing.poll_window;

        let mut state = detector.detect(surface).await?;
        loop {
            let next = tokio::time::Instant::now() + self.timing.poll_interval;
            if next > deadline {
                break;
            }
            tokio::time::sleep_until(next).await;
            state = detector.detect(surface).await?;
            debug!(?state, "modal poll tick");
        }
        Ok(state)
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
