//! Shipping mention detector.

use crate::report::ShippingState;
use crate::surface::{RenderSurface, SurfaceError, degrade};

/// Detects shipping-related phrases anywhere in the page body text.
///
/// Presence-only: a plain lowercase substring match, not word-boundary
/// aware, with no fold test.
pub struct ShippingDetector<'a> {
    phrases: &'a [String],
}

impl<'a> ShippingDetector<'a> {
    pub fn new(phrases: &'a [String]) -> Self {
        Self { phrases }
    }

    pub async fn detect<S: RenderSurface>(
        &self,
        surface: &S,
    ) -> Result<ShippingState, SurfaceError> {
        let text = degrade(surface.body_text().await, String::new())?.to_lowercase();
        let present = self
            .phrases
            .iter()
            .any(|phrase| text.contains(&phrase.to_lowercase()));
        Ok(if present {
            ShippingState::Present
        } else {
            ShippingState::NotPresent
        })
    }
}
