//! Price visibility detector.

use tracing::debug;

use crate::geometry::is_above_fold;
use crate::report::PriceState;
use crate::surface::{ElementHandle, RenderSurface, SurfaceError, degrade};

/// Detects whether a price is visible above the fold.
///
/// Price selectors are precise enough that no content allowlist or
/// media/navigation exclusion is applied. The first matching element with
/// a present, above-fold, positive-area bounding box wins; iteration order
/// is selector-list order, then DOM-match order.
pub struct PriceDetector<'a> {
    selectors: &'a [String],
}

impl<'a> PriceDetector<'a> {
    pub fn new(selectors: &'a [String]) -> Self {
        Self { selectors }
    }

    pub async fn detect<S: RenderSurface>(&self, surface: &S) -> Result<PriceState, SurfaceError> {
        for selector in self.selectors {
            let elements = degrade(surface.query_all(selector).await, Vec::new())?;
            for element in elements {
                let rect = degrade(element.bounding_box().await, None)?;
                if let Some(rect) = rect {
                    if is_above_fold(&rect) && rect.width > 0.0 && rect.height > 0.0 {
                        debug!(selector, "price visible above fold");
                        return Ok(PriceState::VisibleAboveFold);
                    }
                }
            }
        }
        Ok(PriceState::NotVisibleAboveFold)
    }
}
