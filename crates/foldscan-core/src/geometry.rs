//! Viewport geometry and fold classification.

use serde::{Deserialize, Serialize};

/// Locked mobile viewport. All fold math is relative to this constant,
/// never to the live window size.
pub const VIEWPORT: Viewport = Viewport {
    width: 390.0,
    height: 844.0,
};

/// Minimum width/height for an element to count as visually present.
/// Some review widgets render zero-size anchor/toggle nodes that must
/// not count as evidence.
pub const MIN_DIMENSION: f64 = 8.0;

/// Fixed viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Viewport-relative bounding rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersection with the `[0, width] × [0, height]` region, clamped to
    /// zero size when disjoint.
    pub fn clamp_to(&self, width: f64, height: f64) -> Rect {
        let x0 = self.x.max(0.0);
        let y0 = self.y.max(0.0);
        let x1 = (self.x + self.width).min(width);
        let y1 = (self.y + self.height).min(height);
        Rect {
            x: x0,
            y: y0,
            width: (x1 - x0).max(0.0),
            height: (y1 - y0).max(0.0),
        }
    }
}

/// Fails closed: a missing or degenerate rect is never visually present.
pub fn is_visually_present(rect: Option<&Rect>) -> bool {
    match rect {
        Some(r) => r.width >= MIN_DIMENSION && r.height >= MIN_DIMENSION,
        None => false,
    }
}

/// `true` when the rect starts above the fold line. There is no horizontal
/// test; horizontal overflow is not considered off-fold.
pub fn is_above_fold(rect: &Rect) -> bool {
    rect.y < VIEWPORT.height
}
