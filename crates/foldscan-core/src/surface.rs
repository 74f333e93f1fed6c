//! Render surface abstraction.
//!
//! A [`RenderSurface`] represents one loaded, live page and exposes a
//! fixed, enumerated set of read-only query operations: query-by-selector,
//! style, rect, text and ancestor-walk. Detectors never run arbitrary code
//! against the page; everything they need is one of these capabilities,
//! which keeps the whole pipeline implementable against an in-memory
//! fixture tree.
//!
//! Handles can go stale at any moment (the page's own scripts keep
//! mutating the document), so every access returns a `Result` and callers
//! resolve degradable failures to their conservative branch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Rect;

/// Errors raised by a render surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Malformed or unsupported selector. Degradable.
    #[error("selector failed: {0}")]
    Selector(String),

    /// A remote evaluation threw or returned garbage. Degradable.
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// The element handle is no longer attached. Degradable.
    #[error("element no longer attached")]
    StaleElement,

    /// The surface itself became unusable. Fatal to the scan.
    #[error("render surface lost: {0}")]
    SurfaceLost(String),
}

impl SurfaceError {
    /// Fatal errors abort the whole scan; everything else resolves to the
    /// conservative branch of the single check that hit it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SurfaceError::SurfaceLost(_))
    }
}

/// Resolve a degradable error to `fallback`, propagating fatal ones.
pub(crate) fn degrade<T>(result: Result<T, SurfaceError>, fallback: T) -> Result<T, SurfaceError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            tracing::debug!("degraded to conservative branch: {e}");
            Ok(fallback)
        }
    }
}

/// Tag, class and id of one element.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementDescriptor {
    pub tag_name: String,
    pub class_name: String,
    pub id: String,
}

/// One node on the path from an element up to (excluding) the document
/// body. The chain starts at the element itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AncestorDescriptor {
    pub tag_name: String,
    pub class_name: String,
    pub role: Option<String>,
}

/// Computed-style facts for one overlay candidate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    pub position: String,
    pub z_index: Option<i64>,
    pub display: String,
    pub visibility: String,
    pub opacity: f64,
}

/// One element observed by the overlay survey.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayElement {
    pub rect: Option<Rect>,
    pub style: OverlayStyle,
}

/// Live inner window dimensions, the denominator for coverage ratios.
/// Distinct from the fixed viewport used for fold position tests.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

/// Parameters for the atomic whole-document overlay survey.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayProbe {
    /// Dialog/modal selector patterns tried in order for the fast path.
    pub dialog_selectors: Vec<String>,
    /// z-index at or above which an absolutely positioned element counts
    /// as overlay-positioned.
    pub min_z_index: i64,
}

/// Result of one atomic overlay survey.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySurvey {
    pub window: WindowSize,
    /// First element matching a dialog pattern, if any, regardless of its
    /// visibility. Classification decides what it means.
    pub semantic: Option<OverlayElement>,
    /// Style-prefiltered overlay-positioned body elements.
    pub candidates: Vec<OverlayElement>,
}

/// Read-only handle to one element of a live page.
#[async_trait]
pub trait ElementHandle: Send + Sync {
    /// Viewport-relative bounding box; `None` when the element has no
    /// layout.
    async fn bounding_box(&self) -> Result<Option<Rect>, SurfaceError>;

    async fn descriptor(&self) -> Result<ElementDescriptor, SurfaceError>;

    async fn text_content(&self) -> Result<String, SurfaceError>;

    /// Inner markup, used for inline-vector-graphic and icon-class checks.
    async fn inner_markup(&self) -> Result<String, SurfaceError>;

    /// The element and its ancestors, innermost first, up to but excluding
    /// the document body.
    async fn ancestor_chain(&self) -> Result<Vec<AncestorDescriptor>, SurfaceError>;
}

/// One loaded page. Owned for the duration of exactly one scan.
#[async_trait]
pub trait RenderSurface: Send + Sync {
    type Element: ElementHandle;

    /// All elements matching `selector`. Malformed selectors yield an
    /// empty list, never an error.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, SurfaceError>;

    /// Full visible text of the document body.
    async fn body_text(&self) -> Result<String, SurfaceError>;

    /// The single atomic whole-document query backing the modal detector.
    async fn overlay_survey(&self, probe: &OverlayProbe) -> Result<OverlaySurvey, SurfaceError>;

    /// Capture PNG bytes clipped to `clip`.
    async fn capture_viewport(&self, clip: Rect) -> Result<Vec<u8>, SurfaceError>;
}
