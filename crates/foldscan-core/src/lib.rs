//! Core classification pipeline for above-the-fold page audits.
//!
//! Inspects one rendered mobile product page through a [`surface::RenderSurface`]
//! and classifies four independent signals: review evidence, price
//! visibility, shipping mentions and modal/overlay presence.
//!
//! The heuristics are deliberately conservative: broad selector queries
//! return many false-positive-prone candidates, and every per-element
//! failure (stale handle, rejected evaluation) resolves to the branch that
//! reports *less* evidence, never more. Only the loss of the surface itself
//! aborts a scan.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   query/style/rect   ┌────────────────┐
//! │  Scanner  │ ◄──────────────────► │  RenderSurface │
//! │ (polling) │                      │  (live page)   │
//! └───────────┘                      └────────────────┘
//!       │
//!       ▼
//!  reviews / price / shipping / modal detectors → ScanResult
//! ```

pub mod detect;
pub mod geometry;
pub mod report;
pub mod scanner;
pub mod surface;

#[cfg(test)]
pub(crate) mod fixture;

pub use geometry::{MIN_DIMENSION, Rect, VIEWPORT, Viewport, is_above_fold, is_visually_present};
pub use report::{
    ElementDetail, FoldRecord, ModalState, PriceState, ReviewDiagnostics, ReviewState, ScanResult,
    ShippingState,
};
pub use scanner::{ScanOptions, ScanOutcome, ScanTiming, Scanner, SelectorSet};
pub use surface::{
    AncestorDescriptor, ElementDescriptor, ElementHandle, OverlayElement, OverlayProbe,
    OverlayStyle, OverlaySurvey, RenderSurface, SurfaceError, WindowSize,
};
