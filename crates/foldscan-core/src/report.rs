//! Scan result and diagnostics types.

use serde::Serialize;

use crate::geometry::Rect;

/// Review evidence verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    NotPresent,
    PresentBelowFold,
    VisibleAboveFold,
}

/// Price visibility verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceState {
    NotVisibleAboveFold,
    VisibleAboveFold,
}

/// Shipping mention verdict. Presence-only; fold position is not
/// considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingState {
    NotPresent,
    Present,
}

/// Blocking overlay verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalState {
    NotPresent,
    Present,
}

/// Per-stage counters and fold buckets for one review classification.
///
/// Created once per call, mutated only by that call, discarded after the
/// caller reads it. `candidates_found` counts selector matches, not
/// distinct elements; duplicates across selectors are kept.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDiagnostics {
    pub candidates_found: usize,
    pub filtered_by_media: usize,
    pub filtered_by_navigation: usize,
    pub filtered_by_content: usize,
    pub filtered_by_visibility: usize,
    pub valid_elements: usize,
    pub above_fold: Vec<FoldRecord>,
    pub below_fold: Vec<FoldRecord>,
}

/// Position (and, in diagnostics mode, identity) of one surviving review
/// element.
#[derive(Debug, Clone, Serialize)]
pub struct FoldRecord {
    pub position: Rect,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ElementDetail>,
}

/// Identity details captured only when diagnostics are requested.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDetail {
    pub tag_name: String,
    pub class_name: String,
    pub id: String,
    pub text_preview: String,
}

/// Immutable outcome of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub reviews: ReviewState,
    pub price: PriceState,
    pub shipping: ShippingState,
    pub modal: ModalState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<ReviewDiagnostics>,
}
