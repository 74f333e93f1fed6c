//! Modal/overlay detector.
//!
//! Decides whether a blocking overlay (cookie banner, newsletter popup,
//! age gate) currently covers the page. Two stages over one atomic
//! [`OverlaySurvey`]:
//!
//! 1. semantic fast path: the first element matching a dialog pattern
//!    counts as a modal when it is style-visible with positive area,
//!    independent of its size;
//! 2. coverage fallback: a bespoke overlay with no recognizable markup
//!    must dominate the screen — style-visible, overlay-positioned and
//!    covering at least 30% of the live window. A small fixed banner never
//!    qualifies.
//!
//! Coverage uses the live inner window as its denominator, not the fixed
//! viewport used for fold position tests.

use tracing::warn;

use crate::report::ModalState;
use crate::surface::{OverlayProbe, OverlayStyle, OverlaySurvey, RenderSurface, SurfaceError};

/// z-index at or above which an absolutely positioned element counts as
/// overlay-positioned. Fixed and sticky elements qualify regardless.
pub const MIN_OVERLAY_Z_INDEX: i64 = 100;

/// Share of the live window a bespoke overlay must cover.
pub const COVERAGE_THRESHOLD: f64 = 0.30;

pub struct ModalDetector<'a> {
    dialog_selectors: &'a [String],
}

impl<'a> ModalDetector<'a> {
    pub fn new(dialog_selectors: &'a [String]) -> Self {
        Self { dialog_selectors }
    }

    pub fn probe(&self) -> OverlayProbe {
        OverlayProbe {
            dialog_selectors: self.dialog_selectors.to_vec(),
            min_z_index: MIN_OVERLAY_Z_INDEX,
        }
    }

    /// Run one atomic survey and classify it. A degraded survey resolves
    /// to `not_present`.
    pub async fn detect<S: RenderSurface>(&self, surface: &S) -> Result<ModalState, SurfaceError> {
        match surface.overlay_survey(&self.probe()).await {
            Ok(survey) => Ok(classify_survey(&survey)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!("overlay survey degraded: {e}");
                Ok(ModalState::NotPresent)
            }
        }
    }
}

/// Pure classification over one survey snapshot.
///
/// Survey implementations may pre-filter candidates in-page for cost, but
/// the full style/position/coverage rules are re-applied here so fixture
/// surfaces exercise the same decision code as the live one.
pub fn classify_survey(survey: &OverlaySurvey) -> ModalState {
    if let Some(semantic) = &survey.semantic {
        if style_visible(&semantic.style) {
            if let Some(rect) = &semantic.rect {
                if rect.area() > 0.0 {
                    return ModalState::Present;
                }
            }
        }
    }

    let window_area = survey.window.width * survey.window.height;
    if window_area <= 0.0 {
        return ModalState::NotPresent;
    }
    for candidate in &survey.candidates {
        if !style_visible(&candidate.style) || !overlay_positioned(&candidate.style) {
            continue;
        }
        let Some(rect) = &candidate.rect else {
            continue;
        };
        let visible_area = rect
            .clamp_to(survey.window.width, survey.window.height)
            .area();
        if visible_area <= 0.0 {
            continue;
        }
        if visible_area / window_area >= COVERAGE_THRESHOLD {
            return ModalState::Present;
        }
    }
    ModalState::NotPresent
}

fn style_visible(style: &OverlayStyle) -> bool {
    style.display != "none" && style.visibility != "hidden" && style.opacity > 0.0
}

fn overlay_positioned(style: &OverlayStyle) -> bool {
    match style.position.as_str() {
        "fixed" | "sticky" => true,
        "absolute" => style.z_index.is_some_and(|z| z >= MIN_OVERLAY_Z_INDEX),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::surface::{OverlayElement, WindowSize};

    fn window() -> WindowSize {
        WindowSize {
            width: 390.0,
            height: 844.0,
        }
    }

    fn visible_style(position: &str, z_index: Option<i64>) -> OverlayStyle {
        OverlayStyle {
            position: position.to_string(),
            z_index,
            display: "block".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
        }
    }

    fn survey(semantic: Option<OverlayElement>, candidates: Vec<OverlayElement>) -> OverlaySurvey {
        OverlaySurvey {
            window: window(),
            semantic,
            candidates,
        }
    }

    /// Rect covering the given fraction of the test window.
    fn covering(fraction: f64) -> Rect {
        Rect::new(0.0, 0.0, 390.0, 844.0 * fraction)
    }

    #[test]
    fn semantic_dialog_is_present_regardless_of_size() {
        let dialog = OverlayElement {
            rect: Some(Rect::new(40.0, 300.0, 60.0, 40.0)),
            style: visible_style("static", None),
        };
        assert_eq!(classify_survey(&survey(Some(dialog), vec![])), ModalState::Present);
    }

    #[test]
    fn hidden_semantic_dialog_does_not_count() {
        let mut style = visible_style("fixed", Some(1000));
        style.display = "none".to_string();
        let dialog = OverlayElement {
            rect: Some(Rect::new(0.0, 0.0, 390.0, 844.0)),
            style,
        };
        assert_eq!(
            classify_survey(&survey(Some(dialog), vec![])),
            ModalState::NotPresent
        );
    }

    #[test]
    fn zero_opacity_semantic_dialog_does_not_count() {
        let mut style = visible_style("fixed", Some(1000));
        style.opacity = 0.0;
        let dialog = OverlayElement {
            rect: Some(Rect::new(0.0, 0.0, 390.0, 844.0)),
            style,
        };
        assert_eq!(
            classify_survey(&survey(Some(dialog), vec![])),
            ModalState::NotPresent
        );
    }

    #[test]
    fn fixed_overlay_covering_35_percent_is_present() {
        let overlay = OverlayElement {
            rect: Some(covering(0.35)),
            style: visible_style("fixed", None),
        };
        assert_eq!(classify_survey(&survey(None, vec![overlay])), ModalState::Present);
    }

    #[test]
    fn fixed_banner_covering_10_percent_is_not_present() {
        let banner = OverlayElement {
            rect: Some(covering(0.10)),
            style: visible_style("fixed", Some(9999)),
        };
        assert_eq!(
            classify_survey(&survey(None, vec![banner])),
            ModalState::NotPresent
        );
    }

    #[test]
    fn absolute_overlay_needs_high_z_index() {
        let low = OverlayElement {
            rect: Some(covering(0.9)),
            style: visible_style("absolute", Some(99)),
        };
        assert_eq!(classify_survey(&survey(None, vec![low])), ModalState::NotPresent);

        let high = OverlayElement {
            rect: Some(covering(0.9)),
            style: visible_style("absolute", Some(100)),
        };
        assert_eq!(classify_survey(&survey(None, vec![high])), ModalState::Present);
    }

    #[test]
    fn static_element_is_never_an_overlay() {
        let block = OverlayElement {
            rect: Some(covering(1.0)),
            style: visible_style("static", Some(5000)),
        };
        assert_eq!(classify_survey(&survey(None, vec![block])), ModalState::NotPresent);
    }

    #[test]
    fn offscreen_area_does_not_count_toward_coverage() {
        // Tall drawer mostly below the window: only the on-screen part
        // counts.
        let drawer = OverlayElement {
            rect: Some(Rect::new(0.0, 760.0, 390.0, 2000.0)),
            style: visible_style("fixed", None),
        };
        assert_eq!(
            classify_survey(&survey(None, vec![drawer])),
            ModalState::NotPresent
        );
    }

    #[tokio::test]
    async fn detector_degrades_missing_survey_to_not_present() {
        use crate::fixture::FixtureSurface;
        let dialogs = vec!["[role=\"dialog\"]".to_string()];
        let surface = FixtureSurface::new();
        let state = ModalDetector::new(&dialogs).detect(&surface).await.unwrap();
        assert_eq!(state, ModalState::NotPresent);
    }
}
