use std::time::Duration;

use super::*;
use crate::fixture::{FixtureElement, FixtureSurface};
use crate::report::{PriceState, ReviewState, ShippingState};
use crate::surface::{OverlayElement, OverlayStyle, OverlaySurvey};

fn fast_timing() -> ScanTiming {
    ScanTiming {
        settle: Duration::from_millis(100),
        poll_interval: Duration::from_millis(500),
        poll_window: Duration::from_secs(12),
    }
}

fn selector_set() -> SelectorSet {
    SelectorSet {
        reviews: vec![".jdgm-widget".to_string()],
        price: vec![".price".to_string()],
        shipping_phrases: vec!["free shipping".to_string()],
        dialogs: vec!["[role=\"dialog\"]".to_string()],
    }
}

fn modal_survey() -> OverlaySurvey {
    let mut survey = FixtureSurface::empty_survey();
    survey.semantic = Some(OverlayElement {
        rect: Some(crate::geometry::Rect::new(20.0, 200.0, 350.0, 400.0)),
        style: OverlayStyle {
            position: "fixed".to_string(),
            z_index: Some(1000),
            display: "block".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
        },
    });
    survey
}

#[tokio::test(start_paused = true)]
async fn full_scan_assembles_all_signals() {
    let surface = FixtureSurface::new()
        .with_elements(
            ".jdgm-widget",
            vec![FixtureElement::new("div", "jdgm-widget").with_rect(10.0, 100.0, 50.0, 20.0)],
        )
        .with_elements(
            ".price",
            vec![FixtureElement::new("span", "price").with_rect(10.0, 300.0, 60.0, 20.0)],
        )
        .with_body("Free shipping on all orders")
        .with_surveys(vec![modal_survey()]);

    let scanner = Scanner::new(selector_set()).with_timing(fast_timing());
    let outcome = scanner.scan(&surface, ScanOptions::default()).await.unwrap();

    assert_eq!(outcome.result.reviews, ReviewState::VisibleAboveFold);
    assert_eq!(outcome.result.price, PriceState::VisibleAboveFold);
    assert_eq!(outcome.result.shipping, ShippingState::Present);
    assert_eq!(outcome.result.modal, ModalState::Present);
    assert!(outcome.result.diagnostics.is_none());
    assert!(!outcome.screenshot.is_empty());
}

#[tokio::test(start_paused = true)]
async fn diagnostics_attached_only_when_requested() {
    let surface = FixtureSurface::new();
    let scanner = Scanner::new(selector_set()).with_timing(fast_timing());

    let outcome = scanner
        .scan(
            &surface,
            ScanOptions {
                include_diagnostics: true,
            },
        )
        .await
        .unwrap();
    assert!(outcome.result.diagnostics.is_some());
    assert_eq!(outcome.result.reviews, ReviewState::NotPresent);
}

#[tokio::test(start_paused = true)]
async fn poll_runs_to_full_window_and_last_state_wins() {
    // Modal appears on the first polls, then closes before the window
    // ends: the final state must be not_present.
    let surface = FixtureSurface::new().with_surveys(vec![
        modal_survey(),
        modal_survey(),
        FixtureSurface::empty_survey(),
    ]);

    let scanner = Scanner::new(selector_set()).with_timing(fast_timing());
    let outcome = scanner.scan(&surface, ScanOptions::default()).await.unwrap();
    assert_eq!(outcome.result.modal, ModalState::NotPresent);

    // 12s window at 500ms is one initial observation plus 24 ticks.
    let surveys = surface
        .calls()
        .iter()
        .filter(|c| c.as_str() == "survey")
        .count();
    assert_eq!(surveys, 25);
}

#[tokio::test(start_paused = true)]
async fn late_appearing_modal_is_reported() {
    let mut appearing = vec![FixtureSurface::empty_survey(); 20];
    appearing.push(modal_survey());
    let surface = FixtureSurface::new().with_surveys(appearing);

    let scanner = Scanner::new(selector_set()).with_timing(fast_timing());
    let outcome = scanner.scan(&surface, ScanOptions::default()).await.unwrap();
    assert_eq!(outcome.result.modal, ModalState::Present);
}

#[tokio::test(start_paused = true)]
async fn lost_surface_aborts_the_whole_scan() {
    // A dropped browser connection must surface as one scan-level error,
    // never as a partial result.
    let surface = FixtureSurface::new().lost();
    let scanner = Scanner::new(selector_set()).with_timing(fast_timing());
    let err = scanner
        .scan(&surface, ScanOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SurfaceError::SurfaceLost(_)));
}

#[tokio::test(start_paused = true)]
async fn surface_lost_mid_poll_is_not_degraded() {
    // One good survey, then the connection drops: the poll loop must
    // propagate the failure instead of resolving the tick to not_present.
    let surface = FixtureSurface::new()
        .with_surveys(vec![modal_survey()])
        .lost_after(1);
    let scanner = Scanner::new(selector_set()).with_timing(fast_timing());
    let result = scanner.scan(&surface, ScanOptions::default()).await;
    assert!(matches!(result, Err(SurfaceError::SurfaceLost(_))));
}

#[tokio::test(start_paused = true)]
async fn screenshot_is_captured_after_polling_and_before_detectors() {
    let surface = FixtureSurface::new()
        .with_elements(
            ".jdgm-widget",
            vec![FixtureElement::new("div", "jdgm-widget").with_rect(10.0, 100.0, 50.0, 20.0)],
        )
        .with_body("free shipping");

    let scanner = Scanner::new(selector_set()).with_timing(fast_timing());
    scanner.scan(&surface, ScanOptions::default()).await.unwrap();

    let calls = surface.calls();
    let capture_at = calls.iter().position(|c| c == "capture").unwrap();
    let last_survey = calls.iter().rposition(|c| c == "survey").unwrap();
    let first_query = calls.iter().position(|c| c.starts_with("query:")).unwrap();
    let body_at = calls.iter().position(|c| c == "body_text").unwrap();

    assert!(last_survey < capture_at, "poll window must close before capture");
    assert!(capture_at < first_query, "detectors run after the capture");
    assert!(capture_at < body_at);
}
