//! Request handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{ConnectInfo, State};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use foldscan_cdp::{CdpClient, CdpRenderSurface, MOBILE_USER_AGENT};
use foldscan_core::{
    ModalState, PriceState, ReviewDiagnostics, ReviewState, ScanOptions, ScanOutcome, Scanner,
    ShippingState, VIEWPORT,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Scan request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Product page URL to scan.
    pub url: Option<String>,

    /// Include per-stage review diagnostics in the response. Dev only.
    #[serde(default)]
    pub include_diagnostics: bool,
}

/// Scan response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub screenshot_url: String,
    pub results: SignalResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<DiagnosticsEnvelope>,
}

/// The four classified signals.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalResults {
    pub reviews: ReviewState,
    pub price: PriceState,
    pub shipping: ShippingState,
    pub modal_state: ModalState,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsEnvelope {
    pub reviews: ReviewDiagnostics,
}

/// Health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "foldscan",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Run one scan.
pub async fn scan(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    if let Err(wait) = state.rate_limiter.check(addr.ip()) {
        warn!("Rate limited {} for {}s", addr.ip(), wait);
        return Err(ApiError::RateLimited(wait));
    }

    let url = request.url.ok_or(ApiError::MissingUrl)?;
    url::Url::parse(&url).map_err(|_| ApiError::InvalidUrl)?;

    info!("Scanning {} for {}", url, addr.ip());

    let outcome = run_scan(&state, &url, request.include_diagnostics)
        .await
        .map_err(|e| {
            error!("Scan of {} failed: {}", url, e);
            ApiError::ScanFailed(e)
        })?;

    let screenshot_url = state
        .screenshots
        .save(&outcome.screenshot)
        .await
        .map_err(|e| ApiError::ScanFailed(format!("Failed to persist screenshot: {}", e)))?;

    let result = outcome.result;
    Ok(Json(ScanResponse {
        screenshot_url,
        results: SignalResults {
            reviews: result.reviews,
            price: result.price,
            shipping: result.shipping,
            modal_state: result.modal,
        },
        diagnostics: result
            .diagnostics
            .map(|reviews| DiagnosticsEnvelope { reviews }),
    }))
}

/// Open a fresh page, scan it, and close it again. Errors are stringly
/// typed here; the handler wraps them into the client-facing shape.
async fn run_scan(
    state: &AppState,
    url: &str,
    include_diagnostics: bool,
) -> Result<ScanOutcome, String> {
    let client = CdpClient::connect(&state.cdp_endpoint)
        .await
        .map_err(|e| e.to_string())?;
    let session = Arc::new(client.new_page().await.map_err(|e| e.to_string())?);

    let scan_result = async {
        session
            .emulate_mobile(
                VIEWPORT.width as u32,
                VIEWPORT.height as u32,
                MOBILE_USER_AGENT,
            )
            .await
            .map_err(|e| e.to_string())?;
        session
            .navigate(url, state.navigation_timeout)
            .await
            .map_err(|e| e.to_string())?;

        let surface = CdpRenderSurface::new(session.clone());
        Scanner::new(state.selectors.clone())
            .with_timing(state.timing.clone())
            .scan(&surface, ScanOptions {
                include_diagnostics,
            })
            .await
            .map_err(|e| e.to_string())
    }
    .await;

    // Best effort: the scan result stands whether or not teardown works.
    if let Err(e) = client.close_page(session.target_id()).await {
        warn!("Failed to close page {}: {}", session.target_id(), e);
    }

    scan_result
}
