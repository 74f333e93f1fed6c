//! `RenderSurface` implementation over a CDP page session.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use foldscan_core::{
    AncestorDescriptor, ElementDescriptor, ElementHandle, OverlayProbe, OverlaySurvey, Rect,
    RenderSurface, SurfaceError,
};

use crate::error::CdpError;
use crate::js;
use crate::session::PageSession;

/// iPhone Safari user agent applied under mobile emulation.
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

/// Map a transport-level failure to its scan-facing severity.
///
/// Connection-shaped errors mean the page is gone and the scan cannot
/// produce a trustworthy answer; everything else degrades to the
/// conservative branch of whichever check hit it.
fn surface_err(e: CdpError) -> SurfaceError {
    match e {
        CdpError::SessionClosed
        | CdpError::WebSocket(_)
        | CdpError::ConnectionFailed(_)
        | CdpError::BrowserNotAvailable(_)
        | CdpError::NavigationFailed(_)
        | CdpError::Http(_) => SurfaceError::SurfaceLost(e.to_string()),
        other => SurfaceError::Evaluation(other.to_string()),
    }
}

/// Element-level failures additionally treat protocol errors as staleness:
/// the page's own scripts detach nodes underneath us all the time.
fn element_err(e: CdpError) -> SurfaceError {
    match e {
        CdpError::Protocol { .. } => SurfaceError::StaleElement,
        other => surface_err(other),
    }
}

/// One element of a live page, held as a runtime object.
pub struct CdpElement {
    session: Arc<PageSession>,
    object_id: String,
}

impl CdpElement {
    async fn invoke(&self, function: &str) -> Result<Value, SurfaceError> {
        self.session
            .call_function_on(&self.object_id, function)
            .await
            .map_err(element_err)
    }
}

#[async_trait]
impl ElementHandle for CdpElement {
    async fn bounding_box(&self) -> Result<Option<Rect>, SurfaceError> {
        let value = self.invoke(js::RECT_FN).await?;
        if value.is_null() {
            return Ok(None);
        }
        let rect: Rect = serde_json::from_value(value)
            .map_err(|e| SurfaceError::Evaluation(format!("bad rect shape: {}", e)))?;
        Ok(Some(rect))
    }

    async fn descriptor(&self) -> Result<ElementDescriptor, SurfaceError> {
        let value = self.invoke(js::DESCRIPTOR_FN).await?;
        serde_json::from_value(value)
            .map_err(|e| SurfaceError::Evaluation(format!("bad descriptor shape: {}", e)))
    }

    async fn text_content(&self) -> Result<String, SurfaceError> {
        let value = self.invoke(js::TEXT_FN).await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    async fn inner_markup(&self) -> Result<String, SurfaceError> {
        let value = self.invoke(js::MARKUP_FN).await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    async fn ancestor_chain(&self) -> Result<Vec<AncestorDescriptor>, SurfaceError> {
        let value = self.invoke(js::ANCESTOR_CHAIN_FN).await?;
        serde_json::from_value(value)
            .map_err(|e| SurfaceError::Evaluation(format!("bad ancestor shape: {}", e)))
    }
}

/// A live page exposed to the scan pipeline.
pub struct CdpRenderSurface {
    session: Arc<PageSession>,
}

impl CdpRenderSurface {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl RenderSurface for CdpRenderSurface {
    type Element = CdpElement;

    async fn query_all(&self, selector: &str) -> Result<Vec<CdpElement>, SurfaceError> {
        let node_ids = match self.session.query_selector_all(selector).await {
            Ok(ids) => ids,
            // Malformed selectors surface as protocol errors; treat them
            // as matching nothing, same as the other selectors in a list.
            Err(CdpError::Protocol { message, .. }) => {
                debug!("selector rejected by page: {} ({})", selector, message);
                return Ok(Vec::new());
            }
            Err(e) => return Err(surface_err(e)),
        };

        let mut elements = Vec::with_capacity(node_ids.len());
        for node_id in node_ids {
            match self.session.resolve_node(node_id).await {
                Ok(object_id) => elements.push(CdpElement {
                    session: self.session.clone(),
                    object_id,
                }),
                // Node vanished between query and resolve.
                Err(CdpError::Protocol { .. }) => continue,
                Err(e) => return Err(surface_err(e)),
            }
        }
        Ok(elements)
    }

    async fn body_text(&self) -> Result<String, SurfaceError> {
        let value = self
            .session
            .evaluate(js::BODY_TEXT_EXPR)
            .await
            .map_err(surface_err)?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    async fn overlay_survey(&self, probe: &OverlayProbe) -> Result<OverlaySurvey, SurfaceError> {
        let probe_json = serde_json::to_string(probe)
            .map_err(|e| SurfaceError::Evaluation(format!("probe serialization: {}", e)))?;
        let value = self
            .session
            .evaluate(&js::overlay_survey_expr(&probe_json))
            .await
            .map_err(surface_err)?;
        serde_json::from_value(value)
            .map_err(|e| SurfaceError::Evaluation(format!("bad survey shape: {}", e)))
    }

    async fn capture_viewport(&self, clip: Rect) -> Result<Vec<u8>, SurfaceError> {
        self.session.screenshot(clip).await.map_err(surface_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failures_are_fatal() {
        assert!(surface_err(CdpError::SessionClosed).is_fatal());
        assert!(surface_err(CdpError::WebSocket("reset".into())).is_fatal());
        assert!(!surface_err(CdpError::Timeout("slow".into())).is_fatal());
        assert!(!surface_err(CdpError::JavaScript("threw".into())).is_fatal());
    }

    #[test]
    fn element_protocol_errors_read_as_stale() {
        let err = element_err(CdpError::Protocol {
            code: -32000,
            message: "Could not find object".into(),
        });
        assert!(matches!(err, SurfaceError::StaleElement));
    }
}
