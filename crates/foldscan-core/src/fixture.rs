//! In-memory surface fixture for detector and orchestrator tests.
//!
//! Implements the full [`RenderSurface`] capability set over a hand-built
//! element table, so every heuristic is testable without a live browser.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::geometry::Rect;
use crate::surface::{
    AncestorDescriptor, ElementDescriptor, ElementHandle, OverlayProbe, OverlaySurvey,
    RenderSurface, SurfaceError, WindowSize,
};

#[derive(Debug, Clone, Default)]
pub struct FixtureElement {
    pub tag: String,
    pub class: String,
    pub id: String,
    pub role: Option<String>,
    pub text: String,
    pub markup: String,
    pub rect: Option<Rect>,
    pub ancestors: Vec<AncestorDescriptor>,
    pub stale: bool,
}

impl FixtureElement {
    pub fn new(tag: &str, class: &str) -> Self {
        Self {
            tag: tag.to_string(),
            class: class.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_markup(mut self, markup: &str) -> Self {
        self.markup = markup.to_string();
        self
    }

    pub fn with_rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Some(Rect::new(x, y, width, height));
        self
    }

    /// Add an ancestor (outermost last).
    pub fn under(mut self, tag: &str, class: &str) -> Self {
        self.ancestors.push(AncestorDescriptor {
            tag_name: tag.to_string(),
            class_name: class.to_string(),
            role: None,
        });
        self
    }

    pub fn under_role(mut self, tag: &str, role: &str) -> Self {
        self.ancestors.push(AncestorDescriptor {
            tag_name: tag.to_string(),
            class_name: String::new(),
            role: Some(role.to_string()),
        });
        self
    }

    /// Every access to this handle fails as stale.
    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }

    fn guard(&self) -> Result<(), SurfaceError> {
        if self.stale {
            Err(SurfaceError::StaleElement)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ElementHandle for FixtureElement {
    async fn bounding_box(&self) -> Result<Option<Rect>, SurfaceError> {
        self.guard()?;
        Ok(self.rect)
    }

    async fn descriptor(&self) -> Result<ElementDescriptor, SurfaceError> {
        self.guard()?;
        Ok(ElementDescriptor {
            tag_name: self.tag.clone(),
            class_name: self.class.clone(),
            id: self.id.clone(),
        })
    }

    async fn text_content(&self) -> Result<String, SurfaceError> {
        self.guard()?;
        Ok(self.text.clone())
    }

    async fn inner_markup(&self) -> Result<String, SurfaceError> {
        self.guard()?;
        Ok(self.markup.clone())
    }

    async fn ancestor_chain(&self) -> Result<Vec<AncestorDescriptor>, SurfaceError> {
        self.guard()?;
        let mut chain = vec![AncestorDescriptor {
            tag_name: self.tag.clone(),
            class_name: self.class.clone(),
            role: self.role.clone(),
        }];
        chain.extend(self.ancestors.iter().cloned());
        Ok(chain)
    }
}

#[derive(Default)]
pub struct FixtureSurface {
    elements: HashMap<String, Vec<FixtureElement>>,
    body: String,
    /// Surveys consumed front to back; the last one repeats.
    surveys: Mutex<Vec<OverlaySurvey>>,
    calls: Mutex<Vec<String>>,
    /// When set, surface calls beyond this many fail fatally.
    lost_after: Option<usize>,
}

impl FixtureSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements(mut self, selector: &str, elements: Vec<FixtureElement>) -> Self {
        self.elements.insert(selector.to_string(), elements);
        self
    }

    pub fn with_body(mut self, text: &str) -> Self {
        self.body = text.to_string();
        self
    }

    pub fn with_surveys(self, surveys: Vec<OverlaySurvey>) -> Self {
        *self.surveys.lock() = surveys;
        self
    }

    /// Every surface call fails fatally, as when the browser connection
    /// drops before the scan starts.
    pub fn lost(self) -> Self {
        self.lost_after(0)
    }

    /// The first `n` surface calls succeed; the rest fail fatally,
    /// simulating a connection dropped mid-scan.
    pub fn lost_after(mut self, n: usize) -> Self {
        self.lost_after = Some(n);
        self
    }

    /// Operations performed so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn empty_survey() -> OverlaySurvey {
        OverlaySurvey {
            window: WindowSize {
                width: 390.0,
                height: 844.0,
            },
            semantic: None,
            candidates: Vec::new(),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    // Called after record(), so the current call counts toward the limit.
    fn guard(&self) -> Result<(), SurfaceError> {
        match self.lost_after {
            Some(n) if self.calls.lock().len() > n => {
                Err(SurfaceError::SurfaceLost("connection dropped".to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl RenderSurface for FixtureSurface {
    type Element = FixtureElement;

    async fn query_all(&self, selector: &str) -> Result<Vec<FixtureElement>, SurfaceError> {
        self.record(format!("query:{selector}"));
        self.guard()?;
        Ok(self.elements.get(selector).cloned().unwrap_or_default())
    }

    async fn body_text(&self) -> Result<String, SurfaceError> {
        self.record("body_text");
        self.guard()?;
        Ok(self.body.clone())
    }

    async fn overlay_survey(&self, _probe: &OverlayProbe) -> Result<OverlaySurvey, SurfaceError> {
        self.record("survey");
        self.guard()?;
        let mut surveys = self.surveys.lock();
        if surveys.len() > 1 {
            Ok(surveys.remove(0))
        } else {
            Ok(surveys.first().cloned().unwrap_or_else(Self::empty_survey))
        }
    }

    async fn capture_viewport(&self, _clip: Rect) -> Result<Vec<u8>, SurfaceError> {
        self.record("capture");
        self.guard()?;
        Ok(b"PNG".to_vec())
    }
}
