//! Review evidence classifier.
//!
//! The review selectors are broad on purpose (third-party widgets have
//! unpredictable markup), so most matches are noise. An ordered filter
//! pipeline reduces them to a confident verdict:
//!
//! 1. gather candidates from every selector (union, duplicates kept);
//! 2. exclude media/gallery elements;
//! 3. exclude navigation/header/menu contexts;
//! 4. require positive review content (the allowlist — absence of
//!    disqualification is not enough);
//! 5. drop elements without a visually present bounding box;
//! 6. classify survivors against the fold;
//! 7. aggregate.
//!
//! Every per-element failure resolves to the conservative branch for that
//! one check.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::geometry::{is_above_fold, is_visually_present};
use crate::report::{ElementDetail, FoldRecord, ReviewDiagnostics, ReviewState};
use crate::surface::{
    AncestorDescriptor, ElementHandle, RenderSurface, SurfaceError, degrade,
};

/// Class/id substrings of known review platforms.
const KNOWN_WIDGETS: [&str; 7] = [
    "jdgm",
    "yotpo",
    "loox",
    "stamped",
    "rivyo",
    "reviewsio",
    "trustpilot",
];

const MEDIA_TAGS: [&str; 7] = [
    "media-gallery",
    "img",
    "picture",
    "video",
    "canvas",
    "figure",
    "iframe",
];

const MEDIA_CLASS_HINTS: [&str; 4] = ["gallery", "carousel", "slider", "media"];

const NAV_CLASS_HINTS: [&str; 5] = ["header", "nav", "menu", "site-nav", "navbar"];

static STAR_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)star|rating").unwrap());
static STAR_ICON_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)fa-star|icon-star|star-icon|icon_star").unwrap());
static STAR_GLYPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"[★☆⭐]").unwrap());
static STAR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[★☆⭐]{2,}").unwrap());
static NUMERIC_RATING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[0-5]\.\d+\s*(?:/\s*5|out\s+of\s+5)?\b").unwrap());
static RATING_WITH_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[0-5]\.\d+\s*[★☆⭐]").unwrap());
static REVIEW_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\d+\s+(?:review|rating)s?").unwrap());
static PAREN_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\d+\)").unwrap());
static REVIEW_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)review|rating").unwrap());

/// Classifies review evidence on one surface.
pub struct ReviewClassifier<'a> {
    selectors: &'a [String],
}

impl<'a> ReviewClassifier<'a> {
    pub fn new(selectors: &'a [String]) -> Self {
        Self { selectors }
    }

    /// Run the full pipeline and return the verdict with its diagnostics.
    ///
    /// With diagnostics off, fold classification stops at the first
    /// above-fold survivor: the aggregate rule only needs existence. With
    /// diagnostics on, every survivor is scanned so counters and fold
    /// buckets are complete. The trade-off is deliberate; callers must not
    /// treat the partial buckets of a short-circuited run as exhaustive.
    pub async fn classify<S: RenderSurface>(
        &self,
        surface: &S,
        diagnostics_enabled: bool,
    ) -> Result<(ReviewState, ReviewDiagnostics), SurfaceError> {
        let mut diagnostics = ReviewDiagnostics::default();

        // Stage 1: union of all selector matches. Duplicates across
        // selectors are kept; they only affect counters, never the state.
        let mut candidates = Vec::new();
        for selector in self.selectors {
            let matches = degrade(surface.query_all(selector).await, Vec::new())?;
            candidates.extend(matches);
        }
        diagnostics.candidates_found = candidates.len();
        if candidates.is_empty() {
            return Ok((ReviewState::NotPresent, diagnostics));
        }

        // Stages 2-4: exclusion filters, then the positive allowlist.
        let mut valid = Vec::new();
        for element in candidates {
            if degrade(is_media_element(&element).await, true)? {
                diagnostics.filtered_by_media += 1;
                continue;
            }
            if degrade(in_navigation_context(&element).await, true)? {
                diagnostics.filtered_by_navigation += 1;
                continue;
            }
            if !degrade(has_review_content(&element).await, false)? {
                diagnostics.filtered_by_content += 1;
                continue;
            }
            valid.push(element);
        }
        diagnostics.valid_elements = valid.len();
        if valid.is_empty() {
            return Ok((ReviewState::NotPresent, diagnostics));
        }

        // Stages 5-6: geometry filter and fold classification.
        for element in &valid {
            let rect = match element.bounding_box().await {
                Ok(rect) => rect,
                Err(e) if e.is_fatal() => return Err(e),
                // Handle went stale mid-scan; it contributes nothing.
                Err(_) => continue,
            };
            let rect = match rect {
                Some(r) if is_visually_present(Some(&r)) => r,
                _ => {
                    diagnostics.filtered_by_visibility += 1;
                    continue;
                }
            };

            let detail = if diagnostics_enabled {
                match element_detail(element).await {
                    Ok(detail) => Some(detail),
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(_) => continue,
                }
            } else {
                None
            };

            let record = FoldRecord {
                position: rect,
                detail,
            };
            if is_above_fold(&rect) {
                diagnostics.above_fold.push(record);
                if !diagnostics_enabled {
                    break;
                }
            } else {
                diagnostics.below_fold.push(record);
            }
        }

        let state = if !diagnostics.above_fold.is_empty() {
            ReviewState::VisibleAboveFold
        } else if !diagnostics.below_fold.is_empty() {
            ReviewState::PresentBelowFold
        } else {
            ReviewState::NotPresent
        };
        debug!(
            ?state,
            candidates = diagnostics.candidates_found,
            valid = diagnostics.valid_elements,
            "review classification complete"
        );
        Ok((state, diagnostics))
    }
}

/// Media-bearing tags and gallery-ish class names are never review
/// evidence, even when a review selector matches them.
async fn is_media_element<E: ElementHandle>(element: &E) -> Result<bool, SurfaceError> {
    let desc = element.descriptor().await?;
    let tag = desc.tag_name.to_ascii_lowercase();
    if MEDIA_TAGS.contains(&tag.as_str()) {
        return Ok(true);
    }
    let class = desc.class_name.to_ascii_lowercase();
    Ok(MEDIA_CLASS_HINTS.iter().any(|hint| class.contains(hint)))
}

/// Star ratings shown inside headers, menus and navigation drawers are
/// site chrome, not product evidence.
async fn in_navigation_context<E: ElementHandle>(element: &E) -> Result<bool, SurfaceError> {
    let chain = element.ancestor_chain().await?;
    Ok(chain.iter().any(is_navigation_scope))
}

fn is_navigation_scope(node: &AncestorDescriptor) -> bool {
    let tag = node.tag_name.to_ascii_lowercase();
    if tag == "header" || tag == "nav" {
        return true;
    }
    if let Some(role) = &node.role {
        if matches!(role.as_str(), "navigation" | "menu" | "menubar") {
            return true;
        }
    }
    let class = node.class_name.to_ascii_lowercase();
    NAV_CLASS_HINTS.iter().any(|hint| class.contains(hint))
}

/// Positive allowlist: known platform markers, stars, numeric ratings or
/// review counts.
async fn has_review_content<E: ElementHandle>(element: &E) -> Result<bool, SurfaceError> {
    let desc = element.descriptor().await?;
    let attrs = format!("{} {}", desc.class_name, desc.id).to_ascii_lowercase();
    if KNOWN_WIDGETS.iter().any(|widget| attrs.contains(widget)) {
        return Ok(true);
    }

    let markup = element.inner_markup().await?;
    let text = element.text_content().await?;

    let has_stars = (markup.contains("<svg") && STAR_MARKUP.is_match(&markup))
        || STAR_GLYPH.is_match(&text)
        || STAR_ICON_CLASS.is_match(&markup);

    let has_rating = NUMERIC_RATING.is_match(&text)
        || RATING_WITH_STAR.is_match(&text)
        || STAR_RUN.is_match(&text);

    let has_count = REVIEW_COUNT.is_match(&text)
        || (PAREN_COUNT.is_match(&text) && REVIEW_WORD.is_match(&text));

    Ok(has_stars || has_rating || has_count)
}

async fn element_detail<E: ElementHandle>(element: &E) -> Result<ElementDetail, SurfaceError> {
    let desc = element.descriptor().await?;
    let text = element.text_content().await?;
    Ok(ElementDetail {
        tag_name: desc.tag_name,
        class_name: desc.class_name,
        id: desc.id,
        text_preview: text.chars().take(120).collect(),
    })
}

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;
