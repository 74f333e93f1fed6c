//! Fixed in-page snippets.
//!
//! The core consumes an enumerated capability set, so these are the only
//! JavaScript fragments that ever run in the page: one function
//! declaration per element capability (invoked via
//! `Runtime.callFunctionOn`) and one whole-document expression for the
//! overlay survey.

/// Tag, class and id of the element bound to `this`.
pub(crate) const DESCRIPTOR_FN: &str = r#"
function() {
    return {
        tagName: (this.tagName || '').toLowerCase(),
        className: typeof this.className === 'string' ? this.className : '',
        id: this.id || ''
    };
}
"#;

/// Viewport-relative bounding rect, or null when the element has no
/// layout.
pub(crate) const RECT_FN: &str = r#"
function() {
    const r = this.getBoundingClientRect();
    if (!r || (r.width === 0 && r.height === 0)) return null;
    return { x: r.x, y: r.y, width: r.width, height: r.height };
}
"#;

pub(crate) const TEXT_FN: &str = r#"
function() {
    return this.textContent || '';
}
"#;

pub(crate) const MARKUP_FN: &str = r#"
function() {
    return this.innerHTML || '';
}
"#;

/// The element and its ancestors, innermost first, up to but excluding
/// the document body.
pub(crate) const ANCESTOR_CHAIN_FN: &str = r#"
function() {
    const chain = [];
    let node = this;
    while (node && node !== document.body && node.nodeType === 1) {
        chain.push({
            tagName: (node.tagName || '').toLowerCase(),
            className: typeof node.className === 'string' ? node.className : '',
            role: node.getAttribute ? node.getAttribute('role') : null
        });
        node = node.parentElement;
    }
    return chain;
}
"#;

/// Full visible text of the document body.
pub(crate) const BODY_TEXT_EXPR: &str =
    "document.body ? (document.body.innerText || '') : ''";

/// Build the atomic overlay survey expression for one serialized probe.
///
/// Gathers, in a single evaluation: the live inner window size, the first
/// dialog-pattern match with its style and rect, and every
/// overlay-positioned visible body element. Classification happens on the
/// Rust side; the in-page filter only drops elements that can never
/// qualify.
pub(crate) fn overlay_survey_expr(probe_json: &str) -> String {
    format!(
        r#"(() => {{
    const probe = {probe_json};
    const read = (el) => {{
        const cs = window.getComputedStyle(el);
        const r = el.getBoundingClientRect();
        const z = parseInt(cs.zIndex, 10);
        return {{
            rect: (r.width === 0 && r.height === 0)
                ? null
                : {{ x: r.x, y: r.y, width: r.width, height: r.height }},
            style: {{
                position: cs.position,
                zIndex: Number.isNaN(z) ? null : z,
                display: cs.display,
                visibility: cs.visibility,
                opacity: parseFloat(cs.opacity) || 0
            }}
        }};
    }};

    let semantic = null;
    for (const selector of probe.dialogSelectors) {{
        let el = null;
        try {{ el = document.querySelector(selector); }} catch (e) {{ continue; }}
        if (el) {{ semantic = read(el); break; }}
    }}

    const candidates = [];
    const all = document.body ? document.body.querySelectorAll('*') : [];
    for (const el of all) {{
        const cs = window.getComputedStyle(el);
        if (cs.display === 'none' || cs.visibility === 'hidden') continue;
        const pos = cs.position;
        const z = parseInt(cs.zIndex, 10);
        const overlay = pos === 'fixed' || pos === 'sticky' ||
            (pos === 'absolute' && !Number.isNaN(z) && z >= probe.minZIndex);
        if (!overlay) continue;
        candidates.push(read(el));
    }}

    return {{
        window: {{ width: window.innerWidth, height: window.innerHeight }},
        semantic,
        candidates
    }};
}})()"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_functions_are_declarations() {
        for decl in [DESCRIPTOR_FN, RECT_FN, TEXT_FN, MARKUP_FN, ANCESTOR_CHAIN_FN] {
            assert!(decl.trim_start().starts_with("function()"));
        }
    }

    #[test]
    fn survey_expression_embeds_the_probe() {
        let expr = overlay_survey_expr(r#"{"dialogSelectors":["[role=\"dialog\"]"],"minZIndex":100}"#);
        assert!(expr.contains("minZIndex\":100"));
        assert!(expr.contains("window.innerWidth"));
        assert!(expr.contains("getBoundingClientRect"));
        // Self-invoking, so it evaluates to the survey object itself.
        assert!(expr.starts_with("(() => {"));
        assert!(expr.ends_with("})()"));
    }
}
