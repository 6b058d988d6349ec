//! JavaScript snippets evaluated in the puzzle page.

use serde_json::Value;

/// Embed a string as a JavaScript literal.
fn literal(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Shift an element horizontally through its CSS transform. Evaluates to
/// `false` when the element is missing.
pub(crate) fn translate_x(selector: &str, offset_px: f64) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); \
         if (!el) return false; \
         el.style.transform = 'translateX({}px)'; return true; }})()",
        literal(selector),
        offset_px
    )
}

/// Text content of an element, or `null` when the element is missing.
pub(crate) fn element_text(selector: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); \
         return el ? (el.textContent || '') : null; }})()",
        literal(selector)
    )
}
