//! Structural checks on theme HTML.
//!
//! A card template must expose one element carrying [`SUMMARY_PLACEHOLDER_ATTR`],
//! into which the widget writes summary text. Buttons identify their behaviour
//! with [`ACTION_ATTR`] rather than by visible label.
//!
//! Only attributes of real start tags count. Comments are removed first, and
//! quoted attribute values are consumed whole, so marker text inside a value
//! or a comment is never mistaken for the attribute.

use regex::Regex;
use std::sync::LazyLock;

use crate::errors::ThemeError;

pub const SUMMARY_PLACEHOLDER_ATTR: &str = "data-summary";
pub const ACTION_ATTR: &str = "data-action";

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?(?:-->|$)")
        .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

const ATTR_PATTERN: &str = r#"([^\s"'<>/=]+)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]+))?"#;

static START_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"<[A-Za-z][A-Za-z0-9-]*((?:\s+{ATTR_PATTERN})*)\s*/?>"
    ))
    .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(ATTR_PATTERN).unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
});

/// `(name, value)` for every attribute of every start tag, in document order.
/// Names are lower-cased; values are unquoted.
fn attributes(html: &str) -> Vec<(String, Option<String>)> {
    let html = COMMENT_RE.replace_all(html, "");
    let mut out = Vec::new();
    for tag in START_TAG_RE.captures_iter(&html) {
        let Some(attrs) = tag.get(1) else { continue };
        for attr in ATTR_RE.captures_iter(attrs.as_str()) {
            let Some(name) = attr.get(1) else { continue };
            let value = attr.get(2).map(|v| unquote(v.as_str()).to_string());
            out.push((name.as_str().to_ascii_lowercase(), value));
        }
    }
    out
}

fn unquote(raw: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| raw.strip_prefix(*q).and_then(|r| r.strip_suffix(*q)))
        .unwrap_or(raw)
}

#[must_use]
pub fn has_summary_placeholder(html: &str) -> bool {
    attributes(html)
        .iter()
        .any(|(name, _)| name == SUMMARY_PLACEHOLDER_ATTR)
}

/// # Errors
///
/// Returns `ThemeError::MissingPlaceholder` when no element carries the
/// summary placeholder attribute.
pub fn validate_template(html: &str) -> Result<(), ThemeError> {
    if has_summary_placeholder(html) {
        Ok(())
    } else {
        Err(ThemeError::MissingPlaceholder)
    }
}

/// Raw `data-action` values in document order, duplicates removed.
#[must_use]
pub fn action_ids(html: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (name, value) in attributes(html) {
        if name != ACTION_ATTR {
            continue;
        }
        let id = value.unwrap_or_default().trim().to_string();
        if !id.is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
