//! Body cleanup ahead of embedding
//!
//! This is tag stripping, not HTML parsing. Tags are matched non-greedily
//! within a single line, so a tag split across lines survives, and an
//! attribute value containing `>` ends the match early.

use regex::Regex;

static TAG_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"<.*?>").unwrap());

static WHITESPACE_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip angle-bracket tags, collapse whitespace runs to one space, and trim
#[must_use]
pub fn normalize_body(body: &str) -> String {
    let stripped = TAG_REGEX.replace_all(body, "");
    let collapsed = WHITESPACE_REGEX.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}
