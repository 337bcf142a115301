//! Header block splitting and single-field lookup
//!
//! Both operations are deliberately line-oriented approximations of RFC 822:
//! folded header values are not reconstructed, so a continuation line is
//! never part of the value returned by [`header_value`].

use crate::types::ParsedEmail;
use regex::Regex;
use tracing::trace;

static DOMAIN_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"@([\w.-]+)").unwrap());

/// Split raw text at the first blank line.
///
/// Without a blank line the whole input is the header and the body is empty.
#[must_use]
pub fn split_email(raw: &str) -> ParsedEmail<'_> {
    let parsed = raw.split_once("\n\n").map_or(
        ParsedEmail {
            header: raw,
            body: "",
        },
        |(header, body)| ParsedEmail { header, body },
    );

    trace!(
        header_len = parsed.header.len(),
        body_len = parsed.body.len(),
        "Split raw email"
    );

    parsed
}

/// Look up the trimmed value of the first header line named `name`.
///
/// The name comparison is ASCII case-insensitive and anchored at the start
/// of a line. Returns `None` when no line carries the field; a field with an
/// empty value yields `Some("")`.
#[must_use]
pub fn header_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split('\n').find_map(|line| {
        let (field, rest) = line.split_at_checked(name.len())?;
        let value = rest.strip_prefix(':')?;
        field.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

/// Lowercased domain of the first `@domain` token in a header value
#[must_use]
pub fn domain_of(value: &str) -> Option<String> {
    DOMAIN_REGEX
        .captures(value)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Count `@domain` address tokens in a header value
#[must_use]
pub fn count_addresses(value: &str) -> usize {
    DOMAIN_REGEX.find_iter(value).count()
}
