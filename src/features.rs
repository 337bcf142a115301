//! Header-derived spam signals
//!
//! Every extractor is a pure function of the header block. Absent or
//! malformed headers never fail: each signal has a fixed default (`0`, or
//! "not differing" for the pairwise domain comparisons).

use crate::header::{count_addresses, domain_of, header_value};
use crate::types::HeaderFeatures;
use regex::Regex;

static RECEIVED_LINE_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?im)^Received:").unwrap());

// The value capture only sees lines written with a space after the colon.
static RECEIVED_VALUE_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?im)^Received: (.*)$").unwrap());

static IPV4_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\b(\d{1,3}(?:\.\d{1,3}){3})\b").unwrap());

static PRIVATE_IPV4_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^(?:10\.|192\.168\.|172\.(?:1[6-9]|2\d|3[01])\.)").unwrap()
});

static LIST_HEADER_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?im)^List-[A-Za-z\-]+:").unwrap());

impl HeaderFeatures {
    /// Compute all header signals for one header block
    #[must_use]
    pub fn extract(header: &str) -> Self {
        Self {
            num_received_headers: num_received_headers(header),
            received_first_ip_is_private: received_first_ip_is_private(header),
            from_returnpath_match: from_returnpath_match(header),
            reply_to_differs_from_from: reply_to_differs_from_from(header),
            message_id_missing: message_id_missing(header),
            message_id_matches_from: message_id_matches_from(header),
            message_id_is_random: message_id_is_random(header),
            subject_length: subject_length(header),
            subject_starts_with_re_fwd: subject_starts_with_re_fwd(header),
            num_recipients: num_recipients(header),
            to_contains_undisclosed_recipients: to_contains_undisclosed_recipients(header),
            is_html: is_html(header),
            is_multipart: is_multipart(header),
            num_list_headers: num_list_headers(header),
        }
    }
}

/// Number of `Received:` lines
#[must_use]
pub fn num_received_headers(header: &str) -> usize {
    RECEIVED_LINE_REGEX.find_iter(header).count()
}

/// Whether the oldest hop (last `Received:` line) names a private IPv4 address
#[must_use]
pub fn received_first_ip_is_private(header: &str) -> bool {
    let Some(first_hop) = RECEIVED_VALUE_REGEX
        .captures_iter(header)
        .filter_map(|cap| cap.get(1))
        .last()
    else {
        return false;
    };

    IPV4_REGEX
        .captures(first_hop.as_str())
        .and_then(|cap| cap.get(1))
        .is_some_and(|ip| is_private_ipv4(ip.as_str()))
}

/// RFC 1918 prefix check on a dotted quad
#[must_use]
pub fn is_private_ipv4(ip: &str) -> bool {
    PRIVATE_IPV4_REGEX.is_match(ip)
}

/// Whether the domains of two headers are both present and differ
fn domains_differ(header: &str, first: &str, second: &str) -> bool {
    let first = header_value(header, first).filter(|v| !v.is_empty());
    let second = header_value(header, second).filter(|v| !v.is_empty());

    match (first.and_then(domain_of), second.and_then(domain_of)) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    }
}

/// From and Return-Path domains differ
#[must_use]
pub fn from_returnpath_match(header: &str) -> bool {
    domains_differ(header, "From", "Return-Path")
}

/// From and Reply-To domains differ
#[must_use]
pub fn reply_to_differs_from_from(header: &str) -> bool {
    domains_differ(header, "From", "Reply-To")
}

/// No Message-ID line at all
#[must_use]
pub fn message_id_missing(header: &str) -> bool {
    header_value(header, "Message-ID").is_none()
}

/// From and Message-ID domains differ.
///
/// The name says "matches" but the signal fires on a mismatch; the
/// polarity is kept because downstream models were fit against it.
#[must_use]
pub fn message_id_matches_from(header: &str) -> bool {
    domains_differ(header, "From", "Message-ID")
}

/// Message-ID local part looks machine generated
#[must_use]
pub fn message_id_is_random(header: &str) -> bool {
    let Some(msgid) = header_value(header, "Message-ID").filter(|v| !v.is_empty()) else {
        return false;
    };

    // Everything before the first '@', angle bracket included
    let local = msgid.split('@').next().unwrap_or_default();

    local.chars().count() > 25
        && local.chars().any(|c| c.is_ascii_alphabetic())
        && local.chars().any(|c| c.is_ascii_digit())
}

/// Subject length in characters
#[must_use]
pub fn subject_length(header: &str) -> usize {
    header_value(header, "Subject").map_or(0, |s| s.chars().count())
}

/// Subject starts with a reply or forward prefix
#[must_use]
pub fn subject_starts_with_re_fwd(header: &str) -> bool {
    let subject = header_value(header, "Subject").unwrap_or_default();
    starts_with_ignore_case(subject, "re:") || starts_with_ignore_case(subject, "fwd:")
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Address tokens across To and CC
#[must_use]
pub fn num_recipients(header: &str) -> usize {
    ["To", "CC"]
        .iter()
        .filter_map(|name| header_value(header, name))
        .map(count_addresses)
        .sum()
}

/// To line hides its recipients
#[must_use]
pub fn to_contains_undisclosed_recipients(header: &str) -> bool {
    header_value(header, "To").is_some_and(|to| to.to_lowercase().contains("undisclosed"))
}

fn content_type_contains(header: &str, needle: &str) -> bool {
    header_value(header, "Content-Type").is_some_and(|ct| ct.to_lowercase().contains(needle))
}

/// Top-level Content-Type is HTML
#[must_use]
pub fn is_html(header: &str) -> bool {
    content_type_contains(header, "text/html")
}

/// Top-level Content-Type is multipart
#[must_use]
pub fn is_multipart(header: &str) -> bool {
    content_type_contains(header, "multipart/")
}

/// Number of `List-*` header lines
#[must_use]
pub fn num_list_headers(header: &str) -> usize {
    LIST_HEADER_REGEX.find_iter(header).count()
}
