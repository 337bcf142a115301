//! Core types flowing through the feature pipeline

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Raw email text with line endings normalized to LF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawEmail(String);

impl RawEmail {
    /// Wrap text, converting CRLF line endings to LF
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.contains("\r\n") {
            Self(text.replace("\r\n", "\n"))
        } else {
            Self(text)
        }
    }

    /// Decode uploaded bytes, replacing invalid UTF-8, and normalize line endings
    #[must_use]
    pub fn from_bytes(raw: &[u8]) -> Self {
        Self::new(String::from_utf8_lossy(raw))
    }

    /// True when there is nothing but whitespace to classify
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RawEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Header block and body of one raw email
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedEmail<'a> {
    /// Everything before the first blank line
    pub header: &'a str,

    /// Everything after the first blank line, empty if there is none
    pub body: &'a str,
}

/// Scalar signals computed from the header block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct HeaderFeatures {
    pub num_received_headers: usize,
    pub received_first_ip_is_private: bool,
    pub from_returnpath_match: bool,
    pub reply_to_differs_from_from: bool,
    pub message_id_missing: bool,
    /// Set when the Message-ID domain *differs* from the From domain
    pub message_id_matches_from: bool,
    pub message_id_is_random: bool,
    pub subject_length: usize,
    pub subject_starts_with_re_fwd: bool,
    pub num_recipients: usize,
    pub to_contains_undisclosed_recipients: bool,
    pub is_html: bool,
    pub is_multipart: bool,
    pub num_list_headers: usize,
}

impl HeaderFeatures {
    /// Column names, in record order
    pub const NAMES: [&'static str; 14] = [
        "num_received_headers",
        "received_first_ip_is_private",
        "from_returnpath_match",
        "reply_to_differs_from_from",
        "message_id_missing",
        "message_id_matches_from",
        "message_id_is_random",
        "subject_length",
        "subject_starts_with_re_fwd",
        "num_recipients",
        "to_contains_undisclosed_recipients",
        "is_html",
        "is_multipart",
        "num_list_headers",
    ];

    /// Values in the same order as [`Self::NAMES`]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn values(&self) -> [f64; 14] {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        [
            self.num_received_headers as f64,
            flag(self.received_first_ip_is_private),
            flag(self.from_returnpath_match),
            flag(self.reply_to_differs_from_from),
            flag(self.message_id_missing),
            flag(self.message_id_matches_from),
            flag(self.message_id_is_random),
            self.subject_length as f64,
            flag(self.subject_starts_with_re_fwd),
            self.num_recipients as f64,
            flag(self.to_contains_undisclosed_recipients),
            flag(self.is_html),
            flag(self.is_multipart),
            self.num_list_headers as f64,
        ]
    }
}

/// Name of the embedding column at `index`
#[must_use]
pub fn embedding_column(index: usize) -> String {
    format!("emb_{index}")
}

/// Complete feature vector for one email: header scalars then body embedding
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub header: HeaderFeatures,
    pub embedding: Vec<f32>,
}

impl FeatureRecord {
    #[must_use]
    pub const fn new(header: HeaderFeatures, embedding: Vec<f32>) -> Self {
        Self { header, embedding }
    }

    /// Embedding dimensionality D
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.embedding.len()
    }

    /// Total number of columns
    #[must_use]
    pub const fn len(&self) -> usize {
        HeaderFeatures::NAMES.len() + self.embedding.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Column names in record order
    pub fn names(&self) -> impl Iterator<Item = Cow<'static, str>> + '_ {
        HeaderFeatures::NAMES
            .iter()
            .map(|name| Cow::Borrowed(*name))
            .chain((0..self.embedding.len()).map(|i| Cow::Owned(embedding_column(i))))
    }

    /// Column values in record order
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.header
            .values()
            .into_iter()
            .chain(self.embedding.iter().map(|&v| f64::from(v)))
            .collect()
    }

    /// Name/value pairs in record order
    pub fn iter(&self) -> impl Iterator<Item = (Cow<'static, str>, f64)> + '_ {
        self.names().zip(self.values())
    }

    /// Look up a single column by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        if let Some(pos) = HeaderFeatures::NAMES.iter().position(|n| *n == name) {
            return Some(self.header.values()[pos]);
        }

        name.strip_prefix("emb_")
            .filter(|idx| !idx.starts_with('+') && !(idx.len() > 1 && idx.starts_with('0')))
            .and_then(|idx| idx.parse::<usize>().ok())
            .and_then(|idx| self.embedding.get(idx))
            .map(|&v| f64::from(v))
    }

    /// Render as an ordered JSON object
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(name, value)| (name.into_owned(), serde_json::Value::from(value)))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name.as_ref(), &value)?;
        }
        map.end()
    }
}
