use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-side timestamp, kept in the server's own representation.
///
/// The catalog emits ISO-8601 strings of a fixed shape, so lexical order is
/// chronological order. No clock arithmetic is ever done on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// One catalog entry. Identity is `uri`; everything else is carried opaquely.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub uri: String,
    pub upload_time: Timestamp,
    pub metadata: serde_json::Value,
}

impl ResultItem {
    pub fn new(uri: impl Into<String>, upload_time: impl Into<Timestamp>) -> Self {
        Self {
            uri: uri.into(),
            upload_time: upload_time.into(),
            metadata: serde_json::Value::Null,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}
