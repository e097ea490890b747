//! Message model representing a normalized Gmail message

use super::ThreadId;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a message (Gmail message ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Recognized headers, keyed by lower-cased name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet(HashMap<String, String>);

impl HeaderSet {
    /// Header names kept during extraction
    pub const RECOGNIZED: [&'static str; 7] = [
        "from",
        "to",
        "subject",
        "date",
        "message-id",
        "in-reply-to",
        "references",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a header; returns false (and stores nothing) for unrecognized names.
    /// A later insert for the same name replaces the earlier value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> bool {
        let name = name.to_ascii_lowercase();
        if !Self::RECOGNIZED.contains(&name.as_str()) {
            return false;
        }
        self.0.insert(name, value.into());
        true
    }

    /// Value for a lower-cased header name, or "" when absent
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A message flattened out of the Gmail MIME tree
///
/// Built once by [`crate::gmail::normalize_message`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    /// Gmail message ID
    pub id: MessageId,
    /// ID of the thread this message belongs to
    pub thread_id: ThreadId,
    pub from: String,
    pub to: String,
    pub subject: String,
    /// Raw `Date` header
    pub date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub in_reply_to: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub references: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub snippet: String,
    /// First text/plain body found in the MIME tree
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    /// Attachment filenames in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    pub labels: Vec<String>,
    /// Parsed `Date` header, when it matched RFC 1123 with a numeric zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<FixedOffset>>,
}
