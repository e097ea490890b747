//! Thread model representing a Gmail thread (conversation)

use super::NormalizedMessage;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unique identifier for a thread (Gmail thread ID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A conversation folded from its normalized messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    /// Gmail thread ID
    pub id: ThreadId,
    /// First non-empty subject among the messages
    pub subject: String,
    /// Distinct `From` values across the thread
    pub participants: BTreeSet<String>,
    /// Number of messages in the thread
    pub message_count: usize,
    /// Latest parsed `Date` header, if any parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<DateTime<FixedOffset>>,
    /// Messages in the order the service returned them
    pub messages: Vec<NormalizedMessage>,
}
