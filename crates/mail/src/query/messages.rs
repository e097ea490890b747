//! Message listing and lookup

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::gmail::{MailService, normalize_message};
use crate::models::{MessageId, NormalizedMessage};

/// Default page size for inbox listings
pub const DEFAULT_LIST_LIMIT: u32 = 10;

/// Default page size for free-form searches
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Structured filters for listing messages
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub unread: bool,
    pub from: Option<String>,
    pub subject: Option<String>,
    pub label: Option<String>,
}

impl ListFilter {
    /// Render the filter as a Gmail search query
    ///
    /// An empty filter means the inbox.
    pub fn to_query(&self) -> String {
        let mut terms = Vec::new();
        if self.unread {
            terms.push("is:unread".to_string());
        }
        if let Some(from) = non_empty(&self.from) {
            terms.push(format!("from:{}", from));
        }
        if let Some(subject) = non_empty(&self.subject) {
            terms.push(format!("subject:{}", subject));
        }
        if let Some(label) = non_empty(&self.label) {
            terms.push(format!("label:{}", label));
        }

        if terms.is_empty() {
            "in:inbox".to_string()
        } else {
            terms.join(" ")
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// List messages matching `query` and fetch each one in full
///
/// Fetches run one after another in list order. A message that fails to
/// fetch is logged and left out; only the list call itself is fatal.
///
/// # Arguments
/// * `gmail` - The mail service
/// * `query` - Gmail search query
/// * `limit` - Maximum number of messages to list
pub fn fetch_messages(
    gmail: &dyn MailService,
    query: &str,
    limit: u32,
) -> Result<Vec<NormalizedMessage>> {
    let refs = gmail
        .list_messages(query, limit)
        .context("failed to list messages")?;
    debug!("Query {:?} matched {} messages", query, refs.len());

    let mut messages = Vec::with_capacity(refs.len());
    for msg_ref in refs {
        let id = MessageId::new(msg_ref.id);
        match gmail.get_message(&id) {
            Ok(raw) => messages.push(normalize_message(&raw)),
            Err(e) => warn!("failed to get message {}: {:#}", id, e),
        }
    }

    Ok(messages)
}

/// Fetch and normalize a single message
pub fn get_message_detail(gmail: &dyn MailService, id: &MessageId) -> Result<NormalizedMessage> {
    let raw = gmail
        .get_message(id)
        .with_context(|| format!("failed to get message {}", id))?;
    Ok(normalize_message(&raw))
}
