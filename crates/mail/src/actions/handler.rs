//! Action handler for email operations
//!
//! Coordinates the write calls (label changes and replies) against the
//! mail service and reports what changed.

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::sync::Arc;

use super::reply::{DEFAULT_SENDER, ReplyDraft};
use crate::gmail::{MailService, extract_headers, label_names};
use crate::models::{MessageId, ThreadId};

/// Label IDs used by Gmail for common states
pub mod labels {
    pub const INBOX: &str = "INBOX";
}

/// What an action applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Message(MessageId),
    Thread(ThreadId),
}

impl Target {
    /// Pick the target from optional command-line IDs; a thread ID wins
    pub fn from_ids(message_id: Option<&str>, thread_id: Option<&str>) -> Option<Self> {
        match (message_id, thread_id) {
            (_, Some(t)) if !t.is_empty() => Some(Self::Thread(ThreadId::new(t))),
            (Some(m), _) if !m.is_empty() => Some(Self::Message(MessageId::new(m))),
            _ => None,
        }
    }
}

/// Kind of object whose labels changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Message,
    Thread,
}

/// Result of an archive or label operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelChange {
    pub kind: TargetKind,
    pub id: String,
    /// Thread of a modified message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Messages touched by a thread modification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_count: Option<usize>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Labels on a message after the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Result of sending a reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentReply {
    pub id: String,
    pub thread_id: String,
    pub to: String,
    pub subject: String,
}

/// Split a comma-separated label list, trimming entries and dropping blanks
pub fn parse_label_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Handler for email actions like archive, relabel and reply
pub struct ActionHandler {
    gmail: Arc<dyn MailService>,
}

impl ActionHandler {
    /// Create a new action handler
    pub fn new(gmail: Arc<dyn MailService>) -> Self {
        Self { gmail }
    }

    /// Archive a message or thread (remove INBOX)
    pub fn archive(&self, target: &Target) -> Result<LabelChange> {
        let remove = vec![labels::INBOX.to_string()];
        let change = self
            .apply(target, Vec::new(), remove)
            .context("failed to archive")?;
        info!("Archived {:?} {}", change.kind, change.id);
        Ok(change)
    }

    /// Add and remove labels on a message or thread
    pub fn modify_labels(
        &self,
        target: &Target,
        add: Vec<String>,
        remove: Vec<String>,
    ) -> Result<LabelChange> {
        if add.is_empty() && remove.is_empty() {
            anyhow::bail!("no label operation specified");
        }

        let change = self
            .apply(target, add, remove)
            .context("failed to modify labels")?;
        info!(
            "Relabelled {:?} {} (+{:?} -{:?})",
            change.kind, change.id, change.added, change.removed
        );
        Ok(change)
    }

    fn apply(&self, target: &Target, add: Vec<String>, remove: Vec<String>) -> Result<LabelChange> {
        match target {
            Target::Thread(thread_id) => {
                let thread = self.gmail.modify_thread(thread_id, &add, &remove)?;
                Ok(LabelChange {
                    kind: TargetKind::Thread,
                    id: or_requested(thread.id, thread_id.as_str()),
                    thread_id: None,
                    message_count: Some(thread.messages.map_or(0, |m| m.len())),
                    added: add,
                    removed: remove,
                    labels: None,
                })
            }
            Target::Message(message_id) => {
                let msg = self.gmail.modify_message(message_id, &add, &remove)?;
                Ok(LabelChange {
                    kind: TargetKind::Message,
                    id: or_requested(msg.id, message_id.as_str()),
                    thread_id: Some(msg.thread_id),
                    message_count: None,
                    added: add,
                    removed: remove,
                    labels: Some(label_names(msg.label_ids.as_deref().unwrap_or_default())),
                })
            }
        }
    }

    /// Reply to a message
    ///
    /// The reply goes to the original sender, threaded on `thread_id` when
    /// given and on the original's thread otherwise. It is always sent
    /// `From: me` so Gmail fills in the authenticated account.
    pub fn reply(
        &self,
        message_id: &MessageId,
        body: &str,
        thread_id: Option<&ThreadId>,
    ) -> Result<SentReply> {
        let original = self
            .gmail
            .get_message(message_id)
            .context("failed to get original message")?;
        let headers = extract_headers(&original);

        let thread_id = match thread_id {
            Some(id) => id.clone(),
            None => ThreadId::new(&original.thread_id),
        };
        let thread_id = (!thread_id.as_str().is_empty()).then_some(thread_id);

        let draft = ReplyDraft::to_original(&headers, DEFAULT_SENDER, body);
        let sent = self
            .gmail
            .send_message(&draft.encode(), thread_id.as_ref())
            .context("failed to send reply")?;

        info!("Sent reply {} to {}", sent.id, draft.to);
        Ok(SentReply {
            id: sent.id,
            thread_id: sent.thread_id,
            to: draft.to,
            subject: draft.subject,
        })
    }
}

/// Prefer the ID echoed by the service, falling back to the one requested
fn or_requested(returned: String, requested: &str) -> String {
    if returned.is_empty() {
        requested.to_string()
    } else {
        returned
    }
}
