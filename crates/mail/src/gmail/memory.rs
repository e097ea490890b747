//! In-memory mail service
//!
//! Holds a fixed set of Gmail messages and records every query and write.
//! Used by tests in place of the HTTP client.

use anyhow::{Result, anyhow};
use std::sync::RwLock;

use super::MailService;
use super::api::{GmailMessage, GmailThread, MessageRef};
use crate::models::{MessageId, ThreadId};

/// A write made against the mailbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    ModifyMessage {
        id: String,
        add: Vec<String>,
        remove: Vec<String>,
    },
    ModifyThread {
        id: String,
        add: Vec<String>,
        remove: Vec<String>,
    },
    Send {
        raw: String,
        thread_id: Option<String>,
    },
}

/// In-memory implementation of [`MailService`]
///
/// Label modifications are applied to the stored messages, so later reads
/// see them.
#[derive(Default)]
pub struct InMemoryMailbox {
    messages: RwLock<Vec<GmailMessage>>,
    failing: Vec<String>,
    queries: RwLock<Vec<(String, u32)>>,
    calls: RwLock<Vec<RecordedCall>>,
}

impl InMemoryMailbox {
    pub fn new(messages: Vec<GmailMessage>) -> Self {
        Self {
            messages: RwLock::new(messages),
            ..Default::default()
        }
    }

    /// Make fetches of these message IDs fail
    pub fn with_failing(mut self, ids: &[&str]) -> Self {
        self.failing = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// Queries passed to `list_messages`, with their limits
    pub fn queries(&self) -> Vec<(String, u32)> {
        self.queries.read().map(|q| q.clone()).unwrap_or_default()
    }

    /// Writes in the order they were made
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) -> Result<()> {
        self.calls
            .write()
            .map_err(|_| anyhow!("call log poisoned"))?
            .push(call);
        Ok(())
    }

    fn read_messages(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<GmailMessage>>> {
        self.messages.read().map_err(|_| anyhow!("mailbox poisoned"))
    }

    /// Apply a label change to every stored message matching `select`
    fn relabel(
        &self,
        select: impl Fn(&GmailMessage) -> bool,
        add: &[String],
        remove: &[String],
    ) -> Result<Vec<GmailMessage>> {
        let mut messages = self
            .messages
            .write()
            .map_err(|_| anyhow!("mailbox poisoned"))?;

        let mut changed = Vec::new();
        for msg in messages.iter_mut().filter(|m| select(m)) {
            let labels = msg.label_ids.get_or_insert_with(Vec::new);
            labels.retain(|l| !remove.contains(l));
            for label in add {
                if !labels.contains(label) {
                    labels.push(label.clone());
                }
            }
            changed.push(msg.clone());
        }
        Ok(changed)
    }
}

impl MailService for InMemoryMailbox {
    fn list_messages(&self, query: &str, max_results: u32) -> Result<Vec<MessageRef>> {
        self.queries
            .write()
            .map_err(|_| anyhow!("query log poisoned"))?
            .push((query.to_string(), max_results));

        let limit = if max_results == 0 {
            usize::MAX
        } else {
            max_results as usize
        };
        Ok(self
            .read_messages()?
            .iter()
            .take(limit)
            .map(|m| MessageRef {
                id: m.id.clone(),
                thread_id: m.thread_id.clone(),
            })
            .collect())
    }

    fn get_message(&self, id: &MessageId) -> Result<GmailMessage> {
        if self.failing.iter().any(|f| f == id.as_str()) {
            return Err(anyhow!("HTTP 500 for message {}", id));
        }
        self.read_messages()?
            .iter()
            .find(|m| m.id == id.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("HTTP 404 for message {}", id))
    }

    fn get_thread(&self, id: &ThreadId) -> Result<GmailThread> {
        let messages: Vec<GmailMessage> = self
            .read_messages()?
            .iter()
            .filter(|m| m.thread_id == id.as_str())
            .cloned()
            .collect();
        if messages.is_empty() {
            return Err(anyhow!("HTTP 404 for thread {}", id));
        }
        Ok(GmailThread {
            id: id.as_str().to_string(),
            messages: Some(messages),
        })
    }

    fn send_message(&self, raw: &str, thread_id: Option<&ThreadId>) -> Result<GmailMessage> {
        let thread_id = thread_id.map(|t| t.as_str().to_string());
        self.record(RecordedCall::Send {
            raw: raw.to_string(),
            thread_id: thread_id.clone(),
        })?;

        let sent = self
            .calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::Send { .. }))
            .count();
        let id = format!("sent-{}", sent);
        Ok(GmailMessage {
            thread_id: thread_id.unwrap_or_else(|| id.clone()),
            id,
            label_ids: Some(vec!["SENT".to_string()]),
            ..Default::default()
        })
    }

    fn modify_message(
        &self,
        id: &MessageId,
        add_labels: &[String],
        remove_labels: &[String],
    ) -> Result<GmailMessage> {
        self.record(RecordedCall::ModifyMessage {
            id: id.as_str().to_string(),
            add: add_labels.to_vec(),
            remove: remove_labels.to_vec(),
        })?;
        self.relabel(|m| m.id == id.as_str(), add_labels, remove_labels)?
            .pop()
            .ok_or_else(|| anyhow!("HTTP 404 for message {}", id))
    }

    fn modify_thread(
        &self,
        id: &ThreadId,
        add_labels: &[String],
        remove_labels: &[String],
    ) -> Result<GmailThread> {
        self.record(RecordedCall::ModifyThread {
            id: id.as_str().to_string(),
            add: add_labels.to_vec(),
            remove: remove_labels.to_vec(),
        })?;
        let messages = self.relabel(|m| m.thread_id == id.as_str(), add_labels, remove_labels)?;
        if messages.is_empty() {
            return Err(anyhow!("HTTP 404 for thread {}", id));
        }
        Ok(GmailThread {
            id: id.as_str().to_string(),
            messages: Some(messages),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(id: &str, thread_id: &str) -> GmailMessage {
        GmailMessage {
            id: id.to_string(),
            thread_id: thread_id.to_string(),
            label_ids: Some(vec!["INBOX".to_string(), "UNREAD".to_string()]),
            ..Default::default()
        }
    }

    #[test]
    fn test_thread_modify_updates_stored_labels() {
        let mailbox = InMemoryMailbox::new(vec![stub("m1", "t1"), stub("m2", "t1"), stub("m3", "t2")]);

        let thread = mailbox
            .modify_thread(&ThreadId::new("t1"), &[], &["INBOX".to_string()])
            .unwrap();
        assert_eq!(thread.messages.map(|m| m.len()), Some(2));

        let m1 = mailbox.get_message(&MessageId::new("m1")).unwrap();
        assert_eq!(m1.label_ids, Some(vec!["UNREAD".to_string()]));
        let m3 = mailbox.get_message(&MessageId::new("m3")).unwrap();
        assert_eq!(m3.label_ids.map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_failing_and_missing_messages() {
        let mailbox = InMemoryMailbox::new(vec![stub("m1", "t1")]).with_failing(&["m1"]);
        assert!(mailbox.get_message(&MessageId::new("m1")).is_err());
        assert!(mailbox.get_message(&MessageId::new("m9")).is_err());
        assert!(mailbox.get_thread(&ThreadId::new("t9")).is_err());
    }

    #[test]
    fn test_send_records_raw_and_thread() {
        let mailbox = InMemoryMailbox::default();
        let sent = mailbox.send_message("cmF3", None).unwrap();
        assert_eq!(sent.id, "sent-1");
        assert_eq!(sent.thread_id, "sent-1");
        assert_eq!(
            mailbox.calls(),
            vec![RecordedCall::Send {
                raw: "cmF3".to_string(),
                thread_id: None
            }]
        );
    }
}
