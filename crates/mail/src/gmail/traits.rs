//! Mail access facade

use anyhow::Result;

use super::api::{GmailMessage, GmailThread, MessageRef};
use crate::models::{MessageId, ThreadId};

/// Operations the command handlers need from the mail service
///
/// [`super::GmailClient`] implements this over the Gmail REST API; tests
/// substitute an in-memory mailbox.
pub trait MailService {
    /// List message stubs matching a Gmail search query
    ///
    /// An empty query matches everything; `max_results == 0` leaves the
    /// page size to the service.
    fn list_messages(&self, query: &str, max_results: u32) -> Result<Vec<MessageRef>>;

    /// Fetch a full message
    fn get_message(&self, id: &MessageId) -> Result<GmailMessage>;

    /// Fetch a thread with all its messages
    fn get_thread(&self, id: &ThreadId) -> Result<GmailThread>;

    /// Send a base64url-encoded RFC 5322 message, optionally within a thread
    fn send_message(&self, raw: &str, thread_id: Option<&ThreadId>) -> Result<GmailMessage>;

    /// Add and remove labels on a single message
    fn modify_message(
        &self,
        id: &MessageId,
        add_labels: &[String],
        remove_labels: &[String],
    ) -> Result<GmailMessage>;

    /// Add and remove labels on every message of a thread
    fn modify_thread(
        &self,
        id: &ThreadId,
        add_labels: &[String],
        remove_labels: &[String],
    ) -> Result<GmailThread>;
}
