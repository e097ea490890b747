//! Gmail API integration
//!
//! This module provides:
//! - OAuth2 authentication flow and token persistence
//! - The [`MailService`] facade, its HTTP implementation and an in-memory one
//! - Response normalization to domain models

mod auth;
mod client;
mod memory;
mod normalize;
mod traits;

pub use auth::{GmailAuth, TokenProvider};
pub use client::{ApiStatusError, GmailClient};
pub use memory::{InMemoryMailbox, RecordedCall};
pub use normalize::{
    extract_attachments, extract_body, extract_headers, label_names, normalize_message,
    parse_date,
};
pub use traits::MailService;

/// Gmail API response types
pub mod api {
    use serde::{Deserialize, Serialize};

    /// Response from listing messages
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListMessagesResponse {
        pub messages: Option<Vec<MessageRef>>,
        pub next_page_token: Option<String>,
        pub result_size_estimate: Option<u32>,
    }

    /// Reference to a message (just ID and thread ID)
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessageRef {
        pub id: String,
        #[serde(default)]
        pub thread_id: String,
    }

    /// Full message from Gmail API
    ///
    /// The send and modify endpoints return the same resource with most
    /// fields left out, so everything but the ID is optional.
    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GmailMessage {
        pub id: String,
        #[serde(default)]
        pub thread_id: String,
        pub label_ids: Option<Vec<String>>,
        #[serde(default)]
        pub snippet: String,
        pub payload: Option<MessagePart>,
    }

    /// Thread resource with its messages
    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GmailThread {
        pub id: String,
        pub messages: Option<Vec<GmailMessage>>,
    }

    /// Email header (name-value pair)
    #[derive(Debug, Clone, Deserialize, Serialize)]
    pub struct Header {
        pub name: String,
        pub value: String,
    }

    /// Message body (base64url encoded when present)
    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessageBody {
        pub size: Option<u32>,
        pub data: Option<String>,
        pub attachment_id: Option<String>,
    }

    /// A node of the MIME tree; the message payload is the root part
    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MessagePart {
        pub part_id: Option<String>,
        #[serde(default)]
        pub mime_type: String,
        pub filename: Option<String>,
        pub headers: Option<Vec<Header>>,
        pub body: Option<MessageBody>,
        pub parts: Option<Vec<MessagePart>>,
    }

    /// Request body for the messages/threads modify endpoints
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ModifyRequest<'a> {
        #[serde(skip_serializing_if = "no_labels")]
        pub add_label_ids: &'a [String],
        #[serde(skip_serializing_if = "no_labels")]
        pub remove_label_ids: &'a [String],
    }

    fn no_labels(labels: &&[String]) -> bool {
        labels.is_empty()
    }

    /// Request body for messages/send
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SendRequest<'a> {
        pub raw: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub thread_id: Option<&'a str>,
    }

}
