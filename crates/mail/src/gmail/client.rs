//! Gmail API HTTP client
//!
//! Implements [`MailService`] against the Gmail REST API.
//! Uses synchronous HTTP (ureq); every call is a single blocking request.

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api::{
    GmailMessage, GmailThread, ListMessagesResponse, MessageRef, ModifyRequest, SendRequest,
};
use super::{MailService, TokenProvider};
use crate::models::{MessageId, ThreadId};

/// The Gmail API answered with a non-success status
#[derive(Debug, thiserror::Error)]
#[error("Gmail API returned HTTP {status} while trying to {operation}")]
pub struct ApiStatusError {
    pub operation: &'static str,
    pub status: u16,
}

/// Gmail API client
pub struct GmailClient {
    tokens: Box<dyn TokenProvider>,
    base_url: String,
}

impl GmailClient {
    /// Gmail API base URL
    const BASE_URL: &'static str = "https://gmail.googleapis.com/gmail/v1";

    /// Create a new Gmail client
    pub fn new(tokens: impl TokenProvider + 'static) -> Self {
        Self::with_base_url(tokens, Self::BASE_URL)
    }

    /// Create a client against another API root (for proxies and tests)
    pub fn with_base_url(tokens: impl TokenProvider + 'static, base_url: impl Into<String>) -> Self {
        Self {
            tokens: Box::new(tokens),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Make sure a usable token exists, running the browser flow if needed
    pub fn authenticate(&self) -> Result<()> {
        self.tokens.access_token()?;
        Ok(())
    }

    fn user_url(&self, path: &str) -> String {
        format!("{}/users/me/{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, operation: &'static str, url: &str) -> Result<T> {
        let access_token = self.tokens.access_token()?;
        debug!("GET {}", url);

        let response = ureq::get(url)
            .header("Authorization", &format!("Bearer {}", access_token))
            .call();

        read_response(operation, response)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let access_token = self.tokens.access_token()?;
        debug!("POST {}", url);

        let response = ureq::post(url)
            .header("Authorization", &format!("Bearer {}", access_token))
            .send_json(body);

        read_response(operation, response)
    }
}

/// Turn a ureq result into parsed JSON, mapping HTTP failures to [`ApiStatusError`]
fn read_response<T: DeserializeOwned>(
    operation: &'static str,
    response: Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<T> {
    match response {
        Ok(mut resp) => resp
            .body_mut()
            .read_json()
            .with_context(|| format!("Failed to parse response while trying to {}", operation)),
        Err(ureq::Error::StatusCode(status)) => Err(ApiStatusError { operation, status }.into()),
        Err(e) => Err(anyhow::Error::new(e).context(format!("Unable to {}", operation))),
    }
}

/// Build the query string for messages.list
fn list_query(query: &str, max_results: u32) -> String {
    let mut params = Vec::new();
    if !query.is_empty() {
        params.push(format!("q={}", urlencoding::encode(query)));
    }
    if max_results > 0 {
        params.push(format!("maxResults={}", max_results.min(500)));
    }

    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

impl MailService for GmailClient {
    fn list_messages(&self, query: &str, max_results: u32) -> Result<Vec<MessageRef>> {
        let url = format!("{}{}", self.user_url("messages"), list_query(query, max_results));
        let list: ListMessagesResponse = self.get_json("retrieve messages", &url)?;
        Ok(list.messages.unwrap_or_default())
    }

    fn get_message(&self, id: &MessageId) -> Result<GmailMessage> {
        let url = self.user_url(&format!(
            "messages/{}?format=full",
            urlencoding::encode(id.as_str())
        ));
        self.get_json("retrieve message", &url)
    }

    fn get_thread(&self, id: &ThreadId) -> Result<GmailThread> {
        let url = self.user_url(&format!(
            "threads/{}?format=full",
            urlencoding::encode(id.as_str())
        ));
        self.get_json("retrieve thread", &url)
    }

    fn send_message(&self, raw: &str, thread_id: Option<&ThreadId>) -> Result<GmailMessage> {
        let url = self.user_url("messages/send");
        let request = SendRequest {
            raw,
            thread_id: thread_id.map(ThreadId::as_str),
        };
        self.post_json("send message", &url, &request)
    }

    fn modify_message(
        &self,
        id: &MessageId,
        add_labels: &[String],
        remove_labels: &[String],
    ) -> Result<GmailMessage> {
        let url = self.user_url(&format!(
            "messages/{}/modify",
            urlencoding::encode(id.as_str())
        ));
        let request = ModifyRequest {
            add_label_ids: add_labels,
            remove_label_ids: remove_labels,
        };
        self.post_json("modify message", &url, &request)
    }

    fn modify_thread(
        &self,
        id: &ThreadId,
        add_labels: &[String],
        remove_labels: &[String],
    ) -> Result<GmailThread> {
        let url = self.user_url(&format!(
            "threads/{}/modify",
            urlencoding::encode(id.as_str())
        ));
        let request = ModifyRequest {
            add_label_ids: add_labels,
            remove_label_ids: remove_labels,
        };
        self.post_json("modify thread", &url, &request)
    }
}
