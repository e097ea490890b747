//! Outgoing reply construction

use base64::prelude::*;

use crate::models::HeaderSet;

/// Sender on every reply; Gmail substitutes the authenticated account
pub const DEFAULT_SENDER: &str = "me";

/// A plain-text reply ready to be encoded for messages/send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyDraft {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub in_reply_to: String,
    pub references: String,
    pub body: String,
}

impl ReplyDraft {
    /// Build a reply to the message whose headers are given
    pub fn to_original(original: &HeaderSet, from: &str, body: &str) -> Self {
        let message_id = original.get("message-id");
        Self {
            from: from.to_string(),
            to: original.get("from").to_string(),
            subject: reply_subject(original.get("subject")),
            in_reply_to: message_id.to_string(),
            references: reply_references(original.get("references"), message_id),
            body: body.to_string(),
        }
    }

    /// Render as an RFC 5322 message with CRLF line endings
    pub fn to_rfc5322(&self) -> String {
        format!(
            "From: {}\r\n\
             To: {}\r\n\
             Subject: {}\r\n\
             In-Reply-To: {}\r\n\
             References: {}\r\n\
             Content-Type: text/plain; charset=UTF-8\r\n\
             \r\n\
             {}",
            self.from, self.to, self.subject, self.in_reply_to, self.references, self.body
        )
    }

    /// base64url (padded) encoding of the rendered message
    pub fn encode(&self) -> String {
        BASE64_URL_SAFE.encode(self.to_rfc5322())
    }
}

/// Prefix "Re: " unless the subject already starts with "re:" in any case
pub fn reply_subject(subject: &str) -> String {
    let already_reply = subject
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("re:"));
    if already_reply {
        subject.to_string()
    } else {
        format!("Re: {}", subject)
    }
}

/// Append the original Message-ID to its References chain
pub fn reply_references(references: &str, message_id: &str) -> String {
    if references.is_empty() {
        message_id.to_string()
    } else {
        format!("{} {}", references, message_id)
    }
}
