//! Gmail API response normalization
//!
//! Flattens a Gmail message (header list plus MIME part tree) into a
//! [`NormalizedMessage`]. Every function here is total: malformed or missing
//! data degrades to empty values instead of errors.

use base64::prelude::*;
use chrono::{DateTime, FixedOffset};

use super::api::{GmailMessage, MessagePart};
use crate::models::{HeaderSet, MessageId, NormalizedMessage, ThreadId};

/// Weekday tokens accepted at the start of a `Date` header
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Normalize a Gmail API message
pub fn normalize_message(gmail_msg: &GmailMessage) -> NormalizedMessage {
    let headers = extract_headers(gmail_msg);

    let (body, attachments) = match &gmail_msg.payload {
        Some(payload) => (extract_body(payload), extract_attachments(payload)),
        None => (String::new(), Vec::new()),
    };

    let labels = label_names(gmail_msg.label_ids.as_deref().unwrap_or_default());
    let timestamp = parse_date(headers.get("date"));

    NormalizedMessage {
        id: MessageId::new(&gmail_msg.id),
        thread_id: ThreadId::new(&gmail_msg.thread_id),
        from: headers.get("from").to_string(),
        to: headers.get("to").to_string(),
        subject: headers.get("subject").to_string(),
        date: headers.get("date").to_string(),
        message_id: headers.get("message-id").to_string(),
        in_reply_to: headers.get("in-reply-to").to_string(),
        references: headers.get("references").to_string(),
        snippet: gmail_msg.snippet.clone(),
        body,
        attachments,
        labels,
        timestamp,
    }
}

/// Collect the recognized headers of the top-level part, later duplicates winning
pub fn extract_headers(gmail_msg: &GmailMessage) -> HeaderSet {
    let mut headers = HeaderSet::new();
    let list = gmail_msg
        .payload
        .as_ref()
        .and_then(|p| p.headers.as_deref())
        .unwrap_or_default();

    for header in list {
        headers.insert(&header.name, header.value.as_str());
    }
    headers
}

/// Find the first text/plain body in pre-order
///
/// HTML parts are never used as a fallback.
pub fn extract_body(part: &MessagePart) -> String {
    if let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref())
        && !data.is_empty()
        && part.mime_type == "text/plain"
    {
        return decode_base64_body(data).unwrap_or_default();
    }

    for child in part.parts.as_deref().unwrap_or_default() {
        let body = extract_body(child);
        if !body.is_empty() {
            return body;
        }
    }

    String::new()
}

/// Collect attachment filenames in pre-order, duplicates included
pub fn extract_attachments(part: &MessagePart) -> Vec<String> {
    let mut names = Vec::new();
    collect_attachments(part, &mut names);
    names
}

fn collect_attachments(part: &MessagePart, names: &mut Vec<String>) {
    if let Some(filename) = part.filename.as_deref()
        && !filename.is_empty()
    {
        names.push(filename.to_string());
    }

    for child in part.parts.as_deref().unwrap_or_default() {
        collect_attachments(child, names);
    }
}

/// Resolve label IDs to display names
///
/// Gmail label IDs are shown as-is; no label catalog lookup happens here.
pub fn label_names(label_ids: &[String]) -> Vec<String> {
    label_ids.to_vec()
}

/// Parse a `Date` header of the form "Mon, 02 Jan 2006 15:04:05 -0700"
///
/// The layout is fixed: two-digit day and a numeric `+hhmm` zone. The
/// weekday must be a valid abbreviation but is not checked against the
/// date itself.
pub fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let (weekday, rest) = value.split_once(", ")?;
    if !WEEKDAYS.contains(&weekday) || !has_fixed_layout(rest) {
        return None;
    }
    DateTime::parse_from_str(rest, "%d %b %Y %H:%M:%S %z").ok()
}

/// Check "02 Jan 2006 15:04:05 -0700" character classes position by position
fn has_fixed_layout(rest: &str) -> bool {
    const LAYOUT: &[u8] = b"dd aaa dddd dd:dd:dd sdddd";

    let bytes = rest.as_bytes();
    bytes.len() == LAYOUT.len()
        && bytes.iter().zip(LAYOUT).all(|(&b, &class)| match class {
            b'd' => b.is_ascii_digit(),
            b'a' => b.is_ascii_alphabetic(),
            b's' => b == b'+' || b == b'-',
            other => b == other,
        })
}

/// Decode base64url body data
///
/// Gmail usually pads body data, but not always.
fn decode_base64_body(data: &str) -> Option<String> {
    let decoded = BASE64_URL_SAFE
        .decode(data)
        .or_else(|_| BASE64_URL_SAFE_NO_PAD.decode(data))
        .ok()?;
    Some(String::from_utf8_lossy(&decoded).into_owned())
}
