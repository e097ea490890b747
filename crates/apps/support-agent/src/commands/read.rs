//! read-messages, read-threads, read-message-detail and search-messages

use std::io::Write;

use anyhow::Result;
use mail::{ListFilter, MessageId, ThreadId, fetch_messages, get_message_detail, get_thread_summary};

use super::Session;
use crate::output::{self, OutputFormat};

pub fn read_messages(
    session: &Session,
    filter: &ListFilter,
    limit: u32,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let messages = fetch_messages(session.gmail.as_ref(), &filter.to_query(), limit)?;
    output::message_list(out, &messages, format)
}

pub fn search_messages(
    session: &Session,
    query: &str,
    limit: u32,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let messages = fetch_messages(session.gmail.as_ref(), query, limit)?;
    output::search_results(out, query, &messages, format)
}

pub fn read_message_detail(
    session: &Session,
    message_id: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let message = get_message_detail(session.gmail.as_ref(), &MessageId::new(message_id))?;
    output::message_detail(out, &message, format)
}

pub fn read_thread(
    session: &Session,
    thread_id: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let summary = get_thread_summary(session.gmail.as_ref(), &ThreadId::new(thread_id))?;
    output::thread(out, &summary, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::message;
    use mail::gmail::InMemoryMailbox;
    use std::sync::Arc;

    fn session() -> Session {
        let mailbox = InMemoryMailbox::new(vec![
            message("m1", "t1", "Customer <customer@example.com>", "Help", "Where is my order?"),
            message("m2", "t1", "help@example.com", "Re: Help", "On its way."),
            message("m3", "t2", "other@example.com", "Invoice", "Resend please"),
        ]);
        Session::new(Arc::new(mailbox))
    }

    #[test]
    fn test_read_messages_respects_limit() {
        let mut out = Vec::new();
        read_messages(&session(), &ListFilter::default(), 2, OutputFormat::Simple, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("m1 | Customer <customer@example.com> | Help |"));
    }

    #[test]
    fn test_search_json_contains_bodies() {
        let mut out = Vec::new();
        search_messages(&session(), "in:anywhere", 20, OutputFormat::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(3));
        assert_eq!(value[1]["body"], "On its way.");
    }

    #[test]
    fn test_read_message_detail_missing_is_error() {
        let mut out = Vec::new();
        let result = read_message_detail(&session(), "nope", OutputFormat::Detailed, &mut out);
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_read_thread_simple() {
        let mut out = Vec::new();
        read_thread(&session(), "t1", OutputFormat::Simple, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Thread ID: t1\nSubject: Help\nMessages: 2\n"));
        assert!(text.contains("  2. help@example.com -> help@example.com"));
    }
}
