//! Thread query functions

use anyhow::{Context, Result};
use std::collections::BTreeSet;

use crate::gmail::api::GmailMessage;
use crate::gmail::{MailService, normalize_message};
use crate::models::{ThreadId, ThreadSummary};

/// Fold a conversation's raw messages into a [`ThreadSummary`]
///
/// Messages keep the order given. Dates that fail to parse are left out of
/// `last_message` without failing the aggregation.
pub fn aggregate_thread(thread_id: ThreadId, messages: &[GmailMessage]) -> ThreadSummary {
    let mut subject = String::new();
    let mut participants = BTreeSet::new();
    let mut last_message = None;
    let mut normalized = Vec::with_capacity(messages.len());

    for raw in messages {
        let msg = normalize_message(raw);

        if let Some(ts) = msg.timestamp
            && last_message.is_none_or(|latest| ts > latest)
        {
            last_message = Some(ts);
        }

        if !msg.from.is_empty() {
            participants.insert(msg.from.clone());
        }

        if subject.is_empty() && !msg.subject.is_empty() {
            subject = msg.subject.clone();
        }

        normalized.push(msg);
    }

    ThreadSummary {
        id: thread_id,
        subject,
        participants,
        message_count: messages.len(),
        last_message,
        messages: normalized,
    }
}

/// Fetch a thread and summarize it
///
/// # Arguments
/// * `gmail` - The mail service
/// * `thread_id` - The thread to fetch
pub fn get_thread_summary(gmail: &dyn MailService, thread_id: &ThreadId) -> Result<ThreadSummary> {
    let thread = gmail
        .get_thread(thread_id)
        .with_context(|| format!("failed to get thread {}", thread_id))?;

    let id = if thread.id.is_empty() {
        thread_id.clone()
    } else {
        ThreadId::new(thread.id)
    };

    Ok(aggregate_thread(id, thread.messages.as_deref().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gmail::api::{Header, MessagePart};
    use chrono::{TimeZone, Utc};

    fn make_message(id: &str, from: &str, subject: &str, date: &str) -> GmailMessage {
        let headers = [("From", from), ("Subject", subject), ("Date", date)]
            .into_iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(n, v)| Header {
                name: n.to_string(),
                value: v.to_string(),
            })
            .collect();

        GmailMessage {
            id: id.to_string(),
            thread_id: "t1".to_string(),
            payload: Some(MessagePart {
                mime_type: "text/plain".to_string(),
                headers: Some(headers),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_last_message_is_latest_date() {
        let messages = vec![
            make_message("m1", "a@example.com", "Help", "Mon, 02 Jan 2024 10:00:00 +0000"),
            make_message("m2", "b@example.com", "Re: Help", "Tue, 03 Jan 2024 09:00:00 +0000"),
        ];

        let summary = aggregate_thread(ThreadId::new("t1"), &messages);
        assert_eq!(
            summary.last_message.unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 3, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_last_message_compares_instants_across_zones() {
        let messages = vec![
            // 2024-01-04 01:00 UTC
            make_message("m1", "a@example.com", "", "Wed, 03 Jan 2024 17:00:00 -0800"),
            // 2024-01-03 23:00 UTC
            make_message("m2", "b@example.com", "", "Thu, 04 Jan 2024 00:00:00 +0100"),
        ];

        let summary = aggregate_thread(ThreadId::new("t1"), &messages);
        assert_eq!(
            summary.last_message.unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 4, 1, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unparsable_dates_are_skipped() {
        let messages = vec![
            make_message("m1", "a@example.com", "Help", "yesterday"),
            make_message("m2", "a@example.com", "Help", "Fri, 05 Jan 2024 08:00:00 +0000"),
            make_message("m3", "a@example.com", "Help", "Fri, 05 Jan 2024 08:00:00 GMT"),
        ];

        let summary = aggregate_thread(ThreadId::new("t1"), &messages);
        assert_eq!(
            summary.last_message.unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap()
        );
        assert!(summary.messages[0].timestamp.is_none());
        assert_eq!(summary.message_count, 3);
    }

    #[test]
    fn test_no_parsable_dates() {
        let messages = vec![
            make_message("m1", "a@example.com", "Help", "not a date"),
            make_message("m2", "a@example.com", "Help", ""),
        ];

        let summary = aggregate_thread(ThreadId::new("t1"), &messages);
        assert!(summary.last_message.is_none());
    }

    #[test]
    fn test_subject_from_first_non_empty() {
        let messages = vec![
            make_message("m1", "a@example.com", "", ""),
            make_message("m2", "b@example.com", "Order #42", ""),
            make_message("m3", "a@example.com", "Re: Order #42 (urgent)", ""),
        ];

        let summary = aggregate_thread(ThreadId::new("t1"), &messages);
        assert_eq!(summary.subject, "Order #42");
    }

    #[test]
    fn test_participants_are_distinct() {
        let messages = vec![
            make_message("m1", "Alice <a@example.com>", "Hi", ""),
            make_message("m2", "Bob <b@example.com>", "Re: Hi", ""),
            make_message("m3", "Alice <a@example.com>", "Re: Hi", ""),
            make_message("m4", "", "Re: Hi", ""),
        ];

        let summary = aggregate_thread(ThreadId::new("t1"), &messages);
        assert_eq!(summary.participants.len(), 2);
        assert!(summary.participants.contains("Alice <a@example.com>"));
        assert!(summary.participants.contains("Bob <b@example.com>"));
        assert_eq!(summary.message_count, 4);
        assert_eq!(summary.messages[3].id.as_str(), "m4");
    }

    #[test]
    fn test_empty_thread() {
        let summary = aggregate_thread(ThreadId::new("t9"), &[]);
        assert_eq!(summary.id.as_str(), "t9");
        assert_eq!(summary.message_count, 0);
        assert!(summary.subject.is_empty());
        assert!(summary.participants.is_empty());
        assert!(summary.last_message.is_none());
    }
}
