//! Rendering of command results
//!
//! Every renderer writes to an `impl Write` so the formats can be checked
//! without touching stdout.

use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use mail::actions::TargetKind;
use mail::{LabelChange, NormalizedMessage, SentReply, ThreadSummary};
use serde::Serialize;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per item
    Simple,
    /// Multi-line blocks with bodies
    Detailed,
    /// Pretty-printed JSON
    Json,
}

/// Pretty-print any serializable value
pub fn json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode JSON")?;
    writeln!(out, "{}", text)?;
    Ok(())
}

/// Inbox listing
pub fn message_list(
    out: &mut impl Write,
    messages: &[NormalizedMessage],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => json(out, messages),
        OutputFormat::Detailed => {
            for (i, msg) in messages.iter().enumerate() {
                writeln!(out, "=== Message {} ===", i + 1)?;
                message_block(out, msg)?;
            }
            Ok(())
        }
        OutputFormat::Simple => {
            for msg in messages {
                writeln!(out, "{}", simple_line(msg))?;
            }
            Ok(())
        }
    }
}

/// Search results, numbered and headed by the query
pub fn search_results(
    out: &mut impl Write,
    query: &str,
    messages: &[NormalizedMessage],
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return json(out, messages);
    }

    if messages.is_empty() {
        writeln!(out, "No messages found matching query.")?;
        return Ok(());
    }

    writeln!(
        out,
        "Found {} messages matching query: {}\n",
        messages.len(),
        query
    )?;

    let total = messages.len();
    for (i, msg) in messages.iter().enumerate() {
        if format == OutputFormat::Detailed {
            writeln!(out, "=== Result {} of {} ===", i + 1, total)?;
            message_block(out, msg)?;
        } else {
            writeln!(out, "{}. {}", i + 1, simple_line(msg))?;
        }
    }
    Ok(())
}

/// A single message with its attachments
pub fn message_detail(
    out: &mut impl Write,
    msg: &NormalizedMessage,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => json(out, msg),
        OutputFormat::Simple => {
            writeln!(out, "ID: {}", msg.id)?;
            writeln!(out, "From: {}", msg.from)?;
            writeln!(out, "Subject: {}", msg.subject)?;
            writeln!(out, "Date: {}", msg.date)?;
            if !msg.attachments.is_empty() {
                writeln!(out, "Attachments: {}", msg.attachments.len())?;
            }
            Ok(())
        }
        OutputFormat::Detailed => {
            writeln!(out, "=== Message Details ===")?;
            headers_block(out, msg)?;
            if !msg.attachments.is_empty() {
                writeln!(out, "\nAttachments ({}):", msg.attachments.len())?;
                for name in &msg.attachments {
                    writeln!(out, "  - {}", name)?;
                }
            }
            writeln!(out, "\nBody:\n{}", msg.body)?;
            Ok(())
        }
    }
}

/// A conversation and its messages
pub fn thread(out: &mut impl Write, summary: &ThreadSummary, format: OutputFormat) -> Result<()> {
    let participants = summary
        .participants
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    match format {
        OutputFormat::Json => json(out, summary),
        OutputFormat::Detailed => {
            writeln!(out, "=== Thread: {} ===", summary.id)?;
            writeln!(out, "Subject: {}", summary.subject)?;
            writeln!(out, "Participants: {}", participants)?;
            writeln!(out, "Message Count: {}", summary.message_count)?;
            if let Some(last) = summary.last_message {
                writeln!(out, "Last Message: {}", last.to_rfc3339())?;
            }
            writeln!(out, "\n--- Messages ---")?;

            let total = summary.messages.len();
            for (i, msg) in summary.messages.iter().enumerate() {
                writeln!(out, "\n[Message {} of {}]", i + 1, total)?;
                writeln!(out, "ID: {}", msg.id)?;
                writeln!(out, "From: {}", msg.from)?;
                writeln!(out, "To: {}", msg.to)?;
                writeln!(out, "Date: {}", msg.date)?;
                writeln!(out, "Labels: {}", msg.labels.join(", "))?;
                if msg.body.is_empty() {
                    writeln!(out, "\nSnippet: {}", msg.snippet)?;
                } else {
                    writeln!(out, "\n{}", msg.body)?;
                }
                writeln!(out, "{}", "-".repeat(50))?;
            }
            Ok(())
        }
        OutputFormat::Simple => {
            writeln!(out, "Thread ID: {}", summary.id)?;
            writeln!(out, "Subject: {}", summary.subject)?;
            writeln!(out, "Messages: {}", summary.message_count)?;
            writeln!(out, "Participants: {}", participants)?;
            writeln!(out, "\nMessages:")?;
            for (i, msg) in summary.messages.iter().enumerate() {
                writeln!(out, "  {}. {} -> {} ({})", i + 1, msg.from, msg.to, msg.date)?;
            }
            Ok(())
        }
    }
}

/// Confirmation of a sent reply
pub fn reply_sent(out: &mut impl Write, sent: &SentReply, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return json(out, sent);
    }

    writeln!(out, "Reply sent successfully!")?;
    writeln!(out, "Message ID: {}", sent.id)?;
    writeln!(out, "Thread ID: {}", sent.thread_id)?;
    writeln!(out, "To: {}", sent.to)?;
    writeln!(out, "Subject: {}", sent.subject)?;
    Ok(())
}

/// Confirmation of an archive
pub fn archived(out: &mut impl Write, change: &LabelChange, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return json(out, change);
    }

    match change.kind {
        TargetKind::Thread => {
            writeln!(out, "Thread archived successfully!")?;
            writeln!(out, "Thread ID: {}", change.id)?;
            writeln!(out, "Messages archived: {}", change.message_count.unwrap_or(0))?;
        }
        TargetKind::Message => {
            writeln!(out, "Message archived successfully!")?;
            writeln!(out, "Message ID: {}", change.id)?;
            writeln!(out, "Thread ID: {}", change.thread_id.as_deref().unwrap_or_default())?;
            if format == OutputFormat::Detailed {
                current_labels(out, change)?;
            }
        }
    }
    Ok(())
}

/// Confirmation of a label change
pub fn relabelled(out: &mut impl Write, change: &LabelChange, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return json(out, change);
    }

    match change.kind {
        TargetKind::Thread => {
            writeln!(out, "Thread labels updated successfully!")?;
            writeln!(out, "Thread ID: {}", change.id)?;
        }
        TargetKind::Message => {
            writeln!(out, "Message labels updated successfully!")?;
            writeln!(out, "Message ID: {}", change.id)?;
        }
    }
    if !change.added.is_empty() {
        writeln!(out, "Added labels: {}", change.added.join(", "))?;
    }
    if !change.removed.is_empty() {
        writeln!(out, "Removed labels: {}", change.removed.join(", "))?;
    }
    current_labels(out, change)
}

fn current_labels(out: &mut impl Write, change: &LabelChange) -> Result<()> {
    if let Some(labels) = &change.labels {
        writeln!(out, "Current labels: {}", labels.join(", "))?;
    }
    Ok(())
}

fn simple_line(msg: &NormalizedMessage) -> String {
    format!("{} | {} | {} | {}", msg.id, msg.from, msg.subject, msg.date)
}

fn headers_block(out: &mut impl Write, msg: &NormalizedMessage) -> Result<()> {
    writeln!(out, "ID: {}", msg.id)?;
    writeln!(out, "Thread ID: {}", msg.thread_id)?;
    writeln!(out, "From: {}", msg.from)?;
    writeln!(out, "To: {}", msg.to)?;
    writeln!(out, "Subject: {}", msg.subject)?;
    writeln!(out, "Date: {}", msg.date)?;
    writeln!(out, "Labels: {}", msg.labels.join(", "))?;
    Ok(())
}

/// Headers plus body, falling back to the snippet for bodiless messages
fn message_block(out: &mut impl Write, msg: &NormalizedMessage) -> Result<()> {
    headers_block(out, msg)?;
    if msg.body.is_empty() {
        writeln!(out, "\nSnippet: {}", msg.snippet)?;
    } else {
        writeln!(out, "\nBody:\n{}", msg.body)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mail::{MessageId, ThreadId};
    use std::collections::BTreeSet;

    fn message(id: &str, subject: &str, body: &str) -> NormalizedMessage {
        NormalizedMessage {
            id: MessageId::new(id),
            thread_id: ThreadId::new("t1"),
            from: "Customer <customer@example.com>".to_string(),
            to: "help@example.com".to_string(),
            subject: subject.to_string(),
            date: "Mon, 02 Jan 2024 10:00:00 +0000".to_string(),
            message_id: String::new(),
            in_reply_to: String::new(),
            references: String::new(),
            snippet: "snippet text".to_string(),
            body: body.to_string(),
            attachments: Vec::new(),
            labels: vec!["INBOX".to_string(), "UNREAD".to_string()],
            timestamp: mail::gmail::parse_date("Mon, 02 Jan 2024 10:00:00 +0000"),
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_simple_listing() {
        let msgs = vec![message("m1", "Help", "body"), message("m2", "Invoice", "")];
        let text = render(|out| message_list(out, &msgs, OutputFormat::Simple));
        assert_eq!(
            text,
            "m1 | Customer <customer@example.com> | Help | Mon, 02 Jan 2024 10:00:00 +0000\n\
             m2 | Customer <customer@example.com> | Invoice | Mon, 02 Jan 2024 10:00:00 +0000\n"
        );
    }

    #[test]
    fn test_detailed_listing_falls_back_to_snippet() {
        let msgs = vec![message("m1", "Help", "Full body"), message("m2", "Invoice", "")];
        let text = render(|out| message_list(out, &msgs, OutputFormat::Detailed));
        assert!(text.starts_with("=== Message 1 ===\nID: m1\nThread ID: t1\n"));
        assert!(text.contains("\nBody:\nFull body\n"));
        assert!(text.contains("=== Message 2 ===\n"));
        assert!(text.contains("\nSnippet: snippet text\n"));
        assert!(text.contains("Labels: INBOX, UNREAD\n"));
    }

    #[test]
    fn test_json_listing_is_an_array() {
        let msgs = vec![message("m1", "Help", "Full body")];
        let text = render(|out| message_list(out, &msgs, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["id"], "m1");
        assert_eq!(value[0]["body"], "Full body");
        assert_eq!(value[0]["timestamp"], "2024-01-02T10:00:00+00:00");
    }

    #[test]
    fn test_search_results() {
        let msgs = vec![message("m1", "Help", "")];
        let text = render(|out| search_results(out, "from:customer", &msgs, OutputFormat::Simple));
        assert_eq!(
            text,
            "Found 1 messages matching query: from:customer\n\n\
             1. m1 | Customer <customer@example.com> | Help | Mon, 02 Jan 2024 10:00:00 +0000\n"
        );

        let empty = render(|out| search_results(out, "nothing", &[], OutputFormat::Detailed));
        assert_eq!(empty, "No messages found matching query.\n");

        let json_empty = render(|out| search_results(out, "nothing", &[], OutputFormat::Json));
        assert_eq!(json_empty, "[]\n");
    }

    #[test]
    fn test_message_detail_lists_attachments() {
        let mut msg = message("m1", "Invoice", "See attached");
        msg.attachments = vec!["invoice.pdf".to_string(), "logo.png".to_string()];

        let detailed = render(|out| message_detail(out, &msg, OutputFormat::Detailed));
        assert!(detailed.starts_with("=== Message Details ===\nID: m1\n"));
        assert!(detailed.contains("\nAttachments (2):\n  - invoice.pdf\n  - logo.png\n"));
        assert!(detailed.ends_with("\nBody:\nSee attached\n"));

        let simple = render(|out| message_detail(out, &msg, OutputFormat::Simple));
        assert!(simple.ends_with("Attachments: 2\n"));
    }

    #[test]
    fn test_thread_formats() {
        let summary = ThreadSummary {
            id: ThreadId::new("t1"),
            subject: "Help".to_string(),
            participants: BTreeSet::from([
                "Customer <customer@example.com>".to_string(),
                "help@example.com".to_string(),
            ]),
            message_count: 1,
            last_message: mail::gmail::parse_date("Tue, 03 Jan 2024 09:00:00 +0000"),
            messages: vec![message("m1", "Help", "Where is my order?")],
        };

        let simple = render(|out| thread(out, &summary, OutputFormat::Simple));
        assert!(simple.contains(
            "Participants: Customer <customer@example.com>, help@example.com\n"
        ));
        assert!(simple.contains(
            "  1. Customer <customer@example.com> -> help@example.com (Mon, 02 Jan 2024 10:00:00 +0000)\n"
        ));

        let detailed = render(|out| thread(out, &summary, OutputFormat::Detailed));
        assert!(detailed.starts_with("=== Thread: t1 ===\n"));
        assert!(detailed.contains("Last Message: 2024-01-03T09:00:00+00:00\n"));
        assert!(detailed.contains("[Message 1 of 1]\n"));
        assert!(detailed.contains("\nWhere is my order?\n"));
    }

    #[test]
    fn test_archive_and_label_confirmations() {
        let thread_change = LabelChange {
            kind: TargetKind::Thread,
            id: "t1".to_string(),
            thread_id: None,
            message_count: Some(3),
            added: vec![],
            removed: vec!["INBOX".to_string()],
            labels: None,
        };
        assert_eq!(
            render(|out| archived(out, &thread_change, OutputFormat::Simple)),
            "Thread archived successfully!\nThread ID: t1\nMessages archived: 3\n"
        );

        let message_change = LabelChange {
            kind: TargetKind::Message,
            id: "m1".to_string(),
            thread_id: Some("t1".to_string()),
            message_count: None,
            added: vec!["IMPORTANT".to_string()],
            removed: vec![],
            labels: Some(vec!["INBOX".to_string(), "IMPORTANT".to_string()]),
        };
        assert_eq!(
            render(|out| relabelled(out, &message_change, OutputFormat::Simple)),
            "Message labels updated successfully!\n\
             Message ID: m1\n\
             Added labels: IMPORTANT\n\
             Current labels: INBOX, IMPORTANT\n"
        );
    }

    #[test]
    fn test_reply_confirmation() {
        let sent = SentReply {
            id: "s1".to_string(),
            thread_id: "t1".to_string(),
            to: "Customer <customer@example.com>".to_string(),
            subject: "Re: Help".to_string(),
        };
        let text = render(|out| reply_sent(out, &sent, OutputFormat::Simple));
        assert_eq!(
            text,
            "Reply sent successfully!\nMessage ID: s1\nThread ID: t1\n\
             To: Customer <customer@example.com>\nSubject: Re: Help\n"
        );

        let json_text = render(|out| reply_sent(out, &sent, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&json_text).unwrap();
        assert_eq!(value["subject"], "Re: Help");
    }
}
