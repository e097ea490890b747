//! reply-message, archive-message and label-message

use std::io::Write;

use anyhow::{Context, Result};
use mail::actions::parse_label_list;
use mail::{MessageId, Target, ThreadId};

use super::Session;
use crate::output::{self, OutputFormat};

pub fn reply(
    session: &Session,
    message_id: &str,
    body: &str,
    thread_id: Option<&str>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let thread_id = thread_id.filter(|t| !t.is_empty()).map(ThreadId::new);
    let sent = session
        .actions
        .reply(&MessageId::new(message_id), body, thread_id.as_ref())?;
    output::reply_sent(out, &sent, format)
}

pub fn archive(
    session: &Session,
    message_id: Option<&str>,
    thread_id: Option<&str>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let target = target(message_id, thread_id)?;
    let change = session.actions.archive(&target)?;
    output::archived(out, &change, format)
}

pub fn label(
    session: &Session,
    message_id: Option<&str>,
    thread_id: Option<&str>,
    add: Option<&str>,
    remove: Option<&str>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let target = target(message_id, thread_id)?;
    let add = add.map(parse_label_list).unwrap_or_default();
    let remove = remove.map(parse_label_list).unwrap_or_default();

    let change = session.actions.modify_labels(&target, add, remove)?;
    output::relabelled(out, &change, format)
}

fn target(message_id: Option<&str>, thread_id: Option<&str>) -> Result<Target> {
    Target::from_ids(message_id, thread_id).context("either message-id or thread-id is required")
}
