//! suppressions: list, check and remove Emailit suppressions

use std::io::Write;

use anyhow::Result;
use mail::{ListResponse, Removal, Suppression, SuppressionClient, SuppressionList};

/// Which suppression operation to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Check(String),
    Remove(String),
}

pub fn run(client: &SuppressionClient, action: Action, out: &mut impl Write) -> Result<()> {
    match action {
        Action::List => print_list_response(out, &client.list_response()?),
        Action::Check(email) => print_check(out, &email, client.find_by_email(&email)?.as_ref()),
        Action::Remove(email) => print_removal(out, &email, &client.remove(&email)?),
    }
}

fn print_list_response(out: &mut impl Write, response: &ListResponse) -> Result<()> {
    match response {
        ListResponse::Parsed(list) => print_list(out, list),
        ListResponse::Unrecognized(body) => {
            writeln!(out, "Suppressions:")?;
            writeln!(out, "{}", body)?;
            Ok(())
        }
    }
}

fn print_list(out: &mut impl Write, list: &SuppressionList) -> Result<()> {
    if list.data.is_empty() {
        writeln!(out, "No suppressions found.")?;
        return Ok(());
    }

    writeln!(
        out,
        "Found {} suppression(s) (total: {}):\n",
        list.data.len(),
        list.total_records
    )?;
    for s in &list.data {
        writeln!(out, "{}", s.email)?;
        writeln!(out, "  ID: {} | Reason: {}", s.id, s.reason)?;
    }
    Ok(())
}

fn print_check(out: &mut impl Write, email: &str, found: Option<&Suppression>) -> Result<()> {
    match found {
        None => writeln!(out, "Email '{}' is NOT suppressed.", email)?,
        Some(s) => {
            writeln!(out, "Email '{}' IS suppressed:", email)?;
            writeln!(out, "  ID: {}", s.id)?;
            if !s.kind.is_empty() {
                writeln!(out, "  Type: {}", s.kind)?;
            }
            writeln!(out, "  Reason: {}", s.reason)?;
            if !s.timestamp.is_empty() {
                writeln!(out, "  Since: {}", s.timestamp)?;
            }
            if let Some(until) = &s.keep_until {
                writeln!(out, "  Keep until: {}", until)?;
            }
        }
    }
    Ok(())
}

fn print_removal(out: &mut impl Write, email: &str, removal: &Removal) -> Result<()> {
    match removal {
        Removal::NotSuppressed => {
            writeln!(out, "Email '{}' is not in the suppression list.", email)?
        }
        Removal::Removed(s) => writeln!(
            out,
            "Successfully removed suppression for '{}' (ID: {}).",
            email, s.id
        )?,
    }
    Ok(())
}
