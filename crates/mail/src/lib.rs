//! Mail crate - Business logic for the support agent
//!
//! This crate provides:
//! - Domain models (NormalizedMessage, ThreadSummary)
//! - Gmail API client, OAuth authentication and response normalization
//! - Read operations (listing, search, message detail, thread summary)
//! - Write operations (archive, relabel, reply)
//! - Emailit suppression list management
//!
//! Everything is synchronous; each operation is a short fixed sequence of
//! blocking HTTP calls.

pub mod actions;
pub mod config;
pub mod gmail;
pub mod models;
pub mod query;
pub mod suppressions;

pub use actions::{ActionHandler, LabelChange, SentReply, Target};
pub use config::{GmailCredentials, Settings};
pub use gmail::{ApiStatusError, GmailAuth, GmailClient, MailService, TokenProvider};
pub use models::{HeaderSet, MessageId, NormalizedMessage, ThreadId, ThreadSummary};
pub use query::{ListFilter, fetch_messages, get_message_detail, get_thread_summary};
pub use suppressions::{ListResponse, Removal, Suppression, SuppressionClient, SuppressionList};
