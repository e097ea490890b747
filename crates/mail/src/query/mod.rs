//! Read operations
//!
//! Sequences calls to the [`crate::gmail::MailService`] and returns
//! normalized messages or thread summaries ready for rendering.

mod messages;
mod threads;

pub use messages::{
    DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT, ListFilter, fetch_messages, get_message_detail,
};
pub use threads::{aggregate_thread, get_thread_summary};
