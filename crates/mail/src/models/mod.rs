//! Domain models for mail entities

mod message;
mod thread;

pub use message::{HeaderSet, MessageId, NormalizedMessage};
pub use thread::{ThreadId, ThreadSummary};
