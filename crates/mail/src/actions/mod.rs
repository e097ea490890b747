//! Email actions module
//!
//! Write operations: archive, relabel and reply.

mod handler;
mod reply;

pub use handler::{
    ActionHandler, LabelChange, SentReply, Target, TargetKind, labels, parse_label_list,
};
pub use reply::{DEFAULT_SENDER, ReplyDraft, reply_references, reply_subject};
