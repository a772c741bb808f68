use crate::status::{ChatEvent, ChatStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot handle {event:?} while {from:?}")]
pub struct TransitionError {
    pub from: ChatStatus,
    pub event: ChatEvent,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("message not found: {0}")]
    MessageNotFound(String),

    #[error("message is empty")]
    EmptyMessage,

    #[error("attachments must be file parts, got {0}")]
    InvalidAttachment(String),

    #[error("nothing to regenerate")]
    NothingToRegenerate,

    #[error("a request is in flight")]
    Busy,
}
