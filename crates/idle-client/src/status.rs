use crate::error::TransitionError;

/// Lifecycle of one chat turn as the client sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatStatus {
    #[default]
    Idle,
    Submitted,
    Streaming,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEvent {
    MessageSent,
    ChunkReceived,
    StreamClosed,
    ErrorReceived,
    StopRequested,
}

impl ChatStatus {
    pub fn next(self, event: ChatEvent) -> Result<ChatStatus, TransitionError> {
        use ChatEvent::*;
        use ChatStatus::*;

        match (self, event) {
            (Idle | Ready | Error, MessageSent) => Ok(Submitted),
            (Submitted | Streaming, ChunkReceived) => Ok(Streaming),
            (Submitted | Streaming, StreamClosed) => Ok(Ready),
            (Submitted | Streaming, ErrorReceived) => Ok(Error),
            (Submitted | Streaming, StopRequested) => Ok(Ready),
            (from, event) => Err(TransitionError { from, event }),
        }
    }

    /// A request is in flight
    pub fn is_busy(self) -> bool {
        matches!(self, ChatStatus::Submitted | ChatStatus::Streaming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let status = ChatStatus::Idle
            .next(ChatEvent::MessageSent)
            .and_then(|s| s.next(ChatEvent::ChunkReceived))
            .and_then(|s| s.next(ChatEvent::ChunkReceived))
            .and_then(|s| s.next(ChatEvent::StreamClosed))
            .unwrap();
        assert_eq!(status, ChatStatus::Ready);
    }

    #[test]
    fn test_error_and_retry() {
        let status = ChatStatus::Submitted.next(ChatEvent::ErrorReceived).unwrap();
        assert_eq!(status, ChatStatus::Error);
        assert_eq!(status.next(ChatEvent::MessageSent).unwrap(), ChatStatus::Submitted);
    }

    #[test]
    fn test_invalid_transitions() {
        assert_eq!(
            ChatStatus::Idle.next(ChatEvent::ChunkReceived),
            Err(TransitionError { from: ChatStatus::Idle, event: ChatEvent::ChunkReceived })
        );
        assert!(ChatStatus::Streaming.next(ChatEvent::MessageSent).is_err());
        assert!(ChatStatus::Ready.next(ChatEvent::StopRequested).is_err());
        assert!(ChatStatus::Error.next(ChatEvent::StreamClosed).is_err());
    }

    #[test]
    fn test_busy() {
        assert!(ChatStatus::Submitted.is_busy());
        assert!(ChatStatus::Streaming.is_busy());
        assert!(!ChatStatus::Ready.is_busy());
    }
}
