//! Port for the structured conversation log.
//!
//! Records what was said and how each reply ended, one event per line in
//! a machine-readable log. Diagnostics stay on `tracing`.

use serde_json::Value;

/// What happened in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationEventKind {
    /// A message was relayed to the model
    UserMessage,
    /// A reply streamed to completion
    AssistantResponse,
    /// The upstream failed mid-reply
    StreamError,
    /// The reply was cancelled by the caller
    StreamCancelled,
}

impl ConversationEventKind {
    /// Record type written to the log
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserMessage => "user_message",
            Self::AssistantResponse => "assistant_response",
            Self::StreamError => "stream_error",
            Self::StreamCancelled => "stream_cancelled",
        }
    }
}

/// One conversation log record before serialization.
pub struct ConversationEvent {
    pub kind: ConversationEventKind,
    /// Event fields; an object is flattened into the record
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(kind: ConversationEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Sink for conversation events.
///
/// Logging never fails a chat, so `log` has no error path.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
