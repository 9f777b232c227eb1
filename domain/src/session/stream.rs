//! Streaming events for LLM completion responses.
//!
//! [`StreamEvent`] represents one item pulled from an upstream completion
//! stream, enabling real-time display of model output as it's generated.

/// An event in a streaming completion response.
///
/// Used to bridge infrastructure-level streaming (e.g., SSE frames from an
/// OpenAI-compatible endpoint) to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment from the model (one `delta.content`).
    Delta(String),
    /// The upstream signalled end-of-data.
    Completed,
    /// An error that occurred during streaming.
    Error(String),
}

impl StreamEvent {
    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed | StreamEvent::Error(_))
    }
}
