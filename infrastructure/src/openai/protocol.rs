//! Wire types for the chat completions API.
//!
//! - **Request**: `{"model", "messages": [{role, content}], "stream": true}`
//! - **Stream frames**: `data: {"choices": [{"delta": {"content": ".."}}]}`,
//!   terminated by `data: [DONE]`
//! - **Errors**: `{"error": {"message": "..", "type": ".."}}`, either as the
//!   body of a non-2xx response or as a frame inside the stream

use chatbridge_domain::{Message, Model, StreamEvent};
use serde::{Deserialize, Serialize};

/// Sentinel payload of the final stream frame.
pub const DONE_MARKER: &str = "[DONE]";

/// Streaming chat completion request body
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub stream: bool,
}

impl<'a> ChatCompletionRequest<'a> {
    pub fn streaming(model: &'a Model, messages: &'a [Message]) -> Self {
        Self {
            model: model.as_str(),
            messages,
            stream: true,
        }
    }
}

/// One `data:` frame of a streaming response
#[derive(Debug, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkDelta {
    pub content: Option<String>,
}

/// Error envelope returned by the API
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Interpret the payload of one SSE frame.
///
/// Returns `None` for frames that carry no text, such as the leading
/// role-only delta.
pub fn event_from_frame(data: &str) -> Option<StreamEvent> {
    let data = data.trim();
    if data == DONE_MARKER {
        return Some(StreamEvent::Completed);
    }

    let chunk: ChatCompletionChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            return Some(StreamEvent::Error(format!(
                "invalid stream frame: {}",
                e
            )));
        }
    };

    if let Some(error) = chunk.error {
        return Some(StreamEvent::Error(error.message));
    }

    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .map(StreamEvent::Delta)
}

/// Best-effort human-readable message from an error response body
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => match parsed.error.kind {
            Some(kind) => format!("{} ({})", parsed.error.message, kind),
            None => parsed.error.message,
        },
        Err(_) => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        }
    }
}
