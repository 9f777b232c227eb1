//! LLM Gateway port
//!
//! Defines the interface for opening streaming completions against an LLM
//! provider. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use chatbridge_domain::{Message, Model, StreamEvent};
use thiserror::Error;

/// Errors that can occur while establishing a completion stream
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// The request is the model identifier plus the ordered conversation; the
/// response is an [`UpstreamStream`] of fragments.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Issue a streaming completion request for `messages`.
    ///
    /// Returns once the provider has accepted the request. Failures to
    /// connect, authenticate or get a successful status are reported here,
    /// not through the stream.
    async fn open_stream(
        &self,
        model: &Model,
        messages: &[Message],
    ) -> Result<Box<dyn UpstreamStream>, GatewayError>;
}

/// An open completion subscription.
///
/// Yields [`StreamEvent::Delta`] fragments in emission order, terminated by
/// exactly one [`StreamEvent::Completed`] or [`StreamEvent::Error`].
#[async_trait]
pub trait UpstreamStream: Send {
    /// Wait for the next event.
    async fn next_event(&mut self) -> StreamEvent;

    /// Release the underlying connection.
    ///
    /// Called exactly once by the consumer when it stops reading, whether the
    /// stream finished, failed or was abandoned.
    fn close(&mut self);
}
