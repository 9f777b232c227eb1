//! Chat relay use case
//!
//! Forwards one user message at a time to the completion service and exposes
//! the streamed reply as a [`ResponseStream`], while the same fragments are
//! accumulated into the conversation used as context for the next request.
//!
//! ```text
//! send(msg) ──► append user turn ──► open_stream(model, transcript)
//!                                          │
//!          ◄── ResponseStream ◄── append empty assistant turn
//!                   ▲
//!                   │ bounded(1)
//!   StreamSession::drain (tokio::spawn)
//!     ├─ Delta     → reader, then transcript
//!     ├─ Completed → end-of-data
//!     ├─ Error     → Err item, then end-of-data
//!     └─ cancel    → Err(Cancelled), then end-of-data
//! ```
//!
//! A relay handles one reply at a time: [`ChatRelay::send`] fails with
//! [`RelayError::SessionActive`] while a previous reply is still draining.

mod response_stream;
mod session;

pub use response_stream::{ResponseReader, ResponseStream};

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use chatbridge_domain::{Conversation, Message, Model};
use session::{ActiveGuard, StreamSession};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Errors surfaced by [`ChatRelay::send`] and through a [`ResponseStream`]
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("A response is already streaming")]
    SessionActive,

    #[error("Failed to request chat completion: {0}")]
    Establish(#[from] GatewayError),

    #[error("{model} failed to respond to chat completion: {message}")]
    Upstream { model: Model, message: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl RelayError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RelayError::Cancelled)
    }
}

impl From<RelayError> for std::io::Error {
    fn from(err: RelayError) -> Self {
        let kind = match err {
            RelayError::Cancelled => std::io::ErrorKind::Interrupted,
            _ => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}

/// Whether a reply is currently draining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayState {
    #[default]
    Idle,
    Streaming,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Streaming chat relay
///
/// Owns the conversation. Only the relay and its background drain task ever
/// mutate it.
pub struct ChatRelay<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    model: Model,
    conversation: Arc<Mutex<Conversation>>,
    state: Arc<Mutex<RelayState>>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> ChatRelay<G> {
    pub fn new(gateway: Arc<G>, model: Model) -> Self {
        Self {
            gateway,
            model,
            conversation: Arc::new(Mutex::new(Conversation::new())),
            state: Arc::new(Mutex::new(RelayState::Idle)),
            logger: Arc::new(NoConversationLogger),
        }
    }

    /// Seed the conversation with a system prompt
    pub fn with_system_prompt(self, prompt: impl Into<String>) -> Self {
        *lock(&self.conversation) = Conversation::with_system_prompt(prompt);
        self
    }

    /// Record conversation events to a structured log
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn state(&self) -> RelayState {
        *lock(&self.state)
    }

    pub fn is_streaming(&self) -> bool {
        self.state() == RelayState::Streaming
    }

    /// Send `message` and stream the assistant's reply.
    ///
    /// `cancel` aborts request establishment; a child of it stays attached to
    /// the background drain, so cancelling it later ends the reply with
    /// [`RelayError::Cancelled`].
    ///
    /// On `Err` the user message stays in the transcript but no assistant
    /// turn is started.
    pub async fn send(
        &self,
        cancel: &CancellationToken,
        message: &str,
    ) -> Result<ResponseStream, RelayError> {
        let active = ActiveGuard::acquire(&self.state)?;

        info!(model = %self.model, bytes = message.len(), "Sending message");
        self.logger.log(ConversationEvent::new(
            ConversationEventKind::UserMessage,
            serde_json::json!({
                "model": self.model.as_str(),
                "text": message,
            }),
        ));

        let context = {
            let mut conversation = lock(&self.conversation);
            conversation.append_user(message);
            conversation.messages().to_vec()
        };

        let upstream = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(model = %self.model, "Cancelled before the stream opened");
                return Err(RelayError::Cancelled);
            }
            opened = self.gateway.open_stream(&self.model, &context) => opened?,
        };

        let turn = lock(&self.conversation).begin_assistant_turn();
        debug!(model = %self.model, turn = turn.index(), "Stream opened");

        let (output, receiver) = mpsc::channel(1);
        let session = StreamSession::new(
            upstream,
            active,
            output,
            Arc::clone(&self.conversation),
            turn,
            self.model.clone(),
            Arc::clone(&self.logger),
        );
        tokio::spawn(session.drain(cancel.child_token()));

        Ok(ResponseStream::new(receiver))
    }

    /// Flat transcript of the conversation so far.
    ///
    /// Taken under the conversation lock, so a reply that is still streaming
    /// shows up as a consistent prefix of what it will become.
    pub fn messages(&self) -> String {
        lock(&self.conversation).render()
    }

    /// Snapshot of the conversation messages
    pub fn conversation(&self) -> Vec<Message> {
        lock(&self.conversation).messages().to_vec()
    }
}
