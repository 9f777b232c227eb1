//! Background drain of one in-flight assistant turn.

use super::{RelayError, RelayState, lock};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationEventKind, ConversationLogger,
};
use crate::ports::llm_gateway::UpstreamStream;
use chatbridge_domain::{Conversation, Model, StreamEvent, TurnHandle};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Marks the relay as streaming for as long as it lives.
pub(super) struct ActiveGuard {
    state: Arc<Mutex<RelayState>>,
}

impl ActiveGuard {
    /// Move the relay from Idle to Streaming, or fail if a turn is in flight.
    pub(super) fn acquire(state: &Arc<Mutex<RelayState>>) -> Result<Self, RelayError> {
        let mut current = lock(state);
        if *current == RelayState::Streaming {
            return Err(RelayError::SessionActive);
        }
        *current = RelayState::Streaming;
        Ok(Self {
            state: Arc::clone(state),
        })
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        *lock(&self.state) = RelayState::Idle;
    }
}

/// Closes the upstream subscription on every exit path, unwinding included.
struct SubscriptionGuard(Box<dyn UpstreamStream>);

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// State of one streamed assistant turn.
///
/// Field order is drop order: the subscription is released, then the relay
/// goes back to Idle, and only then does the reader observe end-of-data.
/// A terminal error releases the relay before it is delivered.
pub(super) struct StreamSession {
    upstream: SubscriptionGuard,
    active: Option<ActiveGuard>,
    output: mpsc::Sender<Result<String, RelayError>>,
    conversation: Arc<Mutex<Conversation>>,
    turn: TurnHandle,
    model: Model,
    logger: Arc<dyn ConversationLogger>,
}

impl StreamSession {
    pub(super) fn new(
        upstream: Box<dyn UpstreamStream>,
        active: ActiveGuard,
        output: mpsc::Sender<Result<String, RelayError>>,
        conversation: Arc<Mutex<Conversation>>,
        turn: TurnHandle,
        model: Model,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        Self {
            upstream: SubscriptionGuard(upstream),
            active: Some(active),
            output,
            conversation,
            turn,
            model,
            logger,
        }
    }

    /// Pump upstream events into the reader and the transcript until the
    /// upstream ends, fails, the reader goes away, or `cancel` fires.
    pub(super) async fn drain(mut self, cancel: CancellationToken) {
        let mut fragments = 0usize;

        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.finish_cancelled(fragments).await;
                    return;
                }
                _ = self.output.closed() => {
                    debug!(model = %self.model, fragments, "Reader dropped, abandoning stream");
                    return;
                }
                event = self.upstream.0.next_event() => event,
            };

            match event {
                StreamEvent::Delta(fragment) => {
                    if fragment.is_empty() {
                        continue;
                    }

                    let sent = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            self.finish_cancelled(fragments).await;
                            return;
                        }
                        sent = self.output.send(Ok(fragment.clone())) => sent,
                    };
                    if sent.is_err() {
                        debug!(model = %self.model, fragments, "Reader dropped, abandoning stream");
                        return;
                    }

                    lock(&self.conversation).append_to(self.turn, &fragment);
                    fragments += 1;
                }
                StreamEvent::Completed => {
                    let text = self.turn_content();
                    info!(model = %self.model, fragments, bytes = text.len(), "Response complete");
                    self.logger.log(ConversationEvent::new(
                        ConversationEventKind::AssistantResponse,
                        serde_json::json!({
                            "model": self.model.as_str(),
                            "fragments": fragments,
                            "text": text,
                        }),
                    ));
                    return;
                }
                StreamEvent::Error(message) => {
                    warn!(model = %self.model, fragments, error = %message, "Upstream failed mid-stream");
                    self.logger.log(ConversationEvent::new(
                        ConversationEventKind::StreamError,
                        serde_json::json!({
                            "model": self.model.as_str(),
                            "fragments": fragments,
                            "error": message,
                            "partial_text": self.turn_content(),
                        }),
                    ));
                    self.release();
                    let _ = self
                        .output
                        .send(Err(RelayError::Upstream {
                            model: self.model.clone(),
                            message,
                        }))
                        .await;
                    return;
                }
            }
        }
    }

    async fn finish_cancelled(&mut self, fragments: usize) {
        info!(model = %self.model, fragments, "Response cancelled");
        self.logger.log(ConversationEvent::new(
            ConversationEventKind::StreamCancelled,
            serde_json::json!({
                "model": self.model.as_str(),
                "fragments": fragments,
                "partial_text": self.turn_content(),
            }),
        ));
        self.release();
        let _ = self.output.send(Err(RelayError::Cancelled)).await;
    }

    /// Return the relay to Idle ahead of the final error item, so a caller
    /// that reacts to the error can send again right away.
    fn release(&mut self) {
        self.active.take();
    }

    fn turn_content(&self) -> String {
        lock(&self.conversation)
            .content(self.turn)
            .unwrap_or_default()
            .to_string()
    }
}
