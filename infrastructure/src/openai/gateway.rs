//! LLM Gateway implementation for OpenAI-compatible endpoints

use super::protocol::{ChatCompletionRequest, error_message, event_from_frame};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use bytes::Bytes;
use chatbridge_application::{GatewayError, LlmGateway, UpstreamStream};
use chatbridge_domain::{Message, Model, StreamEvent};
use eventsource_stream::{Event, Eventsource};
use futures::stream::{Stream, StreamExt};
use std::fmt::Display;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// LLM Gateway backed by the streaming chat completions API
pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl OpenAiGateway {
    /// `timeout` bounds request establishment only; an open stream may run
    /// for as long as the model keeps producing.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| GatewayError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
            timeout,
        })
    }

    pub fn from_config(config: &FileProviderConfig) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!(
                "No API key found (set {} or provider.api_key); requests are sent unauthenticated",
                config.api_key_env
            );
        }
        Self::new(config.base_url.clone(), api_key, config.timeout())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

fn request_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::ConnectionError(err.to_string())
    } else {
        GatewayError::RequestFailed(err.to_string())
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn open_stream(
        &self,
        model: &Model,
        messages: &[Message],
    ) -> Result<Box<dyn UpstreamStream>, GatewayError> {
        let request = ChatCompletionRequest::streaming(model, messages);
        let mut builder = self
            .client
            .post(self.endpoint())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        debug!(model = %model, messages = messages.len(), "Opening completion stream");
        let response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| GatewayError::Timeout)?
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "{}: {}",
                status,
                error_message(&body)
            )));
        }

        Ok(Box::new(OpenAiStream::new(response.bytes_stream())))
    }
}

type SseEvents = Pin<Box<dyn Stream<Item = Result<Event, String>> + Send>>;

/// An open SSE completion stream
pub struct OpenAiStream {
    events: Option<SseEvents>,
}

impl OpenAiStream {
    pub fn new<S, E>(body: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let events = body
            .eventsource()
            .map(|event| event.map_err(|e| e.to_string()));
        Self {
            events: Some(Box::pin(events)),
        }
    }
}

#[async_trait]
impl UpstreamStream for OpenAiStream {
    async fn next_event(&mut self) -> StreamEvent {
        loop {
            let Some(events) = self.events.as_mut() else {
                return StreamEvent::Completed;
            };

            let event = match events.next().await {
                Some(Ok(sse)) if sse.data.is_empty() => continue,
                Some(Ok(sse)) => match event_from_frame(&sse.data) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => StreamEvent::Error(e),
                // Body ended without [DONE]; treat as a normal end
                None => StreamEvent::Completed,
            };

            if event.is_terminal() {
                self.close();
            }
            return event;
        }
    }

    fn close(&mut self) {
        self.events = None;
    }
}
