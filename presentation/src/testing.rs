//! Scripted gateway shared by the presentation tests.

use async_trait::async_trait;
use chatbridge_application::{ChatRelay, GatewayError, LlmGateway, UpstreamStream};
use chatbridge_domain::{Message, Model, StreamEvent};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What the gateway does for one request.
pub enum Reply {
    /// Stream these fragments, then complete.
    Text(Vec<&'static str>),
    /// Stream these fragments, then fail.
    Broken(Vec<&'static str>, &'static str),
    /// Refuse the request.
    Refused(&'static str),
}

#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Reply>>,
    pub requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        })
    }
}

pub fn relay(replies: Vec<Reply>) -> (Arc<ScriptedGateway>, ChatRelay<ScriptedGateway>) {
    let gateway = ScriptedGateway::new(replies);
    let relay = ChatRelay::new(Arc::clone(&gateway), Model::default());
    (gateway, relay)
}

struct ScriptedUpstream(VecDeque<StreamEvent>);

#[async_trait]
impl UpstreamStream for ScriptedUpstream {
    async fn next_event(&mut self) -> StreamEvent {
        self.0.pop_front().unwrap_or(StreamEvent::Completed)
    }

    fn close(&mut self) {
        self.0.clear();
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn open_stream(
        &self,
        _model: &Model,
        messages: &[Message],
    ) -> Result<Box<dyn UpstreamStream>, GatewayError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Refused("no scripted reply"));

        let deltas = |fragments: Vec<&str>| -> VecDeque<StreamEvent> {
            fragments
                .into_iter()
                .map(|f| StreamEvent::Delta(f.to_string()))
                .collect()
        };

        match reply {
            Reply::Text(fragments) => {
                let mut events = deltas(fragments);
                events.push_back(StreamEvent::Completed);
                Ok(Box::new(ScriptedUpstream(events)))
            }
            Reply::Broken(fragments, error) => {
                let mut events = deltas(fragments);
                events.push_back(StreamEvent::Error(error.to_string()));
                Ok(Box::new(ScriptedUpstream(events)))
            }
            Reply::Refused(reason) => Err(GatewayError::RequestFailed(reason.to_string())),
        }
    }
}
