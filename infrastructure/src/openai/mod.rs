//! OpenAI-compatible completion adapter
//!
//! Implements [`LlmGateway`](chatbridge_application::LlmGateway) over the
//! streaming `/v1/chat/completions` endpoint.

pub mod gateway;
pub mod protocol;
