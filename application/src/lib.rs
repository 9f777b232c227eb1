//! Application layer for chatbridge
//!
//! This crate contains the chat relay use case and the port definitions its
//! adapters implement. It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{
        ConversationEvent, ConversationEventKind, ConversationLogger, NoConversationLogger,
    },
    llm_gateway::{GatewayError, LlmGateway, UpstreamStream},
};
pub use use_cases::chat_relay::{
    ChatRelay, RelayError, RelayState, ResponseReader, ResponseStream,
};
