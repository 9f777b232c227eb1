//! LLM Session domain.
//!
//! - [`entities::Message`]: a single message within a conversation
//! - [`conversation::Conversation`]: the ordered transcript of a chat
//! - [`stream::StreamEvent`]: one item of a streamed completion

pub mod conversation;
pub mod entities;
pub mod stream;
