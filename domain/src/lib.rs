//! Domain layer for chatbridge
//!
//! This crate contains the conversation transcript, message entities and the
//! streaming event vocabulary. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! - **Conversation**: append-only, role-tagged transcript sent as context
//!   with every completion request
//! - **Turn**: one message in the conversation, either a user submission or
//!   a (possibly still streaming) assistant reply
//! - **Fragment**: one incremental text delta delivered by the model

pub mod core;
pub mod session;

// Re-export commonly used types
pub use core::{error::DomainError, model::Model};
pub use session::{
    conversation::{Conversation, TurnHandle},
    entities::{Message, Role},
    stream::StreamEvent,
};
