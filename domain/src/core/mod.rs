//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the completion model a conversation talks to
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
