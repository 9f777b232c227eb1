//! Presentation layer for chatbridge
//!
//! This crate contains the CLI definition, the line-oriented batch runner
//! and the interactive terminal chat.

pub mod batch;
pub mod cli;
pub mod config;
pub mod tui;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use batch::{BatchError, BatchRunner};
pub use cli::commands::Cli;
pub use config::TuiConfig;
pub use tui::TuiApp;
