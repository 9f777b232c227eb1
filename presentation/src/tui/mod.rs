//! Interactive terminal chat
//!
//! A single conversation pane above a one-line input. Replies stream into the
//! pane as they arrive; input stays disabled until the reply finishes.

mod app;
mod keys;
mod render;
mod state;
mod widgets;

pub use app::TuiApp;
pub use state::{ReplyPhase, TuiState};
