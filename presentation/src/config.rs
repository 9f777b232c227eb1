//! Presentation-level configuration

use std::time::Duration;

/// Interactive mode settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuiConfig {
    /// How often the active reply is polled
    pub poll_interval: Duration,
    /// Maximum bytes taken from the reply per poll
    pub read_buffer_size: usize,
    /// How long a flash message stays in the status bar
    pub flash_duration: Duration,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            read_buffer_size: 1024,
            flash_duration: Duration::from_secs(5),
        }
    }
}
