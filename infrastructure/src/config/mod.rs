//! Configuration file loading for chatbridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `CHATBRIDGE_*`, with `__` separating nested keys
//!    (`CHATBRIDGE_PROVIDER__MODEL=gpt-4o`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./chatbridge.toml`
//! 4. Global: `$XDG_CONFIG_HOME/chatbridge/config.toml`
//!    (fallback `~/.config/chatbridge/config.toml`)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FileProviderConfig, FileTuiConfig,
};
pub use loader::ConfigLoader;
