//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for chatbridge
#[derive(Parser, Debug)]
#[command(name = "chatbridge")]
#[command(author, version, about = "Relay a conversation with an LLM over stdin/stdout or a terminal UI")]
#[command(long_about = r#"
chatbridge forwards what you type to an OpenAI-compatible chat completion
endpoint and streams the reply back as it is generated. Every reply becomes
part of the conversation sent with the next message.

Batch mode (default) reads one message per line from stdin and copies each
reply to stdout. Exit codes: 1 chat failure, 2 input read failure,
3 output write failure.

Configuration files are loaded from (in priority order):
1. CHATBRIDGE_* environment variables (CHATBRIDGE_PROVIDER__MODEL=gpt-4o)
2. --config <path>     Explicit config file
3. ./chatbridge.toml   Project-level config
4. ~/.config/chatbridge/config.toml   Global config

The API key is read from $OPENAI_API_KEY unless configured otherwise.

Example:
  echo "Write a haiku about rust" | chatbridge
  chatbridge --tui -m gpt-4o --system "Answer in one sentence."
"#)]
pub struct Cli {
    /// Start the interactive terminal UI
    #[arg(long)]
    pub tui: bool,

    /// Model to chat with (overrides provider.model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// System prompt placed at the start of the conversation
    #[arg(long, value_name = "PROMPT")]
    pub system: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
