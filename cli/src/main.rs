//! CLI entrypoint for chatbridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use chatbridge_application::{ChatRelay, ConversationLogger};
use chatbridge_domain::Model;
use chatbridge_infrastructure::{ConfigLoader, FileConfig, JsonlConversationLogger, OpenAiGateway};
use chatbridge_presentation::{BatchRunner, Cli, TuiApp, TuiConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    if cli.show_config {
        println!("{}", ConfigLoader::describe_sources(cli.config.as_deref()));
        println!("{}", toml::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    config.validate().context("Invalid configuration")?;

    let log_guard = init_logging(&cli, &config)?;
    info!("Starting chatbridge");

    // === Dependency Injection ===
    let model = match &cli.model {
        Some(name) => name.parse::<Model>()?,
        None => config.provider.model.clone(),
    };

    let gateway = Arc::new(OpenAiGateway::from_config(&config.provider)?);
    let mut relay = ChatRelay::new(gateway, model);

    if let Some(prompt) = cli.system.as_ref().or(config.provider.system_prompt.as_ref()) {
        relay = relay.with_system_prompt(prompt.clone());
    }

    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                relay = relay.with_logger(Arc::new(logger) as Arc<dyn ConversationLogger>);
            }
            None => warn!(path = %path.display(), "Conversation log disabled"),
        }
    }

    // Interactive mode
    if cli.tui {
        let tui_config = TuiConfig {
            poll_interval: config.tui.poll_interval(),
            read_buffer_size: config.tui.read_buffer_size,
            ..TuiConfig::default()
        };
        let mut app = TuiApp::new(relay, tui_config);
        app.run().await?;
        return Ok(());
    }

    // Batch mode: Ctrl+C cancels the reply in flight
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let runner = BatchRunner::new(relay);
    let input = BufReader::new(tokio::io::stdin());
    if let Err(e) = runner.run(&cancel, input, tokio::io::stdout()).await {
        error!(error = %e, "Batch run failed");
        // exit() skips destructors; flush the log writer first
        drop(log_guard);
        std::process::exit(e.exit_code());
    }

    drop(log_guard);
    Ok(())
}

/// Initialize tracing based on verbosity level.
///
/// The terminal UI owns the screen, so in `--tui` mode logs go to a file.
fn init_logging(cli: &Cli, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    if !cli.tui {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    }

    let path = config
        .logging
        .log_file
        .clone()
        .or_else(default_log_file)
        .context("No log file location available; set logging.log_file")?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .context("logging.log_file must name a file")?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn default_log_file() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("chatbridge").join("chatbridge.log"))
}
