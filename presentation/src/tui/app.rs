//! TUI application: main loop
//!
//! Architecture:
//! ```text
//! TuiApp (select! loop)                  send task (tokio::spawn per message)
//!   ├─ crossterm EventStream               └─ relay.send(cancel, text)
//!   ├─ opened_rx (stream opened / failed)  ◄──────┘
//!   └─ tick_interval
//!        ├─ poll active reply reader (≤ read_buffer_size bytes)
//!        └─ expire flash messages
//! ```
//!
//! Opening a stream can take seconds, so `send` runs in its own task and the
//! loop keeps drawing. Once open, the reply is read in non-blocking polls on
//! each tick; end-of-data re-enables input.

use super::keys::{KeyAction, handle_key_event};
use super::render::render;
use super::state::TuiState;
use crate::config::TuiConfig;
use chatbridge_application::{ChatRelay, LlmGateway, RelayError, ResponseReader, ResponseStream};
use chatbridge_domain::{Message, Role};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::FutureExt;
use futures::stream::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

type Opened = Result<ResponseStream, RelayError>;

/// Main TUI application
pub struct TuiApp<G: LlmGateway + 'static> {
    relay: Arc<ChatRelay<G>>,
    config: TuiConfig,

    // -- Stream establishment results from send tasks --
    opened_tx: mpsc::UnboundedSender<Opened>,
    opened_rx: mpsc::UnboundedReceiver<Opened>,

    // -- Reply in flight --
    reply: Option<ResponseReader>,
    cancel: Option<CancellationToken>,
    read_buffer: Vec<u8>,
}

impl<G: LlmGateway + 'static> TuiApp<G> {
    pub fn new(relay: ChatRelay<G>, config: TuiConfig) -> Self {
        let (opened_tx, opened_rx) = mpsc::unbounded_channel();
        Self {
            relay: Arc::new(relay),
            read_buffer: vec![0; config.read_buffer_size.max(1)],
            config,
            opened_tx,
            opened_rx,
            reply: None,
            cancel: None,
        }
    }

    /// State for a fresh session, showing any system prompt
    fn initial_state(&self) -> TuiState {
        let mut state = TuiState::new(self.relay.model().to_string());
        for message in self.relay.conversation() {
            if message.role == Role::System {
                state.push_message(message);
            }
        }
        state
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Install panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(info);
        }));

        let mut state = self.initial_state();
        let mut event_stream = EventStream::new();
        let mut tick = tokio::time::interval(self.config.poll_interval);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| render(frame, &state)) {
                break Err(e);
            }

            if state.should_quit {
                break Ok(());
            }

            tokio::select! {
                // Terminal events (keyboard, resize)
                Some(Ok(term_event)) = event_stream.next() => {
                    self.handle_terminal_event(&mut state, term_event);
                }

                // Stream establishment results
                Some(opened) = self.opened_rx.recv() => {
                    self.apply_opened(&mut state, opened);
                }

                // Reply polling and flash expiry
                _ = tick.tick() => {
                    self.poll_reply(&mut state);
                    state.expire_flash(self.config.flash_duration);
                }
            }
        };

        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Handle a terminal (crossterm) event
    fn handle_terminal_event(&mut self, state: &mut TuiState, event: Event) {
        match event {
            Event::Key(key) => {
                let action = handle_key_event(key);
                self.handle_action(state, action);
            }
            // Terminal auto-resizes on next draw
            Event::Resize(_, _) => {}
            _ => {}
        }
    }

    /// Handle a semantic key action
    fn handle_action(&mut self, state: &mut TuiState, action: KeyAction) {
        match action {
            KeyAction::None => {}

            // Text editing (only between replies)
            KeyAction::InsertChar(c) if state.input_enabled() => state.insert_char(c),
            KeyAction::DeleteChar if state.input_enabled() => state.delete_char(),
            KeyAction::CursorLeft => state.cursor_left(),
            KeyAction::CursorRight => state.cursor_right(),
            KeyAction::CursorHome => state.cursor_home(),
            KeyAction::CursorEnd => state.cursor_end(),
            KeyAction::InsertChar(_) | KeyAction::DeleteChar => {}

            KeyAction::Submit => self.submit(state),

            KeyAction::Cancel => {
                if state.show_transcript {
                    state.show_transcript = false;
                } else if let Some(cancel) = &self.cancel {
                    debug!("Cancelling reply");
                    cancel.cancel();
                }
            }

            KeyAction::ToggleTranscript => {
                state.show_transcript = !state.show_transcript;
                if state.show_transcript {
                    state.transcript = self.relay.messages();
                }
            }

            KeyAction::ScrollUp => state.scroll_up(),
            KeyAction::ScrollDown => state.scroll_down(),
            KeyAction::ScrollBottom => state.scroll_to_bottom(),

            KeyAction::Quit => state.should_quit = true,
        }
    }

    /// Send the input line in the background
    fn submit(&mut self, state: &mut TuiState) {
        if !state.input_enabled() {
            state.set_flash("Wait for the current reply (Esc cancels it)");
            return;
        }
        let text = state.take_input();
        if text.trim().is_empty() {
            return;
        }

        state.push_message(Message::user(text.clone()));
        state.begin_reply();
        state.scroll_to_bottom();

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());

        let relay = Arc::clone(&self.relay);
        let opened_tx = self.opened_tx.clone();
        tokio::spawn(async move {
            let opened = relay.send(&cancel, &text).await;
            let _ = opened_tx.send(opened);
        });
    }

    /// Apply the outcome of a send task
    fn apply_opened(&mut self, state: &mut TuiState, opened: Opened) {
        match opened {
            Ok(stream) => {
                self.reply = Some(stream.into_reader());
                state.reply_started();
            }
            Err(e) => {
                warn!(error = %e, "Send failed");
                self.cancel = None;
                let message = if e.is_cancelled() {
                    "Request cancelled".to_string()
                } else {
                    e.to_string()
                };
                state.fail_reply(message);
            }
        }
        self.refresh_transcript(state);
    }

    /// Read whatever the active reply has ready, without waiting.
    fn poll_reply(&mut self, state: &mut TuiState) {
        let Some(reader) = self.reply.as_mut() else {
            return;
        };

        match reader.read(&mut self.read_buffer).now_or_never() {
            // Nothing buffered yet
            None => return,
            Some(Ok(0)) => {
                debug!("Reply finished");
                self.reply = None;
                self.cancel = None;
                state.finish_reply();
            }
            Some(Ok(n)) => state.push_reply_bytes(&self.read_buffer[..n]),
            Some(Err(e)) => {
                warn!(error = %e, "Reply failed");
                self.reply = None;
                self.cancel = None;
                let message = if e.kind() == io::ErrorKind::Interrupted {
                    "Reply cancelled".to_string()
                } else {
                    e.to_string()
                };
                state.fail_reply(message);
            }
        }
        self.refresh_transcript(state);
    }

    fn refresh_transcript(&self, state: &mut TuiState) {
        if state.show_transcript {
            state.transcript = self.relay.messages();
        }
    }
}
