//! TUI application state
//!
//! Single source of truth for everything the TUI renders.
//! Updated by the TuiApp select! loop from key events and reply polls.

use chatbridge_domain::Message;
use std::time::{Duration, Instant};

/// Where the current reply is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyPhase {
    /// Input enabled, no reply in flight
    #[default]
    Idle,
    /// Request sent, stream not open yet
    Waiting,
    /// Stream open, fragments arriving
    Streaming,
}

impl ReplyPhase {
    /// Get the indicator string for the status line
    pub fn indicator(&self) -> &'static str {
        match self {
            Self::Idle => "READY",
            Self::Waiting => "WAITING",
            Self::Streaming => "STREAMING",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            Self::Idle => Color::Green,
            Self::Waiting => Color::Yellow,
            Self::Streaming => Color::Cyan,
        }
    }
}

/// Central TUI state, owned by the TuiApp select! loop
#[derive(Default)]
pub struct TuiState {
    // -- Input --
    pub input: String,
    pub cursor_pos: usize,

    // -- Conversation view --
    pub messages: Vec<Message>,
    pub streaming_text: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending_bytes: Vec<u8>,
    pub phase: ReplyPhase,
    pub scroll_offset: usize,
    pub auto_scroll: bool,

    // -- Overlay --
    pub show_transcript: bool,
    pub transcript: String,
    pub flash_message: Option<(String, Instant)>,

    // -- Display --
    pub model_name: String,

    // -- Lifecycle --
    pub should_quit: bool,
}

impl TuiState {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            auto_scroll: true,
            ..Default::default()
        }
    }

    /// Input is accepted only between replies
    pub fn input_enabled(&self) -> bool {
        self.phase == ReplyPhase::Idle
    }

    // -- Input editing --

    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    pub fn delete_char(&mut self) {
        if let Some(prev) = self.input[..self.cursor_pos].chars().next_back() {
            self.cursor_pos -= prev.len_utf8();
            self.input.remove(self.cursor_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor_pos].chars().next_back() {
            self.cursor_pos -= prev.len_utf8();
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(next) = self.input[self.cursor_pos..].chars().next() {
            self.cursor_pos += next.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_pos = self.input.len();
    }

    /// Take the current input buffer contents and clear it
    pub fn take_input(&mut self) -> String {
        self.cursor_pos = 0;
        std::mem::take(&mut self.input)
    }

    // -- Messages --

    pub fn push_message(&mut self, msg: Message) {
        self.messages.push(msg);
        if self.auto_scroll {
            self.scroll_offset = 0;
        }
    }

    // -- Reply lifecycle --

    /// A message was submitted; wait for the stream to open
    pub fn begin_reply(&mut self) {
        self.phase = ReplyPhase::Waiting;
        self.streaming_text.clear();
        self.pending_bytes.clear();
    }

    pub fn reply_started(&mut self) {
        self.phase = ReplyPhase::Streaming;
    }

    /// Append raw reply bytes, decoding only complete characters.
    pub fn push_reply_bytes(&mut self, bytes: &[u8]) {
        self.pending_bytes.extend_from_slice(bytes);
        loop {
            match std::str::from_utf8(&self.pending_bytes) {
                Ok(text) => {
                    self.streaming_text.push_str(text);
                    self.pending_bytes.clear();
                    return;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    self.streaming_text
                        .push_str(&String::from_utf8_lossy(&self.pending_bytes[..valid]));
                    match e.error_len() {
                        // Incomplete sequence at the end, wait for more
                        None => {
                            self.pending_bytes.drain(..valid);
                            return;
                        }
                        Some(bad) => {
                            self.streaming_text.push(char::REPLACEMENT_CHARACTER);
                            self.pending_bytes.drain(..valid + bad);
                        }
                    }
                }
            }
        }
    }

    /// Move the streamed text into the conversation and re-enable input
    pub fn finish_reply(&mut self) {
        if !self.pending_bytes.is_empty() {
            let tail = std::mem::take(&mut self.pending_bytes);
            self.streaming_text.push_str(&String::from_utf8_lossy(&tail));
        }
        if self.phase == ReplyPhase::Streaming || !self.streaming_text.is_empty() {
            let text = std::mem::take(&mut self.streaming_text);
            self.push_message(Message::assistant(text));
        }
        self.phase = ReplyPhase::Idle;
    }

    /// End the reply with an error, keeping whatever text already arrived
    pub fn fail_reply(&mut self, error: impl Into<String>) {
        if self.streaming_text.is_empty() && self.pending_bytes.is_empty() {
            self.phase = ReplyPhase::Idle;
        } else {
            self.finish_reply();
        }
        self.set_flash(error);
    }

    // -- Scrolling --

    pub fn scroll_up(&mut self) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset > 0 {
            self.scroll_offset -= 1;
        } else {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
        self.auto_scroll = true;
    }

    // -- Flash messages --

    pub fn set_flash(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), Instant::now()));
    }

    /// Clear flash if older than the given duration
    pub fn expire_flash(&mut self, max_age: Duration) {
        if let Some((_, created)) = &self.flash_message
            && created.elapsed() > max_age
        {
            self.flash_message = None;
        }
    }
}
