//! Status bar widget: reply phase + key hints + flash messages

use crate::tui::state::{ReplyPhase, TuiState};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub struct StatusBarWidget<'a> {
    state: &'a TuiState,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(state: &'a TuiState) -> Self {
        Self { state }
    }

    fn hints(&self) -> &'static str {
        match self.state.phase {
            ReplyPhase::Idle => "Enter:send  F2:transcript  PgUp/PgDn:scroll  Ctrl+C:quit",
            ReplyPhase::Waiting | ReplyPhase::Streaming => {
                "Esc:cancel  F2:transcript  PgUp/PgDn:scroll  Ctrl+C:quit"
            }
        }
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(bg_style).set_char(' ');
        }

        let phase = self.state.phase;
        let phase_text = phase.indicator();
        let phase_span = Span::styled(
            format!(" {} ", phase_text),
            Style::default()
                .fg(Color::Black)
                .bg(phase.color())
                .add_modifier(Modifier::BOLD),
        );

        // Flash message or key hints on the right
        let (right_text, right_style) = match &self.state.flash_message {
            Some((flash, _)) => (
                flash.clone(),
                Style::default().fg(Color::Yellow).bg(Color::DarkGray),
            ),
            None => (
                self.hints().to_string(),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ),
        };

        let phase_width = phase_text.len() as u16 + 2; // padding
        buf.set_line(area.x, area.y, &Line::from(phase_span), phase_width);

        // Right-aligned, truncated from the left edge of the free space
        let free = area.width.saturating_sub(phase_width + 2);
        let right_width = (right_text.chars().count() as u16).min(free);
        let right_x = area.right().saturating_sub(right_width + 1);
        buf.set_line(
            right_x,
            area.y,
            &Line::from(Span::styled(right_text, right_style)),
            right_width,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(state: &TuiState) -> String {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new(state).render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_shows_phase_and_hints() {
        let mut state = TuiState::new("m");
        let content = render_to_string(&state);
        assert!(content.contains("READY"));
        assert!(content.contains("Enter:send"));

        state.begin_reply();
        let content = render_to_string(&state);
        assert!(content.contains("WAITING"));
        assert!(content.contains("Esc:cancel"));
    }

    #[test]
    fn test_flash_replaces_hints() {
        let mut state = TuiState::new("m");
        state.set_flash("Request failed: 401");
        let content = render_to_string(&state);
        assert!(content.contains("Request failed: 401"));
        assert!(!content.contains("Enter:send"));
    }
}
