//! Raw transcript overlay (F2)
//!
//! Shows the relay's flat `role:\n\tcontent` projection of the conversation,
//! exactly as it would be returned to a caller.

use crate::tui::state::TuiState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

pub struct TranscriptWidget<'a> {
    state: &'a TuiState,
}

impl<'a> TranscriptWidget<'a> {
    pub fn new(state: &'a TuiState) -> Self {
        Self { state }
    }
}

impl<'a> Widget for TranscriptWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Transcript (F2/Esc to close) ")
            .style(Style::default().fg(Color::Cyan));

        // Tabs are not rendered by terminals; expand them
        let text = self.state.transcript.replace('\t', "    ");
        let body = if text.is_empty() {
            "(empty)".to_string()
        } else {
            text
        };

        Paragraph::new(body)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_transcript() {
        let mut state = TuiState::new("m");
        state.transcript = "user:\n\thello\nassistant:\n\tHi\n".into();

        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        TranscriptWidget::new(&state).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Transcript"));
        assert!(content.contains("user:"));
        assert!(content.contains("    hello"));
        assert!(content.contains("assistant:"));
    }

    #[test]
    fn test_empty_transcript_placeholder() {
        let state = TuiState::new("m");
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        TranscriptWidget::new(&state).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("(empty)"));
    }
}
