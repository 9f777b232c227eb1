//! Input widget: single-line text entry, disabled while a reply is in flight

use crate::tui::state::TuiState;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const PROMPT: &str = "> ";

pub struct InputWidget<'a> {
    state: &'a TuiState,
}

impl<'a> InputWidget<'a> {
    pub fn new(state: &'a TuiState) -> Self {
        Self { state }
    }
}

impl<'a> Widget for InputWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let active = self.state.input_enabled();
        let color = if active { Color::Green } else { Color::DarkGray };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Input ")
            .style(Style::default().fg(color));

        let prompt = Span::styled(
            PROMPT,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );

        let line = if active {
            active_line(&self.state.input, self.state.cursor_pos, color, prompt)
        } else {
            Line::from(vec![
                prompt,
                Span::styled(self.state.input.clone(), Style::default().fg(color)),
            ])
        };

        // Keep the cursor visible on long input
        let inner_width = area.width.saturating_sub(2) as usize;
        let cursor_col = PROMPT.len() + self.state.input[..self.state.cursor_pos].chars().count();
        let scroll_x = (cursor_col + 1).saturating_sub(inner_width);

        Paragraph::new(line)
            .block(block)
            .scroll((0, scroll_x.min(u16::MAX as usize) as u16))
            .render(area, buf);
    }
}

/// Build the input line with a block cursor
fn active_line<'a>(text: &str, cursor_pos: usize, color: Color, prompt: Span<'a>) -> Line<'a> {
    let cursor_style = Style::default().fg(Color::Black).bg(color);
    let (before, after) = text.split_at(cursor_pos.min(text.len()));

    let mut spans = vec![prompt, Span::raw(before.to_string())];
    let mut rest = after.chars();
    match rest.next() {
        // Cursor at end of line: show block cursor on space
        None => spans.push(Span::styled(" ", cursor_style)),
        Some(ch) => {
            spans.push(Span::styled(ch.to_string(), cursor_style));
            let tail = rest.as_str();
            if !tail.is_empty() {
                spans.push(Span::raw(tail.to_string()));
            }
        }
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_line_cursor_in_middle() {
        let line = active_line("abc", 1, Color::Green, Span::raw(PROMPT));
        let spans: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(spans, vec!["> ", "a", "b", "c"]);
    }

    #[test]
    fn test_active_line_cursor_at_end() {
        let line = active_line("ab", 2, Color::Green, Span::raw(PROMPT));
        let spans: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(spans, vec!["> ", "ab", " "]);
    }

    #[test]
    fn test_renders_input_text() {
        let mut state = TuiState::new("m");
        state.input = "hello".into();
        state.cursor_pos = 5;

        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        InputWidget::new(&state).render(area, &mut buf);

        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("> hello"));
        assert!(content.contains("Input"));
    }
}
