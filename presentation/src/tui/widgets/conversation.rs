//! Conversation widget: message history + streaming reply

use crate::tui::state::{ReplyPhase, TuiState};
use chatbridge_domain::Role;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
        Role::System => "System",
    }
}

fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Cyan,
        Role::Assistant => Color::Green,
        Role::System => Color::Yellow,
    }
}

pub struct ConversationWidget<'a> {
    state: &'a TuiState,
}

impl<'a> ConversationWidget<'a> {
    pub fn new(state: &'a TuiState) -> Self {
        Self { state }
    }

    fn header(role: Role) -> Line<'static> {
        Line::from(Span::styled(
            format!("{}: ", role_label(role)),
            Style::default()
                .fg(role_color(role))
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn format_messages(&self) -> Text<'_> {
        let mut lines: Vec<Line> = Vec::new();

        for msg in &self.state.messages {
            lines.push(Self::header(msg.role));
            for content_line in msg.content.lines() {
                lines.push(Line::from(format!("  {}", content_line)));
            }
            lines.push(Line::from(""));
        }

        match self.state.phase {
            ReplyPhase::Idle => {}
            ReplyPhase::Waiting => {
                lines.push(Self::header(Role::Assistant));
                lines.push(Line::from(Span::styled(
                    "  …",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            ReplyPhase::Streaming => {
                lines.push(Self::header(Role::Assistant));
                for content_line in self.state.streaming_text.lines() {
                    lines.push(Line::from(format!("  {}", content_line)));
                }
                lines.push(Line::from(Span::styled(
                    "  ▌",
                    Style::default().fg(Color::Green),
                )));
            }
        }

        Text::from(lines)
    }
}

impl<'a> Widget for ConversationWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.format_messages();
        let visible_height = area.height.saturating_sub(2); // borders
        let content_width = area.width.saturating_sub(2); // borders

        // Count wrapped lines with the same algorithm used for rendering
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
        let total_lines = paragraph.line_count(content_width) as u16;

        // scroll_offset=0 means "show bottom"
        let scroll = if total_lines > visible_height {
            let max_scroll = total_lines - visible_height;
            let offset = (self.state.scroll_offset.min(u16::MAX as usize) as u16).min(max_scroll);
            max_scroll - offset
        } else {
            0
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.state.model_name))
            .style(Style::default().fg(Color::White));

        paragraph.block(block).scroll((scroll, 0)).render(area, buf);
    }
}
