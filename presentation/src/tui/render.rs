//! TUI rendering: draws the main layout and the transcript overlay.

use super::state::TuiState;
use super::widgets::{
    MainLayout, conversation::ConversationWidget, input::InputWidget,
    status_bar::StatusBarWidget, transcript::TranscriptWidget,
};

/// Draw one frame from the current state.
pub(super) fn render(frame: &mut ratatui::Frame, state: &TuiState) {
    let layout = MainLayout::compute(frame.area());

    frame.render_widget(ConversationWidget::new(state), layout.conversation);
    frame.render_widget(InputWidget::new(state), layout.input);
    frame.render_widget(StatusBarWidget::new(state), layout.status_bar);

    if state.show_transcript {
        let area = MainLayout::centered_overlay(80, 80, frame.area());
        frame.render_widget(TranscriptWidget::new(state), area);
    }
}
