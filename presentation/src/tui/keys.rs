//! Key bindings
//!
//! Maps crossterm key events to semantic [`KeyAction`]s. There is a single
//! editing mode: typing always goes to the input line, function and control
//! keys drive the session.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// User action derived from a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    InsertChar(char),
    DeleteChar,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    /// Send the input line
    Submit,
    /// Abort the reply in flight, or close the overlay
    Cancel,
    /// Show or hide the raw transcript
    ToggleTranscript,
    ScrollUp,
    ScrollDown,
    ScrollBottom,
    Quit,
}

pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::None;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL)
        | (KeyCode::Char('d'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Enter, _) => KeyAction::Submit,
        (KeyCode::Esc, _) => KeyAction::Cancel,
        (KeyCode::F(2), _) => KeyAction::ToggleTranscript,
        (KeyCode::PageUp, _) | (KeyCode::Up, _) => KeyAction::ScrollUp,
        (KeyCode::PageDown, _) | (KeyCode::Down, _) => KeyAction::ScrollDown,
        (KeyCode::End, KeyModifiers::CONTROL) => KeyAction::ScrollBottom,
        (KeyCode::Backspace, _) => KeyAction::DeleteChar,
        (KeyCode::Left, _) => KeyAction::CursorLeft,
        (KeyCode::Right, _) => KeyAction::CursorRight,
        (KeyCode::Home, _) => KeyAction::CursorHome,
        (KeyCode::End, _) => KeyAction::CursorEnd,
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => KeyAction::InsertChar(c),
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_editing_keys() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('a'))),
            KeyAction::InsertChar('a')
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            KeyAction::InsertChar('A')
        );
        assert_eq!(handle_key_event(key(KeyCode::Backspace)), KeyAction::DeleteChar);
        assert_eq!(handle_key_event(key(KeyCode::Left)), KeyAction::CursorLeft);
        assert_eq!(handle_key_event(key(KeyCode::Right)), KeyAction::CursorRight);
        assert_eq!(handle_key_event(key(KeyCode::Home)), KeyAction::CursorHome);
        assert_eq!(handle_key_event(key(KeyCode::End)), KeyAction::CursorEnd);
    }

    #[test]
    fn test_session_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Enter)), KeyAction::Submit);
        assert_eq!(handle_key_event(key(KeyCode::Esc)), KeyAction::Cancel);
        assert_eq!(
            handle_key_event(key(KeyCode::F(2))),
            KeyAction::ToggleTranscript
        );
        assert_eq!(handle_key_event(key(KeyCode::PageUp)), KeyAction::ScrollUp);
        assert_eq!(handle_key_event(key(KeyCode::PageDown)), KeyAction::ScrollDown);
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::End, KeyModifiers::CONTROL)),
            KeyAction::ScrollBottom
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_unbound_and_release_events_are_ignored() {
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT)),
            KeyAction::None
        );
        let release = KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(handle_key_event(release), KeyAction::None);
    }
}
