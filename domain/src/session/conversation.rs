//! Conversation transcript (the message history sent with every request)

use super::entities::Message;

/// Handle to an in-progress assistant message.
///
/// Only [`Conversation::begin_assistant_turn`] creates one. A conversation
/// never shrinks, so a handle stays valid for the life of the conversation
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnHandle(usize);

impl TurnHandle {
    /// Position of the message in the transcript
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Ordered, append-only log of role-tagged messages (Entity)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation whose first message is a system prompt
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.append_system(prompt);
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn append_system(&mut self, text: impl Into<String>) {
        self.messages.push(Message::system(text));
    }

    pub fn append_user(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    /// Append an empty assistant message and return a handle to it
    pub fn begin_assistant_turn(&mut self) -> TurnHandle {
        self.messages.push(Message::assistant(String::new()));
        TurnHandle(self.messages.len() - 1)
    }

    /// Concatenate `fragment` onto the message behind `handle`
    pub fn append_to(&mut self, handle: TurnHandle, fragment: &str) {
        if let Some(message) = self.messages.get_mut(handle.0) {
            message.content.push_str(fragment);
        }
    }

    /// Content of the message behind `handle`
    pub fn content(&self, handle: TurnHandle) -> Option<&str> {
        self.messages.get(handle.0).map(|m| m.content.as_str())
    }

    /// Flat transcript: `"<role>:\n\t<content>\n"` per message, in order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for message in &self.messages {
            out.push_str(message.role.as_str());
            out.push_str(":\n\t");
            out.push_str(&message.content);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_is_empty() {
        let conversation = Conversation::new();
        assert!(conversation.is_empty());
        assert_eq!(conversation.render(), "");
    }

    #[test]
    fn test_system_prompt_is_first_message() {
        let conversation = Conversation::with_system_prompt("be brief");
        assert_eq!(conversation.messages(), &[Message::system("be brief")]);
    }

    #[test]
    fn test_assistant_turn_starts_empty() {
        let mut conversation = Conversation::new();
        conversation.append_user("hello");
        let handle = conversation.begin_assistant_turn();

        assert_eq!(handle.index(), 1);
        assert_eq!(
            conversation.messages(),
            &[Message::user("hello"), Message::assistant("")]
        );
    }

    #[test]
    fn test_append_to_preserves_call_order() {
        let mut conversation = Conversation::new();
        conversation.append_user("hello");
        let handle = conversation.begin_assistant_turn();

        for fragment in ["Hel", "lo", "!"] {
            conversation.append_to(handle, fragment);
        }

        assert_eq!(conversation.content(handle), Some("Hello!"));
    }

    #[test]
    fn test_render_matches_transcript_format() {
        let mut conversation = Conversation::new();
        conversation.append_user("hello");
        let handle = conversation.begin_assistant_turn();
        conversation.append_to(handle, "Hello!");

        assert_eq!(
            conversation.render(),
            "user:\n\thello\nassistant:\n\tHello!\n"
        );
    }

    #[test]
    fn test_render_shows_partial_turn_and_is_idempotent() {
        let mut conversation = Conversation::new();
        conversation.append_user("hi");
        let handle = conversation.begin_assistant_turn();
        conversation.append_to(handle, "par");

        let first = conversation.render();
        let second = conversation.render();
        assert_eq!(first, second);
        assert_eq!(first, "user:\n\thi\nassistant:\n\tpar\n");
    }

    #[test]
    fn test_handle_from_other_conversation_is_ignored() {
        let mut longer = Conversation::new();
        longer.append_user("a");
        longer.append_user("b");
        let foreign = longer.begin_assistant_turn();

        let mut short = Conversation::new();
        short.append_to(foreign, "x");
        assert!(short.is_empty());
    }
}
