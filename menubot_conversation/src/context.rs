//! Per-user message history.
//!
//! A context is the ordered list of turns sent to the model on every
//! exchange. It has at most one system turn, and that turn is always first.

use chrono::{DateTime, Utc};

use menubot_core::{ChatMessage, Role};

/// Ordered conversation turns for one user.
///
/// History is never pruned; it only shrinks when a new system prompt is
/// installed.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    messages: Vec<ChatMessage>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Drop every turn and install `prompt` as the only system turn.
    pub fn reset_with_system_prompt(&mut self, prompt: impl Into<String>) {
        self.messages.clear();
        self.messages.push(ChatMessage::system(prompt));
        self.updated_at = Utc::now();
    }

    /// Append a user or assistant turn.
    ///
    /// System turns are only installed through
    /// [`reset_with_system_prompt`](Self::reset_with_system_prompt).
    pub(crate) fn push(&mut self, message: ChatMessage) {
        debug_assert_ne!(message.role, Role::System);
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Remove the last turn, used to roll back a failed exchange.
    pub(crate) fn pop(&mut self) -> Option<ChatMessage> {
        self.messages.pop()
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The installed system prompt, if any.
    #[must_use]
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// Content of the most recent turn with the given role.
    #[must_use]
    pub fn last_of(&self, role: Role) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_discards_previous_turns() {
        let mut context = ConversationContext::new();
        context.reset_with_system_prompt("first");
        context.push(ChatMessage::user("Hello"));
        context.push(ChatMessage::assistant("Hi there!"));
        assert_eq!(context.len(), 3);

        context.reset_with_system_prompt("second");

        assert_eq!(context.len(), 1);
        assert_eq!(context.system_prompt(), Some("second"));
    }

    #[test]
    fn last_of_finds_latest_turn() {
        let mut context = ConversationContext::new();
        context.reset_with_system_prompt("sys");
        context.push(ChatMessage::user("one"));
        context.push(ChatMessage::assistant("reply"));
        context.push(ChatMessage::user("two"));

        assert_eq!(context.last_of(Role::User), Some("two"));
        assert_eq!(context.last_of(Role::Assistant), Some("reply"));
    }

    #[test]
    fn empty_context_has_no_system_prompt() {
        let context = ConversationContext::default();
        assert!(context.is_empty());
        assert_eq!(context.system_prompt(), None);
    }
}
