//! Effects produced by state transitions

use crate::event::Keyboard;

/// I/O steps to be executed, in order, after a transition is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Install the command menu for the user's chat
    SetMenu,

    /// Send the image stored under `key`
    SendImage { key: String },

    /// Send the message template stored under `key`
    SendMessage { key: String },

    /// Send literal text
    SendText { text: String },

    /// Send text with buttons
    SendButtons(Keyboard),

    /// Replace the conversation context with the prompt template `prompt_key`
    ResetContext { prompt_key: String },

    /// Fresh context with `prompt_key`, one empty user turn, show the reply
    OneShot {
        prompt_key: String,
        keyboard: Option<Keyboard>,
    },

    /// Append `message` to the context, show the reply
    Ask {
        message: String,
        keyboard: Option<Keyboard>,
    },

    /// Like `Ask`, then grade the reply and show the score
    AskQuiz { message: String },
}

impl Effect {
    pub fn send_image(key: impl Into<String>) -> Self {
        Self::SendImage { key: key.into() }
    }

    pub fn send_message(key: impl Into<String>) -> Self {
        Self::SendMessage { key: key.into() }
    }

    pub fn send_text(text: impl Into<String>) -> Self {
        Self::SendText { text: text.into() }
    }

    pub fn reset_context(prompt_key: impl Into<String>) -> Self {
        Self::ResetContext {
            prompt_key: prompt_key.into(),
        }
    }

    /// Whether executing this effect calls the model.
    #[must_use]
    pub const fn calls_model(&self) -> bool {
        matches!(
            self,
            Self::OneShot { .. } | Self::Ask { .. } | Self::AskQuiz { .. }
        )
    }
}
