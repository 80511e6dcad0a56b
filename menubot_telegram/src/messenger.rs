use async_trait::async_trait;
use menubot_core::UserId;
use menubot_dialog::{ButtonSpec, FsResources, Messenger, ResourceLoader};
use teloxide::prelude::*;
use teloxide::types::{
    BotCommandScope, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MenuButton, ParseMode,
    Recipient,
};
use tracing::{debug, warn};

use crate::command::bot_commands;

/// Telegram rejects longer messages.
const MAX_MESSAGE_CHARS: usize = 4096;

const fn chat(user: UserId) -> ChatId {
    ChatId(user.0)
}

/// Split `text` into chunks of at most `MAX_MESSAGE_CHARS` characters,
/// breaking at the last newline inside the limit when there is one.
fn split_message(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        let limit = remaining
            .char_indices()
            .nth(MAX_MESSAGE_CHARS)
            .map_or(remaining.len(), |(i, _)| i);
        let end = if limit == remaining.len() {
            limit
        } else {
            match remaining[..limit].rfind('\n') {
                Some(i) if i > 0 => i,
                _ => limit,
            }
        };

        chunks.push(&remaining[..end]);
        remaining = &remaining[end..];
        remaining = remaining.strip_prefix('\n').unwrap_or(remaining);
    }
    chunks
}

/// One button per row, in the given order.
fn keyboard(buttons: &[ButtonSpec]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(buttons.iter().map(|spec| {
        vec![InlineKeyboardButton::callback(
            spec.label.clone(),
            spec.button.callback_data(),
        )]
    }))
}

/// Sends dialog output to Telegram chats.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
    resources: FsResources,
}

impl TelegramMessenger {
    #[must_use]
    pub const fn new(bot: Bot, resources: FsResources) -> Self {
        Self { bot, resources }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, user: UserId, text: &str) -> anyhow::Result<()> {
        let chunks = split_message(text);
        if chunks.len() > 1 {
            debug!(
                "[{user}] Splitting {} chars into {} messages",
                text.chars().count(),
                chunks.len()
            );
        }
        for chunk in chunks {
            self.bot.send_message(chat(user), chunk).await?;
        }
        Ok(())
    }

    async fn send_html(&self, user: UserId, text: &str) -> anyhow::Result<()> {
        self.bot
            .send_message(chat(user), text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn send_buttons(
        &self,
        user: UserId,
        text: &str,
        buttons: &[ButtonSpec],
    ) -> anyhow::Result<()> {
        self.bot
            .send_message(chat(user), text)
            .reply_markup(keyboard(buttons))
            .await?;
        Ok(())
    }

    async fn send_image(&self, user: UserId, image_key: &str) -> anyhow::Result<()> {
        let path = self.resources.image_path(image_key);
        if !path.exists() {
            warn!("[{user}] Image {} not found, skipping", path.display());
            return Ok(());
        }

        debug!("[{user}] Sending image {}", path.display());
        self.bot.send_photo(chat(user), InputFile::file(path)).await?;
        Ok(())
    }

    async fn set_menu(&self, user: UserId, commands: &[(&str, &str)]) -> anyhow::Result<()> {
        self.bot
            .set_my_commands(bot_commands(commands))
            .scope(BotCommandScope::Chat {
                chat_id: Recipient::Id(chat(user)),
            })
            .await?;
        self.bot
            .set_chat_menu_button()
            .chat_id(chat(user))
            .menu_button(MenuButton::Commands)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menubot_dialog::Button;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn keyboard_puts_each_button_on_its_own_row() {
        let markup = keyboard(&[
            ButtonSpec::new(Button::QuizMore, "Ещё вопрос"),
            ButtonSpec::new(Button::Topic("quiz_math".to_string()), "Математика"),
        ]);

        assert_eq!(markup.inline_keyboard.len(), 2);
        assert!(markup.inline_keyboard.iter().all(|row| row.len() == 1));

        let second = &markup.inline_keyboard[1][0];
        assert_eq!(second.text, "Математика");
        assert!(matches!(
            &second.kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "topic:quiz_math"
        ));
    }

    #[test]
    fn short_text_is_one_message() {
        assert_eq!(split_message("Правильно!"), vec!["Правильно!"]);
        assert!(split_message("").is_empty());
    }

    #[test]
    fn long_reply_breaks_at_last_newline_within_limit() {
        let first = "ф".repeat(3000);
        let second = "я".repeat(2000);
        let text = format!("{first}\n{second}");

        let chunks = split_message(&text);

        assert_eq!(chunks, vec![first.as_str(), second.as_str()]);
    }

    #[test]
    fn text_without_newlines_is_cut_on_char_boundaries() {
        let text = "ж".repeat(MAX_MESSAGE_CHARS * 2 + 10);

        let chunks = split_message(&text);

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= MAX_MESSAGE_CHARS));
        assert_eq!(chunks[2].chars().count(), 10);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn user_id_is_the_chat_id() {
        assert_eq!(chat(UserId(-100_123)), ChatId(-100_123));
    }
}
