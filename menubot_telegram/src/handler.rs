use crate::{Error, Result, TelegramBot};
use menubot_core::UserId;
use menubot_dialog::Event;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatAction, Message};
use tracing::{debug, info};

/// Handle any message (commands or free text)
pub async fn handle_message(bot: TelegramBot, msg: Message) -> Result<()> {
    let chat_id = msg.chat.id;
    let Some(text) = msg.text() else {
        debug!("Ignoring non-text message in chat {chat_id}");
        return Ok(());
    };
    let username = msg
        .from
        .as_ref()
        .and_then(|u| u.username.as_deref())
        .unwrap_or("unknown");

    if !bot.is_allowed(chat_id.0) {
        return Err(Error::Unauthorized(chat_id.0));
    }

    let event = Event::from_text(text);
    match &event {
        Event::Command(command) => info!("[@{username}] Command: /{}", command.name()),
        _ => info!("[@{username}] Message: {text}"),
    }

    // Show typing indicator
    bot.bot.send_chat_action(chat_id, ChatAction::Typing).await?;

    bot.engine.handle(UserId(chat_id.0), event).await?;

    Ok(())
}

/// Handle an inline keyboard button press
pub async fn handle_callback(bot: TelegramBot, query: CallbackQuery) -> Result<()> {
    bot.bot.answer_callback_query(query.id.clone()).await?;

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };
    let chat_id = query
        .message
        .as_ref()
        .map_or_else(|| ChatId::from(query.from.id), |m| m.chat().id);
    let username = query.from.username.as_deref().unwrap_or("unknown");

    if !bot.is_allowed(chat_id.0) {
        return Err(Error::Unauthorized(chat_id.0));
    }

    info!("[@{username}] Button: {data}");

    bot.bot.send_chat_action(chat_id, ChatAction::Typing).await?;

    bot.engine.handle_callback(UserId(chat_id.0), data).await?;

    Ok(())
}
