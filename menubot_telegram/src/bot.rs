use crate::Result;
use crate::command::bot_commands;
use menubot_dialog::{Command, DialogEngine};
use std::{sync::Arc, time::Duration};
use teloxide::prelude::*;
use tokio::time::sleep;
use tracing::{info, warn};

/// Telegram bot driving the dialog engine
pub struct TelegramBot {
    /// Teloxide bot instance
    pub bot: Bot,
    /// Shared dialog engine
    pub engine: Arc<DialogEngine>,
    /// Allowed chat IDs
    allowed_chats: Vec<i64>,
}

impl TelegramBot {
    /// Create a new Telegram bot. Unparseable chat ids are ignored.
    #[must_use]
    pub fn new(bot: Bot, engine: Arc<DialogEngine>, allowed_chats: &[String]) -> Self {
        let allowed_chats = allowed_chats
            .iter()
            .filter_map(|s| {
                let parsed = s.trim().parse::<i64>().ok();
                if parsed.is_none() {
                    warn!("Ignoring invalid chat id in allow list: {s}");
                }
                parsed
            })
            .collect();

        Self {
            bot,
            engine,
            allowed_chats,
        }
    }

    /// Check if a chat is allowed
    #[must_use]
    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chats.is_empty() || self.allowed_chats.contains(&chat_id)
    }

    /// Test connection to Telegram API with linear backoff retry.
    /// Starts at 2s, increases by 2s each attempt, max 10s delay.
    async fn test_connection(&self) {
        const INITIAL_DELAY_SECS: u64 = 2;
        const MAX_DELAY_SECS: u64 = 10;

        let mut attempt = 1u64;
        loop {
            match self.bot.get_me().await {
                Ok(me) => {
                    info!(
                        "Connected to Telegram API: @{} (id: {})",
                        me.user
                            .username
                            .unwrap_or_else(|| "no username".to_string()),
                        me.user.id
                    );
                    return;
                }
                Err(e) => {
                    let delay_secs = (INITIAL_DELAY_SECS * attempt).min(MAX_DELAY_SECS);
                    warn!("Connection attempt {attempt} failed: {e}. Retrying in {delay_secs}s...");

                    if attempt == 1 {
                        warn!("Check the bot token and that api.telegram.org is reachable");
                    }

                    sleep(Duration::from_secs(delay_secs)).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Run the bot until Ctrl+C
    pub async fn run(self) -> Result<()> {
        use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
        use teloxide::dptree;
        use teloxide::error_handlers::LoggingErrorHandler;
        use teloxide::types::{CallbackQuery, Message, Update};

        self.test_connection().await;

        if let Err(e) = self
            .bot
            .set_my_commands(bot_commands(&Command::menu()))
            .await
        {
            warn!("Failed to set default bot commands: {e}");
        }

        let bot = self.bot.clone();

        let schema = dptree::entry()
            .branch(Update::filter_message().endpoint({
                let this = self.clone();
                move |_bot: Bot, msg: Message| {
                    let this = this.clone();
                    async move { crate::handler::handle_message(this, msg).await }
                }
            }))
            .branch(Update::filter_callback_query().endpoint({
                let this = self.clone();
                move |_bot: Bot, query: CallbackQuery| {
                    let this = this.clone();
                    async move { crate::handler::handle_callback(this, query).await }
                }
            }));

        info!("Starting dispatcher with long polling");

        Dispatcher::builder(bot, schema)
            .error_handler(LoggingErrorHandler::with_custom_text(
                "Error in update handler",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Dispatcher stopped");
        Ok(())
    }
}

impl Clone for TelegramBot {
    fn clone(&self) -> Self {
        Self {
            bot: self.bot.clone(),
            engine: Arc::clone(&self.engine),
            allowed_chats: self.allowed_chats.clone(),
        }
    }
}
