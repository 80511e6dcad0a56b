use crate::command::{CommandStrategy, init_common_components};
use menubot_telegram::{Bot, TelegramBot, TelegramMessenger};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Input for Telegram bot command.
pub struct TelegramInput {
    /// Optional bot token (overrides config)
    pub token: Option<String>,
    /// Optional allowed chat IDs (overrides config)
    pub allow_from: Option<Vec<String>>,
    /// Optional config file path
    pub config: Option<PathBuf>,
}

/// Strategy for running Telegram bot.
pub struct TelegramStrategy;

impl CommandStrategy for TelegramStrategy {
    type Input = TelegramInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components(input.config.as_deref())?;

        let token = if let Some(t) = input.token {
            t
        } else if !common.config.telegram.token.is_empty() {
            common.config.telegram.token.clone()
        } else {
            anyhow::bail!("Telegram bot token not configured. Set \"telegram.token\" in config");
        };

        let allow_from = input
            .allow_from
            .unwrap_or_else(|| common.config.telegram.allow_from.clone());
        if allow_from.is_empty() {
            info!("No chat allow list configured, accepting every chat");
        }

        info!("Starting Telegram bot...");

        let bot = Bot::new(token);
        let messenger = Arc::new(TelegramMessenger::new(bot.clone(), common.resources.clone()));
        let engine = Arc::new(common.into_engine(messenger));

        let bot = TelegramBot::new(bot, engine, &allow_from);

        info!("Telegram bot is running. Press Ctrl+C to stop.");
        bot.run().await?;

        Ok(())
    }
}
