//! Drives the dialog engine from the terminal.
//!
//! Lines starting with `/` are commands, `#<payload>` presses the button with
//! that callback payload, anything else is free text.

use async_trait::async_trait;
use menubot_core::UserId;
use menubot_dialog::{ButtonSpec, Event, FsResources, Messenger, ResourceLoader};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use super::{CommandStrategy, init_common_components};

const CONSOLE_USER: UserId = UserId(0);

/// Prints dialog output to stdout.
struct ConsoleMessenger {
    resources: FsResources,
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send_text(&self, _user: UserId, text: &str) -> anyhow::Result<()> {
        println!("\n{text}\n");
        Ok(())
    }

    async fn send_html(&self, _user: UserId, text: &str) -> anyhow::Result<()> {
        println!("\n{text}\n");
        Ok(())
    }

    async fn send_buttons(
        &self,
        _user: UserId,
        text: &str,
        buttons: &[ButtonSpec],
    ) -> anyhow::Result<()> {
        println!("{text}");
        for spec in buttons {
            println!("  #{} - {}", spec.button.callback_data(), spec.label);
        }
        println!();
        Ok(())
    }

    async fn send_image(&self, _user: UserId, image_key: &str) -> anyhow::Result<()> {
        let path = self.resources.image_path(image_key);
        if path.exists() {
            println!("[image: {}]", path.display());
        } else {
            warn!("Image {} not found, skipping", path.display());
        }
        Ok(())
    }

    async fn set_menu(&self, _user: UserId, commands: &[(&str, &str)]) -> anyhow::Result<()> {
        let names: Vec<String> = commands.iter().map(|(c, _)| format!("/{c}")).collect();
        println!("Menu: {}\n", names.join(" "));
        Ok(())
    }
}

/// Input parameters for the console command.
#[derive(Debug, Clone)]
pub struct ConsoleInput {
    /// Optional config file path
    pub config: Option<PathBuf>,
}

/// Strategy for chatting with the bot over stdin/stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleStrategy;

impl CommandStrategy for ConsoleStrategy {
    type Input = ConsoleInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components(input.config.as_deref())?;
        let messenger = Arc::new(ConsoleMessenger {
            resources: common.resources.clone(),
        });
        let engine = common.into_engine(messenger);

        println!("=== menubot console ===");
        println!("Commands start with '/', '#<payload>' presses a button, 'exit' quits.\n");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();

            if matches!(line, "exit" | "quit") {
                break;
            }
            if line.is_empty() {
                continue;
            }

            let result = match line.strip_prefix('#') {
                Some(payload) => engine.handle_callback(CONSOLE_USER, payload).await,
                None => engine.handle(CONSOLE_USER, Event::from_text(line)).await,
            };
            if let Err(e) = result {
                eprintln!("Error: {e}");
            }
        }

        if let Some(session) = engine.session(CONSOLE_USER).await {
            info!(
                "Console session ended in mode {} with {} correct answers",
                session.mode, session.correct_answers
            );
        }
        Ok(())
    }
}
