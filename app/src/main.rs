#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    CommandStrategy, ConsoleInput, ConsoleStrategy, InitStrategy, TelegramInput, TelegramStrategy,
    VersionStrategy,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "menubot")]
#[command(about = "Menu-driven Telegram bot backed by an OpenAI-compatible model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Telegram bot
    Run {
        /// Bot token (overrides config)
        #[arg(short, long)]
        token: Option<String>,

        /// Allowed chat IDs (overrides config)
        #[arg(short, long, num_args = 1..)]
        allow_from: Option<Vec<String>>,

        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Talk to the bot from the terminal
    Console {
        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            token,
            allow_from,
            config,
        } => {
            TelegramStrategy
                .execute(TelegramInput {
                    token,
                    allow_from,
                    config,
                })
                .await
        }
        Commands::Console { config } => ConsoleStrategy.execute(ConsoleInput { config }).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
