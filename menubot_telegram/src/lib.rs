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

//! Telegram front-end for the dialog engine.

mod bot;
mod command;
mod error;
mod handler;
mod messenger;

pub use bot::TelegramBot;
pub use command::{bot_commands, help_text};
pub use error::{Error, Result};
pub use messenger::TelegramMessenger;
pub use teloxide::Bot;
