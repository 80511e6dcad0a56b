#![warn(
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

//! Conversation context and the LLM gateway.
//!
//! The gateway is shared by every user and holds no history of its own.
//! Each caller owns a [`ConversationContext`] and passes it in, so two users
//! can never see each other's turns.
//!
//! # Key Features
//! - Single leading system turn, replaced wholesale on reset
//! - Multi-turn exchanges that append user and assistant turns
//! - One-shot exchanges that start from a fresh context every time

mod context;
mod gateway;

pub use context::ConversationContext;
pub use gateway::{Gateway, GatewayError};
