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

//! Menu-driven conversation state machine.
//!
//! Inbound updates are classified into [`Event`]s, the pure [`transition`]
//! function maps (mode, event) to the next [`Mode`] plus a list of
//! [`Effect`]s, and the [`DialogEngine`] commits the mode and executes the
//! effects through a [`Messenger`] and the shared LLM gateway.

mod effect;
mod engine;
mod error;
mod event;
mod messenger;
pub mod quiz;
mod registry;
mod resources;
mod session;
mod transition;

pub use effect::Effect;
pub use engine::DialogEngine;
pub use error::{ConfigError, DialogError, Result, SessionError};
pub use event::{Button, ButtonSpec, Command, Event, Keyboard};
pub use messenger::Messenger;
pub use registry::{Persona, Registry, Topic};
pub use resources::{FsResources, MESSAGE_KEYS, PROMPT_KEYS, ResourceLoader, Templates};
pub use session::{Mode, Session, SessionHandle, SessionStore};
pub use transition::{Transition, score_keyboard, transition};
