//! Runs transitions against sessions and executes their effects.

use menubot_conversation::Gateway;
use menubot_core::UserId;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::effect::Effect;
use crate::error::{ConfigError, DialogError, Result};
use crate::event::{Command, Event, Keyboard};
use crate::messenger::Messenger;
use crate::registry::Registry;
use crate::resources::Templates;
use crate::session::{Session, SessionStore};
use crate::transition::{score_keyboard, transition};

fn delivered(result: anyhow::Result<()>) -> Result<()> {
    result.map_err(DialogError::Delivery)
}

/// Drives every user's conversation.
///
/// One engine serves all users. Each event locks its user's session for the
/// whole transition, so a user's events are handled one at a time and in
/// arrival order while different users proceed concurrently.
pub struct DialogEngine {
    gateway: Gateway,
    messenger: Arc<dyn Messenger>,
    registry: Arc<Registry>,
    templates: Arc<Templates>,
    sessions: SessionStore,
}

impl DialogEngine {
    #[must_use]
    pub fn new(
        gateway: Gateway,
        messenger: Arc<dyn Messenger>,
        registry: Arc<Registry>,
        templates: Arc<Templates>,
    ) -> Self {
        Self {
            gateway,
            messenger,
            registry,
            templates,
            sessions: SessionStore::new(),
        }
    }

    #[must_use]
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Copy of the user's current session, if one exists.
    pub async fn session(&self, user: UserId) -> Option<Session> {
        let handle = self.sessions.get(user).await?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    /// Handle one classified event for `user`.
    pub async fn handle(&self, user: UserId, event: Event) -> Result<()> {
        let handle = self.sessions.get_or_create(user).await;
        let mut session = handle.lock().await;
        self.apply(&mut session, event).await
    }

    /// Handle a raw button payload. Forged payloads are reported, not applied.
    pub async fn handle_callback(&self, user: UserId, data: &str) -> Result<()> {
        let handle = self.sessions.get_or_create(user).await;
        let mut session = handle.lock().await;

        match Event::from_callback(data) {
            Ok(event) => self.apply(&mut session, event).await,
            Err(e) => self.report_config_error(user, &e).await,
        }
    }

    async fn apply(&self, session: &mut Session, event: Event) -> Result<()> {
        let user = session.user_id;
        debug!("[{user}] {event:?} in mode {}", session.mode);

        let next = match transition(&session.mode, event, &self.registry) {
            Ok(next) => next,
            Err(e) => return self.report_config_error(user, &e).await,
        };

        if session.mode != next.mode {
            info!("[{user}] Mode {} -> {}", session.mode, next.mode);
        }
        session.set_mode(next.mode);
        if next.reset_score {
            session.correct_answers = 0;
        }

        match self.run_effects(session, next.effects).await {
            Err(DialogError::Gateway(e)) => {
                warn!("[{user}] Model exchange failed in mode {}: {e}", session.mode);
                delivered(
                    self.messenger
                        .send_text(user, &format!("Произошла ошибка: {e}"))
                        .await,
                )
            }
            Err(DialogError::Config(e)) => self.report_config_error(user, &e).await,
            other => other,
        }
    }

    async fn report_config_error(&self, user: UserId, error: &ConfigError) -> Result<()> {
        warn!("[{user}] {error}");
        delivered(
            self.messenger
                .send_text(user, &format!("Ошибка конфигурации: {error}"))
                .await,
        )
    }

    async fn run_effects(&self, session: &mut Session, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            self.run_effect(session, effect).await?;
        }
        Ok(())
    }

    async fn send_keyboard(&self, user: UserId, keyboard: Option<&Keyboard>) -> Result<()> {
        match keyboard {
            Some(k) => delivered(self.messenger.send_buttons(user, &k.text, &k.buttons).await),
            None => Ok(()),
        }
    }

    async fn run_effect(&self, session: &mut Session, effect: Effect) -> Result<()> {
        let user = session.user_id;
        debug!("[{user}] Running {effect:?}");

        match effect {
            Effect::SetMenu => delivered(self.messenger.set_menu(user, &Command::menu()).await),
            Effect::SendImage { key } => delivered(self.messenger.send_image(user, &key).await),
            Effect::SendMessage { key } => {
                let text = self.templates.message(&key)?;
                delivered(self.messenger.send_html(user, text).await)
            }
            Effect::SendText { text } => delivered(self.messenger.send_text(user, &text).await),
            Effect::SendButtons(keyboard) => {
                delivered(
                    self.messenger
                        .send_buttons(user, &keyboard.text, &keyboard.buttons)
                        .await,
                )
            }
            Effect::ResetContext { prompt_key } => {
                let prompt = self.templates.prompt(&prompt_key)?;
                self.gateway
                    .reset_with_system_prompt(&mut session.context, prompt);
                Ok(())
            }
            Effect::OneShot {
                prompt_key,
                keyboard,
            } => {
                let prompt = self.templates.prompt(&prompt_key)?;
                let reply = self
                    .gateway
                    .send_one_shot(&mut session.context, prompt, "")
                    .await?;
                delivered(self.messenger.send_text(user, &reply).await)?;
                self.send_keyboard(user, keyboard.as_ref()).await
            }
            Effect::Ask { message, keyboard } => {
                let reply = self.gateway.send_turn(&mut session.context, &message).await?;
                delivered(self.messenger.send_text(user, &reply).await)?;
                self.send_keyboard(user, keyboard.as_ref()).await
            }
            Effect::AskQuiz { message } => {
                let reply = self.gateway.send_turn(&mut session.context, &message).await?;

                // Grade before delivery; a failed send must not lose the point.
                let correct = session.record_quiz_reply(&reply);
                info!(
                    "[{user}] Quiz answer graded: correct={correct}, score={}",
                    session.correct_answers
                );

                delivered(self.messenger.send_text(user, &reply).await)?;
                self.send_keyboard(user, Some(&score_keyboard(session.correct_answers)))
                    .await
            }
        }
    }
}
