#![allow(dead_code)]

use async_trait::async_trait;
use menubot_conversation::Gateway;
use menubot_core::{ChatMessage, LLMProvider, LLMResponse, Role, UserId};
use menubot_dialog::{
    ButtonSpec, DialogEngine, MESSAGE_KEYS, Messenger, PROMPT_KEYS, Registry, Templates,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type ReplyFn = dyn Fn(&[ChatMessage]) -> String + Send + Sync;

/// Provider that answers through a closure and records every request.
pub struct ScriptedProvider {
    reply: Box<ReplyFn>,
    fail_next: AtomicBool,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn new(reply: impl Fn(&[ChatMessage]) -> String + Send + Sync + 'static) -> Self {
        Self {
            reply: Box::new(reply),
            fail_next: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Grades `right` as correct, everything else echoes the last user turn.
    pub fn quiz_master() -> Self {
        Self::new(|messages| {
            let last = messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map_or("", |m| m.content.as_str());
            if last == "right" {
                menubot_dialog::quiz::CORRECT_ANSWER.to_string()
            } else {
                format!("reply to: {last}")
            }
        })
    }

    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }

    pub fn last_request(&self) -> Vec<ChatMessage> {
        self.requests().pop().unwrap_or_default()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn chat(&self, messages: &[ChatMessage], _model: &str) -> anyhow::Result<LLMResponse> {
        // Yield so concurrent handlers get a chance to interleave.
        tokio::time::sleep(Duration::from_millis(5)).await;

        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(messages.to_vec());

        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("connection reset by peer");
        }

        Ok(LLMResponse {
            content: (self.reply)(messages),
            usage: None,
        })
    }

    fn get_default_model(&self) -> &'static str {
        "test-model"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    Html(String),
    Buttons { text: String, callbacks: Vec<String> },
    Image(String),
    Menu(Vec<String>),
}

/// Messenger that records what each user was sent.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(UserId, Sent)>>,
    rejected_text: Mutex<Option<String>>,
}

impl RecordingMessenger {
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn push(&self, user: UserId, sent: Sent) {
        self.sent.lock().expect("sent lock poisoned").push((user, sent));
    }

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    pub fn sent_to(&self, user: UserId) -> Vec<Sent> {
        self.sent
            .lock()
            .expect("sent lock poisoned")
            .iter()
            .filter(|(u, _)| *u == user)
            .map(|(_, s)| s.clone())
            .collect()
    }

    /// Make `send_text` fail whenever the text equals `text`.
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    pub fn reject_text(&self, text: &str) {
        *self.rejected_text.lock().expect("rejected lock poisoned") = Some(text.to_string());
    }

    pub fn last_to(&self, user: UserId) -> Option<Sent> {
        self.sent_to(user).pop()
    }

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    pub fn clear(&self) {
        self.sent.lock().expect("sent lock poisoned").clear();
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    async fn send_text(&self, user: UserId, text: &str) -> anyhow::Result<()> {
        let rejected = self.rejected_text.lock().expect("rejected lock poisoned").clone();
        if rejected.as_deref() == Some(text) {
            anyhow::bail!("Bad Request: message rejected");
        }
        self.push(user, Sent::Text(text.to_string()));
        Ok(())
    }

    async fn send_html(&self, user: UserId, text: &str) -> anyhow::Result<()> {
        self.push(user, Sent::Html(text.to_string()));
        Ok(())
    }

    async fn send_buttons(
        &self,
        user: UserId,
        text: &str,
        buttons: &[ButtonSpec],
    ) -> anyhow::Result<()> {
        self.push(
            user,
            Sent::Buttons {
                text: text.to_string(),
                callbacks: buttons.iter().map(|b| b.button.callback_data()).collect(),
            },
        );
        Ok(())
    }

    async fn send_image(&self, user: UserId, image_key: &str) -> anyhow::Result<()> {
        self.push(user, Sent::Image(image_key.to_string()));
        Ok(())
    }

    async fn set_menu(&self, user: UserId, commands: &[(&str, &str)]) -> anyhow::Result<()> {
        self.push(
            user,
            Sent::Menu(commands.iter().map(|(c, _)| (*c).to_string()).collect()),
        );
        Ok(())
    }
}

/// Templates whose text is `message:<key>` / `prompt:<key>`.
pub fn templates(registry: &Registry) -> Templates {
    let mut templates = Templates::default();
    for key in MESSAGE_KEYS {
        templates = templates.with_message(key, &format!("message:{key}"));
    }
    let persona_keys = registry.personas().iter().map(|p| p.prompt_key.clone());
    for key in PROMPT_KEYS.iter().map(ToString::to_string).chain(persona_keys) {
        templates = templates.with_prompt(&key, &format!("prompt:{key}"));
    }
    templates
}

pub struct Harness {
    pub engine: DialogEngine,
    pub provider: Arc<ScriptedProvider>,
    pub messenger: Arc<RecordingMessenger>,
}

impl Harness {
    pub fn new(provider: ScriptedProvider) -> Self {
        let provider = Arc::new(provider);
        let messenger = Arc::new(RecordingMessenger::default());
        let registry = Registry::default();
        let templates = templates(&registry);

        let engine = DialogEngine::new(
            Gateway::new(provider.clone()),
            messenger.clone(),
            Arc::new(registry),
            Arc::new(templates),
        );

        Self {
            engine,
            provider,
            messenger,
        }
    }
}
