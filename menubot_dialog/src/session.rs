//! Per-user session state and the in-memory session store.

use chrono::{DateTime, Utc};
use menubot_conversation::ConversationContext;
use menubot_core::UserId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::quiz;

/// Conversational mode of a session.
///
/// The persona and quiz topic live inside the modes that use them, so a
/// persona is selected exactly when the mode is `PersonaChat` and a topic
/// exactly when it is `QuizChat`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    Main,
    Random,
    GptChat,
    PersonaSelect,
    PersonaChat {
        persona: String,
    },
    QuizTopicSelect,
    QuizChat {
        topic: String,
    },
    VocabLearn,
}

impl Mode {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Main => "main",
            Self::Random => "random",
            Self::GptChat => "gpt",
            Self::PersonaSelect => "talk",
            Self::PersonaChat { .. } => "talk_chat",
            Self::QuizTopicSelect => "quiz",
            Self::QuizChat { .. } => "quiz_chat",
            Self::VocabLearn => "new_word",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersonaChat { persona } => write!(f, "talk_chat({persona})"),
            Self::QuizChat { topic } => write!(f, "quiz_chat({topic})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Everything the bot remembers about one user.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: UserId,
    pub mode: Mode,
    /// Correct quiz answers since the last topic selection.
    pub correct_answers: u32,
    /// Message history sent to the model.
    pub context: ConversationContext,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            mode: Mode::Idle,
            correct_answers: 0,
            context: ConversationContext::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.updated_at = Utc::now();
    }

    #[must_use]
    pub fn selected_persona(&self) -> Option<&str> {
        match &self.mode {
            Mode::PersonaChat { persona } => Some(persona),
            _ => None,
        }
    }

    #[must_use]
    pub fn quiz_topic(&self) -> Option<&str> {
        match &self.mode {
            Mode::QuizChat { topic } => Some(topic),
            _ => None,
        }
    }

    /// Grade a quiz reply and bump the score on an exact sentinel match.
    pub fn record_quiz_reply(&mut self, reply: &str) -> bool {
        let correct = quiz::is_correct(reply);
        if correct {
            self.correct_answers += 1;
        }
        self.updated_at = Utc::now();
        correct
    }
}

/// Shared, lockable handle to one session.
///
/// Holding the lock for the whole handling of an event is what keeps a
/// user's events from interleaving.
pub type SessionHandle = Arc<Mutex<Session>>;

/// In-memory map of sessions. Lives as long as the process.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, SessionHandle>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the user's session, creating an idle one on first contact.
    pub async fn get_or_create(&self, user_id: UserId) -> SessionHandle {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(user_id)
            .or_insert_with(|| {
                info!("[{user_id}] Creating session");
                Arc::new(Mutex::new(Session::new(user_id)))
            })
            .clone()
    }

    pub async fn get(&self, user_id: UserId) -> Option<SessionHandle> {
        self.sessions.lock().await.get(&user_id).cloned()
    }

    pub async fn remove(&self, user_id: UserId) -> bool {
        self.sessions.lock().await.remove(&user_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
