//! Inbound events: slash commands, free text and button presses.

use crate::error::ConfigError;
use std::fmt;

/// Entry commands. Each one lands in its mode from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Random,
    Gpt,
    Talk,
    Quiz,
    NewWord,
}

impl Command {
    pub const ALL: [Self; 6] = [
        Self::Start,
        Self::Random,
        Self::Gpt,
        Self::Talk,
        Self::Quiz,
        Self::NewWord,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Random => "random",
            Self::Gpt => "gpt",
            Self::Talk => "talk",
            Self::Quiz => "quiz",
            Self::NewWord => "new_word",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Start => "Главное меню",
            Self::Random => "Узнать случайный интересный факт 🧠",
            Self::Gpt => "Задать вопрос чату GPT 🤖",
            Self::Talk => "Поговорить с известной личностью 👤",
            Self::Quiz => "Поучаствовать в квизе ❓",
            Self::NewWord => "Выучить новое слово 📚",
        }
    }

    /// `(command, description)` pairs for the chat menu.
    #[must_use]
    pub fn menu() -> Vec<(&'static str, &'static str)> {
        Self::ALL
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect()
    }

    /// Parse `/name` or `/name@bot`, case-insensitively.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        let first = text.split_whitespace().next()?;
        let name = first.strip_prefix('/')?.split('@').next()?;

        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

const PERSONA_PREFIX: &str = "persona:";
const TOPIC_PREFIX: &str = "topic:";
const ANSWER_PREFIX: &str = "answer:";

/// Inline keyboard buttons, identified by their callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Button {
    MainMenu,
    RandomFact,
    ChangePerson,
    QuizMore,
    ChangeQuizTopic,
    NewWord,
    Persona(String),
    Topic(String),
    Answer(String),
}

impl Button {
    /// Parse a callback payload. Unrecognized payloads are a config error.
    pub fn parse(data: &str) -> Result<Self, ConfigError> {
        let button = match data {
            "main_menu" => Self::MainMenu,
            "random_fact" => Self::RandomFact,
            "change_person" => Self::ChangePerson,
            "quiz_more" => Self::QuizMore,
            "change_quiz_topic" => Self::ChangeQuizTopic,
            "new_word" => Self::NewWord,
            _ => {
                if let Some(id) = data.strip_prefix(PERSONA_PREFIX) {
                    Self::Persona(id.to_string())
                } else if let Some(id) = data.strip_prefix(TOPIC_PREFIX) {
                    Self::Topic(id.to_string())
                } else if let Some(text) = data.strip_prefix(ANSWER_PREFIX) {
                    Self::Answer(text.to_string())
                } else {
                    return Err(ConfigError::UnknownCallback(data.to_string()));
                }
            }
        };
        Ok(button)
    }

    #[must_use]
    pub fn callback_data(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainMenu => f.write_str("main_menu"),
            Self::RandomFact => f.write_str("random_fact"),
            Self::ChangePerson => f.write_str("change_person"),
            Self::QuizMore => f.write_str("quiz_more"),
            Self::ChangeQuizTopic => f.write_str("change_quiz_topic"),
            Self::NewWord => f.write_str("new_word"),
            Self::Persona(id) => write!(f, "{PERSONA_PREFIX}{id}"),
            Self::Topic(id) => write!(f, "{TOPIC_PREFIX}{id}"),
            Self::Answer(text) => write!(f, "{ANSWER_PREFIX}{text}"),
        }
    }
}

/// A button together with its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSpec {
    pub button: Button,
    pub label: String,
}

impl ButtonSpec {
    #[must_use]
    pub fn new(button: Button, label: impl Into<String>) -> Self {
        Self {
            button,
            label: label.into(),
        }
    }
}

/// Text shown above a set of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub text: String,
    pub buttons: Vec<ButtonSpec>,
}

impl Keyboard {
    #[must_use]
    pub fn new(text: impl Into<String>, buttons: Vec<ButtonSpec>) -> Self {
        Self {
            text: text.into(),
            buttons,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    Text(String),
    Button(Button),
}

impl Event {
    /// Classify a text message: a known slash command or free text.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Command::parse(text).map_or_else(|| Self::Text(text.to_string()), Self::Command)
    }

    pub fn from_callback(data: &str) -> Result<Self, ConfigError> {
        Button::parse(data).map(Self::Button)
    }
}
