//! Pure state transition function
//!
//! Given the current mode and an event, decide the next mode and the effects
//! that realise it. No I/O happens here; the engine runs the effects.

use crate::effect::Effect;
use crate::error::ConfigError;
use crate::event::{Button, ButtonSpec, Command, Event, Keyboard};
use crate::quiz;
use crate::registry::{Persona, Registry, Topic};
use crate::session::Mode;

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub mode: Mode,
    /// Zero the quiz score before running effects.
    pub reset_score: bool,
    pub effects: Vec<Effect>,
}

impl Transition {
    const fn new(mode: Mode) -> Self {
        Self {
            mode,
            reset_score: false,
            effects: Vec::new(),
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    const fn resetting_score(mut self) -> Self {
        self.reset_score = true;
        self
    }
}

fn main_menu_button() -> ButtonSpec {
    ButtonSpec::new(Button::MainMenu, "Главное меню")
}

fn random_keyboard() -> Keyboard {
    Keyboard::new(
        "Хотите еще один факт?",
        vec![
            ButtonSpec::new(Button::RandomFact, "Еще рандомный факт"),
            main_menu_button(),
        ],
    )
}

fn vocab_keyboard() -> Keyboard {
    Keyboard::new(
        "Выучим ещё одно слово?",
        vec![
            ButtonSpec::new(Button::NewWord, "Еще слово"),
            main_menu_button(),
        ],
    )
}

fn persona_chat_keyboard() -> Keyboard {
    Keyboard::new(
        "Выбрать другую личность?",
        vec![
            ButtonSpec::new(Button::ChangePerson, "Выбрать другую личность"),
            main_menu_button(),
        ],
    )
}

/// Buttons shown under the score after every quiz answer.
fn quiz_buttons() -> Vec<ButtonSpec> {
    vec![
        ButtonSpec::new(Button::QuizMore, "Ещё вопрос"),
        ButtonSpec::new(Button::ChangeQuizTopic, "Сменить тему"),
        main_menu_button(),
    ]
}

/// Keyboard with the current score.
#[must_use]
pub fn score_keyboard(correct_answers: u32) -> Keyboard {
    Keyboard::new(quiz::score_text(correct_answers), quiz_buttons())
}

fn enter_main() -> Transition {
    Transition::new(Mode::Main)
        .with_effect(Effect::send_image("main"))
        .with_effect(Effect::send_message("main"))
        .with_effect(Effect::SetMenu)
}

fn enter_random() -> Transition {
    Transition::new(Mode::Random)
        .with_effect(Effect::send_image("random"))
        .with_effect(Effect::send_message("random"))
        .with_effect(Effect::OneShot {
            prompt_key: "random".to_string(),
            keyboard: Some(random_keyboard()),
        })
}

fn enter_gpt() -> Transition {
    Transition::new(Mode::GptChat)
        .with_effect(Effect::send_image("gpt"))
        .with_effect(Effect::send_message("gpt"))
        .with_effect(Effect::reset_context("gpt"))
}

fn enter_persona_select(registry: &Registry) -> Transition {
    let buttons = registry
        .personas()
        .iter()
        .map(|p| ButtonSpec::new(Button::Persona(p.id.clone()), p.display_name.clone()))
        .collect();

    Transition::new(Mode::PersonaSelect)
        .with_effect(Effect::send_image("talk"))
        .with_effect(Effect::send_message("talk"))
        .with_effect(Effect::SendButtons(Keyboard::new(
            "🔍 Выберите личность:",
            buttons,
        )))
}

fn enter_persona_chat(persona: &Persona) -> Transition {
    Transition::new(Mode::PersonaChat {
        persona: persona.id.clone(),
    })
    .with_effect(Effect::reset_context(persona.prompt_key.clone()))
    .with_effect(Effect::send_image(persona.image_key.clone()))
    .with_effect(Effect::send_text(format!(
        "Вы начали разговор с {}. Напишите что-нибудь!",
        persona.display_name
    )))
}

fn enter_quiz_select(registry: &Registry) -> Transition {
    let buttons = registry
        .topics()
        .iter()
        .map(|t| ButtonSpec::new(Button::Topic(t.id.clone()), t.display_name.clone()))
        .collect();

    Transition::new(Mode::QuizTopicSelect)
        .with_effect(Effect::send_image("quiz"))
        .with_effect(Effect::send_message("quiz"))
        .with_effect(Effect::SendButtons(Keyboard::new(
            "Выберите тему квиза:",
            buttons,
        )))
}

fn enter_quiz_chat(topic: &Topic) -> Transition {
    Transition::new(Mode::QuizChat {
        topic: topic.id.clone(),
    })
    .resetting_score()
    .with_effect(Effect::reset_context("quiz"))
    .with_effect(Effect::Ask {
        message: topic.id.clone(),
        keyboard: None,
    })
}

fn enter_vocab() -> Transition {
    Transition::new(Mode::VocabLearn)
        .with_effect(Effect::send_image("new_word"))
        .with_effect(Effect::send_message("new_word"))
        .with_effect(Effect::OneShot {
            prompt_key: "new_word".to_string(),
            keyboard: Some(vocab_keyboard()),
        })
}

fn enter(command: Command, registry: &Registry) -> Transition {
    match command {
        Command::Start => enter_main(),
        Command::Random => enter_random(),
        Command::Gpt => enter_gpt(),
        Command::Talk => enter_persona_select(registry),
        Command::Quiz => enter_quiz_select(registry),
        Command::NewWord => enter_vocab(),
    }
}

/// Free text, dispatched on the current mode.
fn on_text(mode: &Mode, text: String, registry: &Registry) -> Transition {
    match mode {
        Mode::Idle | Mode::Main => enter_main(),
        Mode::Random => enter_random(),
        Mode::VocabLearn => enter_vocab(),
        Mode::GptChat => Transition::new(mode.clone()).with_effect(Effect::Ask {
            message: text,
            keyboard: None,
        }),
        Mode::PersonaSelect => enter_persona_select(registry),
        Mode::PersonaChat { .. } => Transition::new(mode.clone()).with_effect(Effect::Ask {
            message: text,
            keyboard: Some(persona_chat_keyboard()),
        }),
        Mode::QuizTopicSelect => enter_quiz_select(registry),
        Mode::QuizChat { .. } => {
            Transition::new(mode.clone()).with_effect(Effect::AskQuiz { message: text })
        }
    }
}

fn on_button(mode: &Mode, button: Button, registry: &Registry) -> Result<Transition, ConfigError> {
    let transition = match button {
        Button::MainMenu => enter_main(),
        Button::RandomFact => enter_random(),
        Button::NewWord => enter_vocab(),
        Button::ChangePerson => enter_persona_select(registry),
        Button::ChangeQuizTopic => enter_quiz_select(registry),
        Button::Persona(id) => enter_persona_chat(registry.persona(&id)?),
        Button::Topic(id) => enter_quiz_chat(registry.topic(&id)?),
        Button::QuizMore => match mode {
            Mode::QuizChat { topic } => Transition::new(mode.clone()).with_effect(Effect::Ask {
                message: quiz::more_question_request(topic),
                keyboard: None,
            }),
            _ => enter_quiz_select(registry),
        },
        Button::Answer(text) => match mode {
            Mode::QuizChat { .. } => {
                Transition::new(mode.clone()).with_effect(Effect::AskQuiz { message: text })
            }
            _ => enter_quiz_select(registry),
        },
    };
    Ok(transition)
}

/// Pure transition function
///
/// Total over every (mode, event) pair: either a transition or a
/// `ConfigError` for ids missing from the registry. On error the caller
/// keeps the current mode.
pub fn transition(mode: &Mode, event: Event, registry: &Registry) -> Result<Transition, ConfigError> {
    match event {
        Event::Command(command) => Ok(enter(command, registry)),
        Event::Text(text) => Ok(on_text(mode, text, registry)),
        Event::Button(button) => on_button(mode, button, registry),
    }
}
