//! Read-only persona and quiz topic registries.

use crate::error::ConfigError;
use menubot_config::{PersonaConfig, TopicConfig};

/// A character the user can talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub id: String,
    pub display_name: String,
    /// Key of the system prompt template, `talk_<id>`.
    pub prompt_key: String,
    /// Key of the introduction image, same as the prompt key.
    pub image_key: String,
}

impl Persona {
    #[must_use]
    pub fn new(id: &str, display_name: &str) -> Self {
        let key = format!("talk_{}", id.to_lowercase().replace(' ', "_"));
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            prompt_key: key.clone(),
            image_key: key,
        }
    }
}

/// A quiz subject area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: String,
    pub display_name: String,
}

/// Personas and topics in display order.
#[derive(Debug, Clone)]
pub struct Registry {
    personas: Vec<Persona>,
    topics: Vec<Topic>,
}

impl Registry {
    #[must_use]
    pub fn from_config(personas: &[PersonaConfig], topics: &[TopicConfig]) -> Self {
        Self {
            personas: personas
                .iter()
                .map(|p| Persona::new(&p.id, &p.display_name))
                .collect(),
            topics: topics
                .iter()
                .map(|t| Topic {
                    id: t.id.clone(),
                    display_name: t.display_name.clone(),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn persona(&self, id: &str) -> Result<&Persona, ConfigError> {
        self.personas
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ConfigError::UnknownPersona(id.to_string()))
    }

    pub fn topic(&self, id: &str) -> Result<&Topic, ConfigError> {
        self.topics
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ConfigError::UnknownTopic(id.to_string()))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::from_config(&PersonaConfig::defaults(), &TopicConfig::defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_keys_are_lowercased() {
        let persona = Persona::new("Hawking", "Стивен Хокинг");
        assert_eq!(persona.prompt_key, "talk_hawking");
        assert_eq!(persona.image_key, "talk_hawking");

        let spaced = Persona::new("Mark Twain", "Марк Твен");
        assert_eq!(spaced.prompt_key, "talk_mark_twain");
    }

    #[test]
    fn lookups_reject_unknown_ids() {
        let registry = Registry::default();

        assert!(registry.persona("Tolkien").is_ok());
        assert!(matches!(
            registry.persona("Einstein"),
            Err(ConfigError::UnknownPersona(id)) if id == "Einstein"
        ));
        assert!(registry.topic("quiz_math").is_ok());
        assert!(matches!(
            registry.topic("unknown"),
            Err(ConfigError::UnknownTopic(_))
        ));
    }

    #[test]
    fn default_order_matches_config() {
        let registry = Registry::default();
        let ids: Vec<&str> = registry.topics().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["quiz_prog", "quiz_math", "quiz_biology"]);
        assert_eq!(registry.personas().len(), 5);
    }
}
