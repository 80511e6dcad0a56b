//! Message and prompt templates.
//!
//! Templates live on disk as `messages/<key>.txt` and `prompts/<key>.txt`
//! under one resource directory, with images at `images/<key>.jpg`. Every
//! template the state machine can reference is read once at startup.

use crate::error::ConfigError;
use crate::registry::Registry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Message templates shown on entering each mode.
pub const MESSAGE_KEYS: [&str; 6] = ["main", "random", "gpt", "talk", "quiz", "new_word"];

/// System prompts used by the modes. Persona prompts come from the registry.
pub const PROMPT_KEYS: [&str; 4] = ["random", "gpt", "quiz", "new_word"];

pub trait ResourceLoader: Send + Sync {
    fn load_message(&self, key: &str) -> Result<String, ConfigError>;
    fn load_prompt(&self, key: &str) -> Result<String, ConfigError>;
    fn image_path(&self, key: &str) -> PathBuf;
}

/// Loads resources from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsResources {
    root: PathBuf,
}

impl FsResources {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, dir: &str, key: &str) -> Result<String, ConfigError> {
        let path = self.root.join(dir).join(format!("{key}.txt"));
        std::fs::read_to_string(&path).map_err(|source| ConfigError::Resource { path, source })
    }
}

impl ResourceLoader for FsResources {
    fn load_message(&self, key: &str) -> Result<String, ConfigError> {
        self.read("messages", key)
    }

    fn load_prompt(&self, key: &str) -> Result<String, ConfigError> {
        self.read("prompts", key)
    }

    fn image_path(&self, key: &str) -> PathBuf {
        self.root.join("images").join(format!("{key}.jpg"))
    }
}

/// Preloaded templates, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Templates {
    messages: HashMap<String, String>,
    prompts: HashMap<String, String>,
}

impl Templates {
    /// Read every mode template and every persona prompt from `loader`.
    pub fn load(loader: &dyn ResourceLoader, registry: &Registry) -> Result<Self, ConfigError> {
        let mut templates = Self::default();

        for key in MESSAGE_KEYS {
            templates
                .messages
                .insert(key.to_string(), loader.load_message(key)?);
        }

        let persona_keys = registry.personas().iter().map(|p| p.prompt_key.as_str());
        for key in PROMPT_KEYS.into_iter().chain(persona_keys) {
            templates
                .prompts
                .insert(key.to_string(), loader.load_prompt(key)?);
        }

        info!(
            "Loaded {} message and {} prompt templates",
            templates.messages.len(),
            templates.prompts.len()
        );
        Ok(templates)
    }

    #[must_use]
    pub fn with_message(mut self, key: &str, text: &str) -> Self {
        self.messages.insert(key.to_string(), text.to_string());
        self
    }

    #[must_use]
    pub fn with_prompt(mut self, key: &str, text: &str) -> Self {
        self.prompts.insert(key.to_string(), text.to_string());
        self
    }

    pub fn message(&self, key: &str) -> Result<&str, ConfigError> {
        self.messages
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingTemplate {
                kind: "message",
                key: key.to_string(),
            })
    }

    pub fn prompt(&self, key: &str) -> Result<&str, ConfigError> {
        self.prompts
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingTemplate {
                kind: "prompt",
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Loader that answers every key with `<dir>:<key>`, except `missing`.
    struct EchoLoader {
        missing: &'static str,
    }

    impl ResourceLoader for EchoLoader {
        fn load_message(&self, key: &str) -> Result<String, ConfigError> {
            if key == self.missing {
                return Err(ConfigError::MissingTemplate {
                    kind: "message",
                    key: key.to_string(),
                });
            }
            Ok(format!("messages:{key}"))
        }

        fn load_prompt(&self, key: &str) -> Result<String, ConfigError> {
            if key == self.missing {
                return Err(ConfigError::MissingTemplate {
                    kind: "prompt",
                    key: key.to_string(),
                });
            }
            Ok(format!("prompts:{key}"))
        }

        fn image_path(&self, key: &str) -> PathBuf {
            PathBuf::from(key)
        }
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn loads_mode_and_persona_templates() {
        let templates = Templates::load(&EchoLoader { missing: "" }, &Registry::default())
            .expect("All templates should load");

        assert_eq!(templates.message("talk").expect("talk message"), "messages:talk");
        assert_eq!(
            templates.prompt("talk_nietzsche").expect("persona prompt"),
            "prompts:talk_nietzsche"
        );
        assert!(templates.prompt("talk").is_err());
    }

    #[test]
    fn missing_template_fails_at_load() {
        let result = Templates::load(&EchoLoader { missing: "talk_queen" }, &Registry::default());
        assert!(matches!(
            result,
            Err(ConfigError::MissingTemplate { key, .. }) if key == "talk_queen"
        ));
    }

    #[test]
    fn fs_paths_follow_layout() {
        let resources = FsResources::new("/srv/bot");
        assert_eq!(
            resources.image_path("talk_cobain"),
            PathBuf::from("/srv/bot/images/talk_cobain.jpg")
        );
        assert!(matches!(
            resources.load_message("does_not_exist"),
            Err(ConfigError::Resource { .. })
        ));
    }
}
