use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_DIR_NAME: &str = "menubot";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub resources: ResourcesConfig,
    #[serde(default = "PersonaConfig::defaults")]
    pub personas: Vec<PersonaConfig>,
    #[serde(default = "TopicConfig::defaults")]
    pub topics: Vec<TopicConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: String,
    /// Chat ids allowed to talk to the bot. Empty means everyone.
    #[serde(default)]
    pub allow_from: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub openai: ProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    #[serde(default = "ModelConfig::default_name")]
    pub name: String,
    #[serde(default = "ModelConfig::default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "ModelConfig::default_temperature")]
    pub temperature: f32,
    /// Seconds to wait before each retry of a failed completion request.
    #[serde(default = "ModelConfig::default_retry_delays")]
    pub retry_delays: Vec<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            max_tokens: Self::default_max_tokens(),
            temperature: Self::default_temperature(),
            retry_delays: Self::default_retry_delays(),
        }
    }
}

impl ModelConfig {
    fn default_name() -> String {
        "gpt-3.5-turbo".to_string()
    }

    const fn default_max_tokens() -> u32 {
        3000
    }

    const fn default_temperature() -> f32 {
        0.9
    }

    fn default_retry_delays() -> Vec<u64> {
        vec![2, 4]
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResourcesConfig {
    /// Directory holding `messages/`, `prompts/` and `images/`.
    #[serde(default = "ResourcesConfig::default_dir")]
    pub dir: PathBuf,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
        }
    }
}

impl ResourcesConfig {
    fn default_dir() -> PathBuf {
        PathBuf::from("resources")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PersonaConfig {
    pub id: String,
    pub display_name: String,
}

impl PersonaConfig {
    fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Cobain", "Курт Кобейн"),
            Self::new("Hawking", "Стивен Хокинг"),
            Self::new("Nietzsche", "Фридрих Ницше"),
            Self::new("Queen", "Елизавета II"),
            Self::new("Tolkien", "Джон Толкиен"),
        ]
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TopicConfig {
    pub id: String,
    pub display_name: String,
}

impl TopicConfig {
    fn new(id: &str, display_name: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
        }
    }

    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("quiz_prog", "Программирование (Python)"),
            Self::new("quiz_math", "Математика"),
            Self::new("quiz_biology", "Биология"),
        ]
    }
}

const CONFIG_TEMPLATE: &str = r#"{
  "telegram": {
    "token": "your-telegram-bot-token-here",
    "allow_from": []
  },
  "providers": {
    "openai": {
      "api_key": "your-openai-api-key-here"
    }
  },
  "model": {
    "name": "gpt-3.5-turbo",
    "max_tokens": 3000,
    "temperature": 0.9,
    "retry_delays": [2, 4]
  },
  "resources": {
    "dir": "resources"
  }
}"#;

impl Config {
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join(CONFIG_DIR_NAME))
    }

    pub fn default_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'menubot init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(config_path)?;
        let config = Self::from_json(&content)?;
        info!("Loaded config from {}", config_path.display());

        Ok(config)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, CONFIG_TEMPLATE)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Put your Telegram bot token into telegram.token");
        println!("   2. Put your OpenAI API key into providers.openai.api_key");
        println!("   3. Point resources.dir at the folder with messages/, prompts/ and images/");
        println!("   4. Run 'menubot run' to start the bot, or 'menubot console' to try it locally");
        println!();
        println!("🔧 Optional settings:");
        println!("   - providers.openai.base_url: any OpenAI-compatible endpoint");
        println!("   - providers.openai.proxy: HTTP proxy for provider requests");
        println!("   - personas / topics: override the persona and quiz topic lists");
        println!();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn template_parses_with_defaults() {
        let config = Config::from_json(CONFIG_TEMPLATE).expect("Template should be valid");

        assert_eq!(config.model.name, "gpt-3.5-turbo");
        assert_eq!(config.resources.dir, PathBuf::from("resources"));
        assert_eq!(config.personas.len(), 5);
        assert_eq!(config.topics, TopicConfig::defaults());
        assert!(config.telegram.allow_from.is_empty());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn minimal_config_fills_defaults() {
        let config = Config::from_json(r#"{"providers": {"openai": {"api_key": "k"}}}"#)
            .expect("Minimal config should parse");

        assert!(config.telegram.token.is_empty());
        assert_eq!(config.model.max_tokens, 3000);
        assert_eq!(config.model.retry_delays, vec![2, 4]);
        assert!(config.providers.openai.proxy.is_none());
        assert_eq!(config.personas[1].id, "Hawking");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn registries_can_be_overridden() {
        let config = Config::from_json(
            r#"{
                "providers": {"openai": {"api_key": "k"}},
                "topics": [{"id": "quiz_history", "display_name": "История"}]
            }"#,
        )
        .expect("Config with topics should parse");

        assert_eq!(config.topics.len(), 1);
        assert_eq!(config.topics[0].id, "quiz_history");
        assert_eq!(config.personas, PersonaConfig::defaults());
    }

    #[test]
    fn missing_api_key_is_rejected() {
        assert!(Config::from_json(r#"{"providers": {"openai": {}}}"#).is_err());
    }
}
