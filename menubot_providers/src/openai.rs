use async_trait::async_trait;
use menubot_core::{ChatMessage, LLMProvider, LLMResponse, Usage};
use reqwest::{Client, Proxy};
use serde_json::json;
use tracing::info;

use crate::retry::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const OBFUSCATED_KEY_PREFIX: &str = "gpt:";

/// Expand an obfuscated `gpt:` key into a real project key.
///
/// Keys stored as `gpt:<reversed tail>` become `sk-proj-<tail>`; any other
/// value is returned unchanged.
#[must_use]
pub fn decode_api_key(token: &str) -> String {
    token.strip_prefix(OBFUSCATED_KEY_PREFIX).map_or_else(
        || token.to_string(),
        |reversed| format!("sk-proj-{}", reversed.chars().rev().collect::<String>()),
    )
}

/// Chat-completions client for OpenAI and API-compatible backends.
#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    max_tokens: u32,
    temperature: f32,
    retry_delays: Vec<u64>,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, proxy: Option<&str>) -> anyhow::Result<Self> {
        info!("Creating OpenAIProvider");
        let mut builder = Client::builder();
        if let Some(proxy) = proxy {
            info!("Routing provider traffic through proxy {proxy}");
            builder = builder.proxy(Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
            api_key: decode_api_key(api_key),
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: "gpt-3.5-turbo".to_string(),
            max_tokens: 3000,
            temperature: 0.9,
            retry_delays: vec![2, 4],
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.default_model = model;
        self
    }

    #[must_use]
    pub const fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_retry_delays(mut self, delays_secs: Vec<u64>) -> Self {
        self.retry_delays = delays_secs;
        self
    }

    fn build_request(&self, messages: &[ChatMessage], model: &str) -> serde_json::Value {
        json!({
            "model": model,
            "messages": messages,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        })
    }

    /// Helper method to send a single request
    async fn try_send(&self, request: &serde_json::Value) -> anyhow::Result<LLMResponse> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        parse_response(&response)
    }
}

fn parse_response(response: &serde_json::Value) -> anyhow::Result<LLMResponse> {
    let content = response["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?
        .to_string();

    let token_count = |u: &serde_json::Map<String, serde_json::Value>, key: &str| {
        u32::try_from(u.get(key).and_then(serde_json::Value::as_u64).unwrap_or(0)).unwrap_or(0)
    };
    let usage = response["usage"].as_object().map(|u| Usage {
        prompt_tokens: token_count(u, "prompt_tokens"),
        completion_tokens: token_count(u, "completion_tokens"),
        total_tokens: token_count(u, "total_tokens"),
    });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(&self, messages: &[ChatMessage], model: &str) -> anyhow::Result<LLMResponse> {
        let request = self.build_request(messages, model);

        info!(
            "Sending request to chat completions API: model={model}, messages={}",
            messages.len()
        );

        let response =
            retry_with_backoff(|| self.try_send(&request), &self.retry_delays).await?;

        info!("Received response from chat completions API");
        Ok(response)
    }

    fn get_default_model(&self) -> &str {
        &self.default_model
    }
}
