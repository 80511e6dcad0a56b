//! The LLM gateway.
//!
//! `Gateway` is the single entry point for model exchanges. It wraps a
//! provider and a model name and operates on a caller-owned
//! [`ConversationContext`].

use crate::context::ConversationContext;
use menubot_core::{ChatMessage, LLMProvider};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while talking to the model backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("LLM provider error: {0}")]
    Provider(#[from] anyhow::Error),

    #[error("Empty response from LLM")]
    EmptyResponse,
}

/// Shared, history-free handle to the completion backend.
#[derive(Clone)]
pub struct Gateway {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl Gateway {
    /// Create a gateway that uses the provider's default model.
    #[must_use]
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        let model = provider.get_default_model().to_string();
        Self { provider, model }
    }

    /// Override the model name.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Discard the context and install a single system turn.
    pub fn reset_with_system_prompt(&self, context: &mut ConversationContext, prompt: &str) {
        debug!("Resetting context with a {}-char system prompt", prompt.len());
        context.reset_with_system_prompt(prompt);
    }

    /// Append a user turn, ask the model, append and return its reply.
    ///
    /// On failure the user turn is removed again, leaving the context as it
    /// was before the call.
    pub async fn send_turn(
        &self,
        context: &mut ConversationContext,
        message: &str,
    ) -> Result<String, GatewayError> {
        context.push(ChatMessage::user(message));

        match self.exchange(context.messages()).await {
            Ok(reply) => {
                context.push(ChatMessage::assistant(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                context.pop();
                Err(e)
            }
        }
    }

    /// Reset with `prompt`, then send `message` as the only user turn.
    pub async fn send_one_shot(
        &self,
        context: &mut ConversationContext,
        prompt: &str,
        message: &str,
    ) -> Result<String, GatewayError> {
        self.reset_with_system_prompt(context, prompt);
        self.send_turn(context, message).await
    }

    async fn exchange(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        info!(
            "Sending {} turns to model {}",
            messages.len(),
            self.model
        );

        let response = self.provider.chat(messages, &self.model).await?;

        if response.content.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        if let Some(usage) = &response.usage {
            debug!(
                "Tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(response.content)
    }
}
