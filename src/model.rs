use anyhow::{Result, anyhow};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::providers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sends `messages` to the configured host model under `system_prompt` and
/// returns the generated text.
pub async fn generate(
    client: &Client,
    cfg: &Config,
    system_prompt: &str,
    messages: &[Message],
) -> Result<String> {
    match cfg.model_provider.as_str() {
        "gemini" => {
            debug!(
                provider = "gemini",
                model = %cfg.model,
                message_count = messages.len(),
                "dispatching model request"
            );
            providers::gemini::generate(client, cfg, system_prompt, messages).await
        }
        "ollama" => {
            debug!(
                provider = "ollama",
                model = %cfg.model,
                message_count = messages.len(),
                "dispatching model request"
            );
            providers::ollama::chat(client, cfg, system_prompt, messages).await
        }
        other => {
            warn!(provider = %other, "unsupported model provider configured");
            Err(anyhow!(
                "Unsupported MODEL_PROVIDER='{}'. Supported providers: gemini, ollama.",
                other
            ))
        }
    }
}
