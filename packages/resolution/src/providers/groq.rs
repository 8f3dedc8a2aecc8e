//! Groq-hosted chat model behind the [`ChatModel`] seam.
//!
//! Speaks the OpenAI-compatible chat completions API. Sampling is pinned
//! for determinism: temperature 0.1, output bounded at 1000 tokens.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ResolutionError, Result};
use crate::security::SecretString;
use crate::traits::ChatModel;

/// Environment variable holding the Groq key.
pub const API_KEY_VAR: &str = "API_KEY_GROQ";

const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";
const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 1000;

/// Groq chat completions client.
#[derive(Clone)]
pub struct GroqChat {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GroqChat {
    /// Create a client with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::new(api_key),
            model: DEFAULT_MODEL.to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
        }
    }

    /// Create from the `API_KEY_GROQ` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| ResolutionError::Config(format!("{API_KEY_VAR} not set")))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl ChatModel for GroqChat {
    async fn complete(&self, system: &str, user: &str) -> std::result::Result<String, ModelError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Http(Box::new(e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ModelError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_model_and_base_url() {
        let chat = GroqChat::new("gsk-test")
            .with_model("llama-3.1-8b-instant")
            .with_base_url("https://custom.api.com/v1");

        assert_eq!(chat.model(), "llama-3.1-8b-instant");
        assert_eq!(chat.base_url, "https://custom.api.com/v1");
    }

    #[test]
    fn choices_shape_parses() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "hello"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
    }
}
