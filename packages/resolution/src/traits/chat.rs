//! Chat model trait.

use async_trait::async_trait;

use crate::error::ModelError;

/// A chat-style language model.
///
/// Implementations wrap a specific provider (Groq, OpenAI, ...) and handle
/// transport and response unwrapping. The pipeline sends one system
/// instruction plus one user prompt and reads back free text; everything
/// else (JSON scanning, validation) happens on this side of the seam.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one chat completion and return the assistant's text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, ModelError>;
}
