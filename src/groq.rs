//! Groq chat-completions client.
//!
//! One POST per call, no streaming, no retries. The pipeline uses it twice
//! per run: once to generate candidate song lines (a failure there makes the
//! whole run fall back) and once to generate the human-readable explanation
//! (a failure there degrades to a canned sentence).

use std::time::Duration;

use reqwest::Client;

use crate::{
    config,
    error::PipelineError,
    types::{ChatMessage, ChatRequest, ChatResponse},
};

/// Hard timeout for chat-completions calls. Generation is slower than
/// catalog lookups, so this is deliberately above the catalog timeout.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GroqClient {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        GroqClient {
            http: Client::new(),
            api_url,
            api_key,
            model,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            config::groq_api_url(),
            config::groq_api_key(),
            config::groq_model(),
        )
    }

    /// Sends one chat-completions request and returns the content of the
    /// first choice.
    ///
    /// # Errors
    ///
    /// Non-2xx responses surface as `SuggestionFailed` with the status and
    /// body text; transport failures map through the usual timeout
    /// classification.
    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, PipelineError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(CHAT_TIMEOUT)
            .send()
            .await
            .map_err(PipelineError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::SuggestionFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response.json().await.map_err(PipelineError::from_transport)?;
        Ok(body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
