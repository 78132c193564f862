//! Chat-completions client
//!
//! Talks the OpenAI-compatible chat completions wire format against the
//! Groq API. Calls are never retried here; failures surface to the caller.

use crate::prompts::{self, SuggestionLanguage};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tomascan_core::{Error, Result};
use tracing::info;

/// Default chat completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Generation settings for chat completions.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Chat completions request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

/// Chat completions response body (non-streaming).
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Client for the chat API.
pub struct ChatClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    settings: ChatSettings,
}

impl ChatClient {
    /// Create a new client. Fails when no API key was configured.
    pub fn new(api_key: impl Into<String>, settings: ChatSettings) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("no API key provided for chat client"));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: DEFAULT_API_URL.to_string(),
            api_key,
            settings,
        })
    }

    /// Override the API endpoint (used for self-hosted compatible servers).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Respond to a forum chat message. Surrounding whitespace is
    /// stripped; blank messages are rejected.
    pub async fn chat_response(&self, user_message: &str) -> Result<String> {
        let user_message = user_message.trim();
        if user_message.is_empty() {
            return Err(Error::validation("User message cannot be empty"));
        }

        let reply = self.complete(prompts::chat_messages(user_message)).await?;
        info!(preview = preview(&reply), "generated chat response");
        Ok(reply)
    }

    /// Detailed information about a detected disease.
    pub async fn disease_info(&self, disease_name: &str) -> Result<String> {
        let disease_name = disease_name.trim();
        if disease_name.is_empty() {
            return Err(Error::validation("Disease name cannot be empty"));
        }

        let reply = self
            .complete(prompts::disease_info_messages(disease_name))
            .await?;
        info!(disease = disease_name, preview = preview(&reply), "generated disease info");
        Ok(reply)
    }

    /// Treatment suggestions for a detected disease.
    pub async fn treatment_suggestion(
        &self,
        disease_name: &str,
        language: SuggestionLanguage,
    ) -> Result<String> {
        let disease_name = disease_name.trim();
        if disease_name.is_empty() {
            return Err(Error::validation("Disease name cannot be empty"));
        }

        self.complete(prompts::treatment_messages(disease_name, language))
            .await
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            top_p: 1.0,
            stream: false,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::connectivity(format!("failed to reach chat API: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::chat(format!("chat API returned {status}: {detail}")));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::chat(format!("invalid chat API response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::chat("chat API returned no choices"))
    }
}

/// First 50 characters, for log lines.
fn preview(text: &str) -> &str {
    let end = text
        .char_indices()
        .nth(50)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        assert!(matches!(
            ChatClient::new("", ChatSettings::default()),
            Err(Error::Config(_))
        ));
        assert!(ChatClient::new("gsk_test", ChatSettings::default()).is_ok());
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "model": "llama3-8b-8192",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Tanam tomat di lahan gembur."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 8, "total_tokens": 18}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.choices[0].message.content,
            "Tanam tomat di lahan gembur."
        );
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let long = "p".repeat(80);
        assert_eq!(preview(&long).len(), 50);
        assert_eq!(preview("pendek"), "pendek");
        // Multi-byte characters must not split.
        let accented = "é".repeat(60);
        assert_eq!(preview(&accented).chars().count(), 50);
    }

    #[tokio::test]
    async fn test_blank_message_rejected_without_network() {
        let client = ChatClient::new("gsk_test", ChatSettings::default()).unwrap();
        assert!(matches!(
            client.chat_response("").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            client.chat_response("   \n\t ").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            client.disease_info("  ").await,
            Err(Error::Validation(_))
        ));
    }
}
