//! Groq chat-completion provider
//!
//! Groq exposes an OpenAI-compatible API:
//! `POST {api_url}/chat/completions` with a bearer token, returning
//! `choices[0].message.content`.
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::{ChatProvider, Prompt, ProviderError};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct GroqProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GroqProvider {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }

    fn build_request<'a>(&'a self, prompt: &'a Prompt) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
            stream: false,
        }
    }

    /// Pulls the trimmed assistant text out of a completion body
    fn extract_content(body: &str) -> Result<String, ProviderError> {
        let response: CompletionResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse completion: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| ProviderError::InvalidResponse("Completion has no content".to_string()))
    }
}

#[async_trait::async_trait]
impl ChatProvider for GroqProvider {
    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        tracing::debug!(
            model = %self.model,
            temperature = prompt.temperature,
            provider = "groq",
            "Calling chat completion API"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let content = Self::extract_content(&body)?;

        tracing::info!(
            model = %self.model,
            chars = content.chars().count(),
            provider = "groq",
            "Chat completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}
