//! Chat-completion provider abstraction
//!
//! Generators talk to a language model only through [`ChatProvider`], so the
//! service can run without credentials and tests can swap in canned replies.
use serde::Serialize;

pub mod groq;

pub use groq::GroqProvider;

/// A single-turn chat request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
        }
    }
}

/// Failures talking to a chat provider
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Trait for chat-completion providers
///
/// One call, no streaming, no retries. Callers decide what to do on failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends the prompt and returns the assistant's text
    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
