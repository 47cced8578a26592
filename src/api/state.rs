use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    providers::{ChatProvider, GroqProvider},
    CardGenerator, ReasonGenerator, RecipeStore,
};

/// Shared application state
///
/// Everything here is immutable after startup; the dataset itself is read
/// per request by [`RecipeStore`].
#[derive(Clone)]
pub struct AppState {
    pub store: RecipeStore,
    pub reasons: ReasonGenerator,
    pub cards: CardGenerator,
    /// Model name reported to clients, present only when a provider is configured
    pub ai_model: Option<String>,
    /// Configured public origin for image URLs
    pub public_base_url: Option<String>,
    /// Origin used when neither the config nor the request names one
    pub default_base_url: String,
}

impl AppState {
    /// Builds state from configuration, wiring Groq when an API key is set
    pub fn from_config(config: &Config) -> Self {
        let provider: Option<Arc<dyn ChatProvider>> = config.api_key().map(|key| {
            Arc::new(GroqProvider::new(
                key.to_string(),
                config.groq_api_url.clone(),
                config.groq_model.clone(),
            )) as Arc<dyn ChatProvider>
        });

        if provider.is_none() {
            tracing::warn!("GROQ_API_KEY not set, AI text will use built-in templates");
        }

        Self::with_provider(config, provider)
    }

    /// Builds state around an explicit provider (or none)
    pub fn with_provider(config: &Config, provider: Option<Arc<dyn ChatProvider>>) -> Self {
        let ai_model = provider.as_ref().map(|_| config.groq_model.clone());

        Self {
            store: RecipeStore::new(&config.recipes_path),
            reasons: ReasonGenerator::new(provider.clone()),
            cards: CardGenerator::new(provider),
            ai_model,
            public_base_url: config.public_base_url.clone(),
            default_base_url: format!("http://{}:{}", config.host, config.port),
        }
    }

    /// Origin for absolute image URLs, preferring config over the Host header
    pub fn base_url(&self, host: Option<&str>) -> String {
        match (&self.public_base_url, host) {
            (Some(url), _) => url.clone(),
            (None, Some(host)) => format!("http://{}", host),
            (None, None) => self.default_base_url.clone(),
        }
    }
}
