use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Groq API key; the service runs with canned text when it is missing
    #[serde(default)]
    pub groq_api_key: Option<String>,

    /// Chat model used for reasons and greeting cards
    #[serde(default = "default_groq_model")]
    pub groq_model: String,

    /// Groq API base URL (OpenAI-compatible)
    #[serde(default = "default_groq_api_url")]
    pub groq_api_url: String,

    /// Path to the recipe dataset
    #[serde(default = "default_recipes_path")]
    pub recipes_path: String,

    /// Directory served under /static
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Public origin used to build image URLs, e.g. "https://desserts.example.com"
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_groq_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_groq_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_recipes_path() -> String {
    "data/recipes.json".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            groq_model: default_groq_model(),
            groq_api_url: default_groq_api_url(),
            recipes_path: default_recipes_path(),
            static_dir: default_static_dir(),
            public_base_url: None,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// The API key, if one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.groq_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
