use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Chat model every mapping request is sent to.
pub const CHAT_MODEL: &str = "llama3-70b-8192";

/// Sampling temperature for mapping requests (most deterministic setting).
pub const CHAT_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Optional JSON taxonomy file; the builtin taxonomy is used when unset
    pub taxonomy_path: Option<PathBuf>,
    /// Number of taxonomy labels retrieved as context per request
    pub retrieval_k: usize,
    /// Language-model backend configuration
    pub llm: LlmConfig,
    /// Embedding backend configuration
    pub embedding: EmbeddingConfig,
}

/// OpenAI-compatible chat backend. Model and temperature are fixed
/// ([`CHAT_MODEL`], [`CHAT_TEMPERATURE`]); only the endpoint and key vary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL for the chat API (`/v1/chat/completions` is appended)
    pub base_url: String,
    /// API key. Without one the model path is disabled for the process lifetime.
    pub api_key: Option<String>,
}

impl LlmConfig {
    /// True when credentials are present and non-blank.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "hashing", "ollama" or "openai"
    pub provider: String,
    /// Base URL for HTTP embedding providers
    pub base_url: String,
    /// Model name for HTTP embedding providers
    pub model: String,
    /// API key (only needed for OpenAI-compatible providers)
    pub api_key: Option<String>,
    /// Vector dimension for the hashing embedder
    pub dim: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9000".to_string(),
            taxonomy_path: None,
            retrieval_k: 4,
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".to_string(),
            api_key: None,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hashing".to_string(),
            base_url: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            api_key: None,
            dim: 256,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source; unparsable numbers keep defaults.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = var("TAXONOMY_MAPPER_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(path) = var("TAXONOMY_PATH") {
            config.taxonomy_path = Some(PathBuf::from(path));
        }
        if let Some(val) = var("RETRIEVAL_K") {
            if let Ok(k) = val.parse() {
                config.retrieval_k = k;
            }
        }

        if let Some(url) = var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        config.llm.api_key = var("LLM_API_KEY")
            .or_else(|| var("GROQ_API_KEY"))
            .filter(|k| !k.trim().is_empty());

        if let Some(provider) = var("EMBEDDING_PROVIDER") {
            config.embedding.provider = provider;
        }
        if let Some(url) = var("EMBEDDING_BASE_URL") {
            config.embedding.base_url = url;
        }
        if let Some(model) = var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Some(key) = var("EMBEDDING_API_KEY") {
            config.embedding.api_key = Some(key);
        }
        if let Some(val) = var("EMBEDDING_DIM") {
            if let Ok(d) = val.parse::<usize>() {
                if d > 0 {
                    config.embedding.dim = d;
                }
            }
        }

        config
    }
}
