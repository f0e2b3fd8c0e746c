use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm::completion::{ChatCompletionClient, LanguageModel};
use crate::llm::embeddings::{create_embedder, Embedder};
use crate::llm::hashing::HashingEmbedder;
use crate::mapper::TaxonomyMapper;
use crate::search::retriever::ContextRetriever;
use crate::taxonomy::Taxonomy;

/// Shared application state. Everything in it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub mapper: Arc<TaxonomyMapper>,
}

impl AppState {
    /// Load the taxonomy, build the label index and wire the optional model
    /// backend. Only an unreadable or invalid taxonomy file is fatal.
    pub async fn new(config: Config) -> Result<Self> {
        let taxonomy = match &config.taxonomy_path {
            Some(path) => Taxonomy::from_json_file(path)?,
            None => Taxonomy::builtin(),
        };
        let taxonomy = Arc::new(taxonomy);
        tracing::info!(
            "Taxonomy: {} genres, {} labels",
            taxonomy.entries().len(),
            taxonomy.len()
        );

        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;

        let retriever = build_retriever(&http_client, &config, &taxonomy).await?;

        let llm: Option<Arc<dyn LanguageModel>> =
            match ChatCompletionClient::from_config(http_client, &config.llm) {
                Some(client) => {
                    tracing::info!("Language model backend: {}", config.llm.base_url);
                    Some(Arc::new(client) as Arc<dyn LanguageModel>)
                }
                None => {
                    tracing::warn!(
                        "No LLM_API_KEY/GROQ_API_KEY set; all stories will use the keyword fallback"
                    );
                    None
                }
            };

        let mapper = TaxonomyMapper::new(taxonomy, retriever, llm);
        Ok(Self::from_parts(config, mapper))
    }

    pub fn from_parts(config: Config, mapper: TaxonomyMapper) -> Self {
        Self {
            config,
            mapper: Arc::new(mapper),
        }
    }
}

/// Index labels with the configured embedder, degrading to the local
/// hashing embedder when the configured one is unknown or unreachable.
async fn build_retriever(
    client: &reqwest::Client,
    config: &Config,
    taxonomy: &Taxonomy,
) -> Result<ContextRetriever> {
    let k = config.retrieval_k;
    let hashing = || -> Arc<dyn Embedder> { Arc::new(HashingEmbedder::new(config.embedding.dim)) };

    let embedder = match create_embedder(client, &config.embedding) {
        Ok(embedder) => embedder,
        Err(e) => {
            tracing::warn!("{e}; using the hashing embedder");
            hashing()
        }
    };

    if embedder.name() == "hashing" {
        return ContextRetriever::build(taxonomy, embedder, k).await;
    }

    match ContextRetriever::build(taxonomy, embedder, k).await {
        Ok(retriever) => Ok(retriever),
        Err(e) => {
            tracing::warn!("Label indexing failed ({e:#}); rebuilding with the hashing embedder");
            ContextRetriever::build(taxonomy, hashing(), k).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_state_has_no_llm_and_hashing_retriever() {
        let state = AppState::new(Config::default()).await.unwrap();
        assert!(!state.mapper.has_llm());
        assert_eq!(state.mapper.retriever().embedder_name(), "hashing");
        assert_eq!(state.mapper.retriever().k(), 4);
    }

    #[tokio::test]
    async fn test_unreachable_embedding_backend_degrades_to_hashing() {
        let mut config = Config::default();
        config.embedding.provider = "ollama".to_string();
        // Nothing listens on the discard port.
        config.embedding.base_url = "http://127.0.0.1:9".to_string();

        let state = AppState::new(config).await.unwrap();
        assert_eq!(state.mapper.retriever().embedder_name(), "hashing");
    }

    #[tokio::test]
    async fn test_unknown_embedding_provider_degrades_to_hashing() {
        let mut config = Config::default();
        config.embedding.provider = "word2vec".to_string();

        let state = AppState::new(config).await.unwrap();
        assert_eq!(state.mapper.retriever().embedder_name(), "hashing");
    }

    #[tokio::test]
    async fn test_api_key_enables_llm() {
        let mut config = Config::default();
        config.llm.api_key = Some("gsk-test".to_string());

        let state = AppState::new(config).await.unwrap();
        assert!(state.mapper.has_llm());
    }

    #[tokio::test]
    async fn test_missing_taxonomy_file_is_fatal() {
        let mut config = Config::default();
        config.taxonomy_path = Some("/nonexistent/taxonomy.json".into());

        let err = AppState::new(config).await.err().unwrap();
        assert!(format!("{err:#}").contains("Failed to read taxonomy file"));
    }
}
