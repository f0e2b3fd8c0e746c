use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::EmbeddingConfig;
use crate::llm::hashing::HashingEmbedder;

/// Maximum characters to send per text to an embedding API.
/// Stories are short, but the form does not cap them; 3 000 chars stays well
/// under the 8 192-token context of the usual small embedding models.
const MAX_EMBED_CHARS: usize = 3_000;

/// Turns text into vectors. One output vector per input, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_single(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed(&[text.to_string()]).await?;
        results.into_iter().next().context("No embedding returned")
    }

    /// Provider name, for logs.
    fn name(&self) -> &str;
}

/// Create the embedder selected by `config.provider`.
pub fn create_embedder(
    client: &reqwest::Client,
    config: &EmbeddingConfig,
) -> Result<Arc<dyn Embedder>> {
    match config.provider.as_str() {
        "hashing" => Ok(Arc::new(HashingEmbedder::new(config.dim))),
        "ollama" | "openai" => Ok(Arc::new(HttpEmbedder::new(client.clone(), config.clone()))),
        other => anyhow::bail!("Unknown embedding provider: {other}. Supported: hashing, ollama, openai"),
    }
}

/// Truncate `text` to at most `MAX_EMBED_CHARS`, splitting on a UTF-8 char boundary.
fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Ollama or OpenAI-compatible embedding endpoint.
pub struct HttpEmbedder {
    client: reqwest::Client,
    config: EmbeddingConfig,
}

impl HttpEmbedder {
    pub fn new(client: reqwest::Client, config: EmbeddingConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let truncated: Vec<String> = texts
            .iter()
            .map(|t| truncate_for_embedding(t).to_string())
            .collect();

        let embeddings = match self.config.provider.as_str() {
            "ollama" => embed_ollama(&self.client, &self.config, &truncated).await?,
            "openai" => embed_openai(&self.client, &self.config, &truncated).await?,
            other => anyhow::bail!("Unknown embedding provider: {other}"),
        };

        if embeddings.len() != texts.len() {
            anyhow::bail!(
                "Embedding API returned {} vectors for {} inputs",
                embeddings.len(),
                texts.len()
            );
        }
        Ok(embeddings)
    }

    fn name(&self) -> &str {
        &self.config.provider
    }
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    input: Vec<String>,
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

async fn embed_ollama(
    client: &reqwest::Client,
    config: &EmbeddingConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/api/embed", config.base_url.trim_end_matches('/'));

    let req = OllamaEmbedRequest {
        model: config.model.clone(),
        input: texts.to_vec(),
        truncate: true,
    };

    let resp = client
        .post(&url)
        .json(&req)
        .send()
        .await
        .context("Failed to call Ollama embed API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Ollama embed API returned {status}: {body}");
    }

    let body: OllamaEmbedResponse = resp
        .json()
        .await
        .context("Failed to parse Ollama embed response")?;

    Ok(body.embeddings)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiEmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    embedding: Vec<f32>,
}

async fn embed_openai(
    client: &reqwest::Client,
    config: &EmbeddingConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/v1/embeddings", config.base_url.trim_end_matches('/'));
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiEmbedRequest {
        model: config.model.clone(),
        input: texts.to_vec(),
    };

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&req)
        .send()
        .await
        .context("Failed to call OpenAI embed API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("OpenAI embed API returned {status}: {body}");
    }

    let body: OpenAiEmbedResponse = resp
        .json()
        .await
        .context("Failed to parse OpenAI embed response")?;

    Ok(body.data.into_iter().map(|d| d.embedding).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http_config(provider: &str, base_url: String) -> EmbeddingConfig {
        EmbeddingConfig {
            provider: provider.to_string(),
            base_url,
            model: "test-embed".to_string(),
            api_key: Some("sk-test".to_string()),
            dim: 8,
        }
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let text = "é".repeat(MAX_EMBED_CHARS);
        let cut = truncate_for_embedding(&text);
        assert!(cut.len() <= MAX_EMBED_CHARS);
        assert!(text.is_char_boundary(cut.len()));
        assert_eq!(truncate_for_embedding("short"), "short");
    }

    #[test]
    fn test_create_embedder_rejects_unknown_provider() {
        let config = http_config("word2vec", "http://localhost".to_string());
        let err = create_embedder(&reqwest::Client::new(), &config).err().unwrap();
        assert!(err.to_string().contains("word2vec"));
    }

    #[tokio::test]
    async fn test_ollama_embed_parses_vectors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_partial_json(json!({"model": "test-embed", "truncate": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "embeddings": [[1.0, 0.0], [0.0, 1.0]]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(reqwest::Client::new(), http_config("ollama", server.uri()));
        let vectors = embedder
            .embed(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_openai_embed_sends_bearer_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("Authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"embedding": [0.5, 0.5]}]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(reqwest::Client::new(), http_config("openai", server.uri()));
        let vector = embedder.embed_single("story").await.unwrap();
        assert_eq!(vector, vec![0.5, 0.5]);
    }

    #[tokio::test]
    async fn test_embed_errors_on_vector_count_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "embeddings": [[1.0, 0.0]]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(reqwest::Client::new(), http_config("ollama", server.uri()));
        let err = embedder
            .embed(&["a".to_string(), "b".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("1 vectors for 2 inputs"));
    }

    #[tokio::test]
    async fn test_embed_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(reqwest::Client::new(), http_config("ollama", server.uri()));
        let err = embedder.embed_single("story").await.unwrap_err();
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("model not loaded"));
    }
}
