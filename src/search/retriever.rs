use anyhow::{Context, Result};
use std::sync::Arc;

use crate::llm::embeddings::Embedder;
use crate::search::vector::LabelIndex;
use crate::taxonomy::Taxonomy;

/// Finds the taxonomy labels closest to a story.
pub struct ContextRetriever {
    embedder: Arc<dyn Embedder>,
    index: LabelIndex,
    k: usize,
}

impl ContextRetriever {
    /// Embed every `"Genre -> Subgenre"` label of `taxonomy` once.
    pub async fn build(taxonomy: &Taxonomy, embedder: Arc<dyn Embedder>, k: usize) -> Result<Self> {
        let labels = taxonomy.labels();
        let embeddings = embedder
            .embed(&labels)
            .await
            .with_context(|| format!("Failed to embed taxonomy labels with {}", embedder.name()))?;
        let index = LabelIndex::from_embeddings(&labels, embeddings)?;

        tracing::info!(
            "Indexed {} taxonomy labels with the {} embedder",
            index.len(),
            embedder.name()
        );

        Ok(Self { embedder, index, k })
    }

    /// Up to `k` labels, most similar first.
    pub async fn retrieve(&self, story: &str) -> Result<Vec<String>> {
        if self.k == 0 {
            return Ok(Vec::new());
        }

        let query = self
            .embedder
            .embed_single(story)
            .await
            .context("Failed to embed story")?;

        Ok(self
            .index
            .search(&query, self.k)
            .into_iter()
            .map(|hit| hit.label)
            .collect())
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }
}
