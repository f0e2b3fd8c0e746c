use anyhow::Result;

/// A stored label entry
#[derive(Debug, Clone)]
struct LabelEntry {
    label: String,
    embedding: Vec<f32>,
}

/// In-memory label index with cosine similarity search.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct LabelIndex {
    entries: Vec<LabelEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelHit {
    pub label: String,
    pub score: f32,
}

impl LabelIndex {
    /// Build an index from labels and their embeddings. `embeddings` must be
    /// parallel with `labels`.
    pub fn from_embeddings(labels: &[String], embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if labels.len() != embeddings.len() {
            anyhow::bail!(
                "Got {} embeddings for {} labels",
                embeddings.len(),
                labels.len()
            );
        }

        let entries = labels
            .iter()
            .zip(embeddings)
            .map(|(label, embedding)| LabelEntry {
                label: label.clone(),
                embedding,
            })
            .collect();

        Ok(Self { entries })
    }

    /// Top `limit` labels by cosine similarity, best first. Equal scores keep
    /// index construction order.
    pub fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<LabelHit> {
        let mut scored: Vec<(f32, &LabelEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query_embedding, &e.embedding), e))
            .collect();

        // Stable sort: ties stay in insertion order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(score, e)| LabelHit {
                label: e.label.clone(),
                score,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        0.0
    } else {
        dot / denom
    }
}
