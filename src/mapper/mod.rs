//! The decision engine: retrieval, prompted model call, validation, and the
//! keyword fallback that answers whenever the model path cannot.

pub mod fallback;
pub mod prompt;
pub mod reply;

use std::sync::Arc;

use crate::error::MapError;
use crate::llm::completion::LanguageModel;
use crate::models::MappingResult;
use crate::search::retriever::ContextRetriever;
use crate::taxonomy::Taxonomy;

pub use fallback::rule_based_fallback;

/// Maps stories onto a taxonomy. Read-only after construction.
pub struct TaxonomyMapper {
    taxonomy: Arc<Taxonomy>,
    retriever: ContextRetriever,
    llm: Option<Arc<dyn LanguageModel>>,
}

impl TaxonomyMapper {
    /// `llm = None` pins the mapper to the keyword fallback for its lifetime.
    pub fn new(
        taxonomy: Arc<Taxonomy>,
        retriever: ContextRetriever,
        llm: Option<Arc<dyn LanguageModel>>,
    ) -> Self {
        Self {
            taxonomy,
            retriever,
            llm,
        }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    pub fn retriever(&self) -> &ContextRetriever {
        &self.retriever
    }

    /// Map one story. Never fails: any retrieval, backend or parse error
    /// sends this request to the keyword fallback, with no retry.
    pub async fn map_story(&self, tags: &[String], story: &str) -> MappingResult {
        match self.map_with_model(tags, story).await {
            Ok(result) => {
                tracing::info!(
                    "Mapped via language model: {} / {}",
                    result.genre,
                    result.subgenre
                );
                result
            }
            Err(e) => {
                match &e {
                    MapError::BackendUnavailable => {
                        tracing::debug!("No language model configured, using keyword fallback")
                    }
                    other => tracing::warn!("Model path failed, using keyword fallback: {other}"),
                }
                let result = rule_based_fallback(&self.taxonomy, story);
                tracing::info!(
                    "Mapped via keyword fallback: {} / {}",
                    result.genre,
                    result.subgenre
                );
                result
            }
        }
    }

    async fn map_with_model(&self, tags: &[String], story: &str) -> Result<MappingResult, MapError> {
        let context = self
            .retriever
            .retrieve(story)
            .await
            .map_err(MapError::Retrieval)?;
        tracing::debug!("Retrieved taxonomy context: {:?}", context);

        let llm = self.llm.as_ref().ok_or(MapError::BackendUnavailable)?;

        let prompt = prompt::build_prompt(&self.taxonomy, &context, tags, story);
        let content = llm.complete(&prompt).await?;
        let parsed = reply::parse_reply(&content)?;

        Ok(reply::validate(&self.taxonomy, parsed))
    }
}
