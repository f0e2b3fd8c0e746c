//! Error types for taxonomy construction and the mapping path.

use thiserror::Error;

/// Failures on the way to a model-backed answer.
///
/// None of these reach callers of [`crate::mapper::TaxonomyMapper::map_story`]:
/// every variant routes the request to the keyword fallback.
#[derive(Debug, Error)]
pub enum MapError {
    /// No language-model backend is configured for this process.
    #[error("language model backend unavailable")]
    BackendUnavailable,

    /// The backend call failed (transport error, non-2xx status, empty reply).
    #[error("language model call failed: {0:#}")]
    Backend(anyhow::Error),

    /// The backend answered, but not with the expected JSON object.
    #[error("malformed model reply: {0}")]
    MalformedReply(String),

    /// Embedding the story for context retrieval failed.
    #[error("context retrieval failed: {0:#}")]
    Retrieval(anyhow::Error),
}

/// Violations of the taxonomy invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("taxonomy has no genres")]
    Empty,

    #[error("genre name is empty")]
    EmptyGenre,

    #[error("genre {genre:?} has an empty subgenre name")]
    EmptySubgenre { genre: String },

    #[error("genre {0:?} is listed more than once")]
    DuplicateGenre(String),

    #[error("subgenre {subgenre:?} appears under both {first:?} and {second:?}")]
    DuplicateSubgenre {
        subgenre: String,
        first: String,
        second: String,
    },

    #[error("{0:?} is reserved for unmapped results")]
    ReservedName(String),
}
