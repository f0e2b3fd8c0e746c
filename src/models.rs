use serde::{Deserialize, Serialize};

/// Sentinel used for both genre and subgenre when nothing in the taxonomy fits.
pub const UNMAPPED: &str = "UNMAPPED";

/// Outcome of mapping one story.
///
/// Either both `genre` and `subgenre` name a pair from the taxonomy, or both
/// are [`UNMAPPED`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MappingResult {
    pub genre: String,
    pub subgenre: String,
    pub reasoning: String,
}

impl MappingResult {
    pub fn new(
        genre: impl Into<String>,
        subgenre: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            genre: genre.into(),
            subgenre: subgenre.into(),
            reasoning: reasoning.into(),
        }
    }

    pub fn unmapped(reasoning: impl Into<String>) -> Self {
        Self::new(UNMAPPED, UNMAPPED, reasoning)
    }

    pub fn is_unmapped(&self) -> bool {
        self.genre == UNMAPPED
    }
}

/// Tags as typed into the form: either a JSON list or one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl Default for TagsInput {
    fn default() -> Self {
        TagsInput::List(Vec::new())
    }
}

impl TagsInput {
    /// Trimmed, non-empty tags in input order.
    pub fn into_tags(self) -> Vec<String> {
        match self {
            TagsInput::List(tags) => tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            TagsInput::Text(text) => parse_tags(&text),
        }
    }
}

/// Split a comma-separated tag string, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Map request
#[derive(Debug, Clone, Deserialize)]
pub struct MapRequest {
    #[serde(default)]
    pub tags: TagsInput,
    pub story: String,
}

/// One genre and its subgenres, in taxonomy order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenreEntry {
    pub genre: String,
    pub subgenres: Vec<String>,
}
