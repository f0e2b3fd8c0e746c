use serde::Deserialize;
use serde_json::Value;

use crate::error::MapError;
use crate::models::{MappingResult, UNMAPPED};
use crate::taxonomy::Taxonomy;

pub const GENRE_NOT_PRESENT: &str = "Genre not present in taxonomy.";
pub const SUBGENRE_NOT_PRESENT: &str = "Subgenre not present in taxonomy.";

/// The JSON object the model is asked to return.
///
/// Fields are kept loose so that a missing or non-string genre reaches
/// [`validate`] and is coerced there instead of failing the parse.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ModelReply {
    #[serde(default)]
    pub genre: Option<Value>,
    #[serde(default)]
    pub subgenre: Option<Value>,
    #[serde(default)]
    pub reasoning: Option<Value>,
}

impl ModelReply {
    fn genre(&self) -> Option<&str> {
        self.genre.as_ref().and_then(Value::as_str)
    }

    fn subgenre(&self) -> Option<&str> {
        self.subgenre.as_ref().and_then(Value::as_str)
    }

    /// Missing, null or non-string reasoning becomes the empty string.
    fn reasoning(&self) -> String {
        self.reasoning
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

/// Parse a model reply. Prose or code fences around the object are
/// tolerated, but the top-level JSON value must be an object.
pub fn parse_reply(content: &str) -> Result<ModelReply, MapError> {
    let malformed = |why: String| MapError::MalformedReply(format!("{why}; reply: {}", snippet(content)));

    let trimmed = content.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return match value {
            Value::Object(_) => {
                serde_json::from_value::<ModelReply>(value).map_err(|e| malformed(e.to_string()))
            }
            _ => Err(malformed("top-level JSON value is not an object".to_string())),
        };
    }

    let (start, end) = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => return Err(malformed("no JSON object in reply".to_string())),
    };

    // `[{...}]` wrapped in prose is still an array, not an object.
    if trimmed[..start].trim_end().ends_with('[') {
        return Err(malformed("top-level JSON value is not an object".to_string()));
    }

    serde_json::from_str::<ModelReply>(&trimmed[start..=end]).map_err(|e| malformed(e.to_string()))
}

/// Accept a reply only if it is fully in-taxonomy or fully `UNMAPPED`;
/// anything else, including a missing or non-string genre or subgenre, is
/// coerced to `UNMAPPED` with the failed check as reasoning.
pub fn validate(taxonomy: &Taxonomy, reply: ModelReply) -> MappingResult {
    let genre = reply.genre();

    if genre == Some(UNMAPPED) {
        return MappingResult::unmapped(reply.reasoning());
    }

    let Some(genre) = genre.filter(|g| taxonomy.contains_genre(g)) else {
        tracing::warn!("Model chose unknown genre {:?}; returning UNMAPPED", reply.genre);
        return MappingResult::unmapped(GENRE_NOT_PRESENT);
    };

    let Some(subgenre) = reply.subgenre().filter(|s| taxonomy.contains(genre, s)) else {
        tracing::warn!(
            "Model chose subgenre {:?} outside genre {:?}; returning UNMAPPED",
            reply.subgenre,
            genre
        );
        return MappingResult::unmapped(SUBGENRE_NOT_PRESENT);
    };

    MappingResult::new(genre, subgenre, reply.reasoning())
}

fn snippet(content: &str) -> String {
    const MAX: usize = 200;
    match content.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}
