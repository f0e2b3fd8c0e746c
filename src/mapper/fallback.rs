//! Keyword classifier used whenever the model path cannot answer.

use crate::models::MappingResult;
use crate::taxonomy::Taxonomy;

/// Reasoning attached when no keyword rule matches.
pub const NO_MATCH_REASONING: &str = "Story does not fit any category in the taxonomy.";

struct KeywordRule {
    keywords: &'static [&'static str],
    genre: &'static str,
    subgenre: &'static str,
    reasoning: &'static str,
}

/// Evaluated top to bottom; the first rule with any keyword present wins.
const RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["lawyer", "judge", "court", "trial"],
        genre: "Thriller",
        subgenre: "Legal Thriller",
        reasoning: "Legal proceedings dominate the story context.",
    },
    KeywordRule {
        keywords: &["spy", "agent", "mission", "classified"],
        genre: "Thriller",
        subgenre: "Espionage",
        reasoning: "Espionage-related terms indicate spy thriller.",
    },
    KeywordRule {
        keywords: &["mansion", "ghost", "haunted", "corridor"],
        genre: "Horror",
        subgenre: "Gothic",
        reasoning: "Atmospheric horror elements suggest gothic horror.",
    },
    KeywordRule {
        keywords: &["years later", "again", "after years"],
        genre: "Romance",
        subgenre: "Second Chance",
        reasoning: "Reunion after long separation indicates second chance romance.",
    },
];

/// Classify `story` by plain substring search over its lower-cased text.
///
/// Pure and total. Rules naming a pair that `taxonomy` does not contain are
/// skipped, so the result is always in-taxonomy or `UNMAPPED`.
pub fn rule_based_fallback(taxonomy: &Taxonomy, story: &str) -> MappingResult {
    let text = story.to_lowercase();

    RULES
        .iter()
        .filter(|rule| taxonomy.contains(rule.genre, rule.subgenre))
        .find(|rule| rule.keywords.iter().any(|k| text.contains(k)))
        .map(|rule| MappingResult::new(rule.genre, rule.subgenre, rule.reasoning))
        .unwrap_or_else(|| MappingResult::unmapped(NO_MATCH_REASONING))
}
