use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::error::TaxonomyError;
use crate::models::{GenreEntry, UNMAPPED};

/// Immutable genre → subgenre mapping, kept in construction order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    entries: Vec<GenreEntry>,
}

impl Taxonomy {
    /// Build a taxonomy, enforcing that names are non-empty, genres are
    /// unique, and every subgenre belongs to exactly one genre.
    pub fn new(entries: Vec<GenreEntry>) -> std::result::Result<Self, TaxonomyError> {
        if entries.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let mut seen_genres: Vec<&str> = Vec::with_capacity(entries.len());
        let mut owner: HashMap<&str, &str> = HashMap::new();

        for entry in &entries {
            let genre = entry.genre.as_str();
            if genre.is_empty() {
                return Err(TaxonomyError::EmptyGenre);
            }
            if genre == UNMAPPED {
                return Err(TaxonomyError::ReservedName(genre.to_string()));
            }
            if seen_genres.contains(&genre) {
                return Err(TaxonomyError::DuplicateGenre(genre.to_string()));
            }
            seen_genres.push(genre);

            for sub in &entry.subgenres {
                if sub.is_empty() {
                    return Err(TaxonomyError::EmptySubgenre {
                        genre: genre.to_string(),
                    });
                }
                if sub == UNMAPPED {
                    return Err(TaxonomyError::ReservedName(sub.clone()));
                }
                if let Some(first) = owner.insert(sub.as_str(), genre) {
                    return Err(TaxonomyError::DuplicateSubgenre {
                        subgenre: sub.clone(),
                        first: first.to_string(),
                        second: genre.to_string(),
                    });
                }
            }
        }

        Ok(Self { entries })
    }

    /// The taxonomy the service ships with.
    pub fn builtin() -> Self {
        let entries = [
            ("Romance", &["Slow-burn", "Enemies-to-Lovers", "Second Chance"]),
            ("Thriller", &["Espionage", "Psychological", "Legal Thriller"]),
            ("Sci-Fi", &["Hard Sci-Fi", "Space Opera", "Cyberpunk"]),
            ("Horror", &["Psychological Horror", "Gothic", "Slasher"]),
        ]
        .into_iter()
        .map(|(genre, subs)| GenreEntry {
            genre: genre.to_string(),
            subgenres: subs.iter().map(|s| s.to_string()).collect(),
        })
        .collect();

        Self { entries }
    }

    /// Load an ordered JSON list of `{"genre": .., "subgenres": [..]}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy file {}", path.display()))?;
        let entries: Vec<GenreEntry> = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse taxonomy file {}", path.display()))?;
        Self::new(entries).with_context(|| format!("Invalid taxonomy in {}", path.display()))
    }

    pub fn entries(&self) -> &[GenreEntry] {
        &self.entries
    }

    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.genre.as_str())
    }

    pub fn subgenres(&self, genre: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.genre == genre)
            .map(|e| e.subgenres.as_slice())
    }

    pub fn contains_genre(&self, genre: &str) -> bool {
        self.entries.iter().any(|e| e.genre == genre)
    }

    pub fn contains(&self, genre: &str, subgenre: &str) -> bool {
        self.subgenres(genre)
            .is_some_and(|subs| subs.iter().any(|s| s == subgenre))
    }

    /// `"Genre -> Subgenre"` labels in construction order. These are the
    /// documents the retriever indexes.
    pub fn labels(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.subgenres.iter().map(move |s| format!("{} -> {}", e.genre, s)))
            .collect()
    }

    /// Number of (genre, subgenre) pairs.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|e| e.subgenres.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}
