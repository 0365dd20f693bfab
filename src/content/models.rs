//! Data models for vocabulary content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vocabulary item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: Uuid,
    /// The headword itself
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    /// Part of speech, e.g. "adj."
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meaning_zh: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_zh: Option<String>,
    /// Syllable split, e.g. "re-sil-ient"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syllables: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_roots: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonics: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Word {
    /// Individual syllables, split on hyphens and whitespace.
    pub fn syllable_parts(&self) -> Vec<&str> {
        self.syllables
            .as_deref()
            .map(|s| {
                s.split(|c: char| c == '-' || c.is_whitespace())
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Short gloss for list views, Chinese meaning first.
    pub fn gloss(&self) -> Option<&str> {
        self.meaning_zh.as_deref().or(self.meaning_en.as_deref())
    }
}

/// Input for creating a word. Blank optional fields are stored as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    pub text: String,
    pub phonetic: Option<String>,
    pub pos: Option<String>,
    pub meaning_en: Option<String>,
    pub meaning_zh: Option<String>,
    pub example_en: Option<String>,
    pub example_zh: Option<String>,
    pub syllables: Option<String>,
    pub word_roots: Option<String>,
    pub mnemonics: Option<String>,
}

impl NewWord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Trim a field, treating whitespace-only as absent.
pub(crate) fn normalize(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Ordering for word listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WordOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// A curated, ordered bundle of words with a story in two languages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSet {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_zh: Option<String>,
    /// Teacher who created the set
    pub created_by: Uuid,
    /// Word ids in presentation order
    #[serde(default)]
    pub word_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a word-set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWordSet {
    pub name: String,
    pub description: Option<String>,
    pub story_en: Option<String>,
    pub story_zh: Option<String>,
    #[serde(default)]
    pub word_ids: Vec<Uuid>,
}
