use serde::{Deserialize, Serialize};

/// A single vocabulary word as it appears in unit data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordItem {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// A sentence entry inside a sentence unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceItem {
    pub sentence: String,
    pub description: String,
}

/// A titled group of sentences within a sentence unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSection {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Vec<SentenceItem>,
}

/// A learning unit, discriminated by its `type` tag in the data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Unit {
    /// Plain word-list unit.
    #[serde(rename = "unit")]
    Word {
        name: String,
        description: String,
        owner: String,
        words: Vec<WordItem>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stars: Option<Vec<WordItem>>,
    },
    /// Sentence unit, words grouped into titled sections.
    #[serde(rename = "sentence")]
    Sentence {
        name: String,
        description: String,
        owner: String,
        words: Vec<SentenceSection>,
    },
    /// Synthetic unit backed by the wrong-word retry pool.
    #[serde(rename = "wrong-words")]
    WrongWords {
        name: String,
        description: String,
        owner: String,
        words: Vec<WordItem>,
    },
}

impl Unit {
    pub fn owner(&self) -> &str {
        match self {
            Unit::Word { owner, .. }
            | Unit::Sentence { owner, .. }
            | Unit::WrongWords { owner, .. } => owner,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Unit::Word { name, .. }
            | Unit::Sentence { name, .. }
            | Unit::WrongWords { name, .. } => name,
        }
    }
}

/// One tracked mistake in the wrong-word retry pool.
///
/// Field names serialize in the legacy camelCase storage format so the
/// persisted map round-trips against data written by earlier versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongWordEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Consecutive correct answers since the last miss.
    #[serde(rename = "correctCount", default)]
    pub correct_count: u32,
    #[serde(default)]
    pub owner: String,
}

impl WrongWordEntry {
    pub fn new(word: &WordItem, owner: &str) -> Self {
        Self {
            name: word.name.clone(),
            description: word.description.clone(),
            correct_count: 0,
            owner: owner.to_string(),
        }
    }
}
