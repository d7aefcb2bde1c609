use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed alignment document: {0}")]
    Json(#[from] serde_json::Error),
}

/// A forced-alignment result: the words of a transcript with their
/// phoneme-level timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    pub words: Vec<Word>,
}

/// One aligned word. `start` is in seconds from the beginning of the clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    /// The dictionary form the aligner matched, when it differs from `word`.
    #[serde(
        rename = "alignedWord",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub aligned_word: Option<String>,
    pub start: f64,
    pub phones: Vec<Phone>,
}

/// A single phoneme with its duration in seconds.
///
/// Codes carry a position suffix after an underscore (`hh_B`, `iy_E`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    pub phone: String,
    pub duration: f64,
}

impl Alignment {
    /// Load an alignment document from a JSON file.
    pub fn load_from_json(path: &Path) -> Result<Alignment, AlignmentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_json(&contents)
    }

    /// Parse an alignment document from a JSON string.
    pub fn parse_json(input: &str) -> Result<Alignment, AlignmentError> {
        Ok(serde_json::from_str(input)?)
    }

    /// The transcript as spoken, one word after another.
    pub fn spoken_words(&self) -> String {
        self.words
            .iter()
            .map(|w| w.word.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Word {
    /// The word text to show in diagnostics.
    pub fn display_text(&self) -> &str {
        self.aligned_word.as_deref().unwrap_or(&self.word)
    }
}
