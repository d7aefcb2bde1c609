/// Transition table: the actions that drive each morph set on the face.
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::core::document::{DocumentError, IdPath};
use crate::schema::timing::RESET;
use crate::schema::trigger::Trigger;

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("morph pattern document: {0}")]
    Document(#[from] DocumentError),
}

/// Where the morph pattern keeps its triggers, one per morph set.
pub fn morph_pattern_path() -> IdPath {
    IdPath::new()
        .child("atoms", "AnimationPattern")
        .child("storables", "AnimationPattern")
}

#[derive(Debug, Deserialize)]
struct PatternStorable {
    #[serde(default)]
    triggers: Vec<Trigger>,
}

/// Morph set name → transition actions, copied verbatim into output triggers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionTable {
    actions: FxHashMap<String, Vec<Value>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, morph_set: impl Into<String>, actions: Vec<Value>) {
        self.actions.insert(morph_set.into(), actions);
    }

    /// Load the table from a morph-pattern document on disk.
    pub fn load_from_json(path: &Path) -> Result<TransitionTable, TransitionError> {
        let contents = std::fs::read_to_string(path)?;
        let document: Value = serde_json::from_str(&contents)?;
        Self::from_morph_pattern(&document)
    }

    /// Collect the triggers of a morph-pattern document into a table keyed by
    /// display name. A later trigger with the same name replaces an earlier one.
    pub fn from_morph_pattern(document: &Value) -> Result<TransitionTable, TransitionError> {
        let storable: PatternStorable = morph_pattern_path().extract(document)?;
        let mut table = TransitionTable::new();
        for trigger in storable.triggers {
            table.insert(
                trigger.display_name,
                trigger.transition_actions.unwrap_or_default(),
            );
        }
        Ok(table)
    }

    pub fn get(&self, morph_set: &str) -> Option<&[Value]> {
        self.actions.get(morph_set).map(Vec::as_slice)
    }

    pub fn contains(&self, morph_set: &str) -> bool {
        self.actions.contains_key(morph_set)
    }

    pub fn has_reset(&self) -> bool {
        self.contains(RESET)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
