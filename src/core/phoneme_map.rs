/// Phoneme → morph set lookup.
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhonemeMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Maps phoneme prefixes (`hh`, `iy`) to the morph set that shapes the mouth
/// for them. Phonemes without an entry have no visible shape and are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhonemeMap {
    entries: FxHashMap<String, String>,
}

impl PhonemeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, prefix: impl Into<String>, morph_set: impl Into<String>) {
        self.entries.insert(prefix.into(), morph_set.into());
    }

    /// Load a mapping table from a JSON object of `prefix: morph set` pairs.
    pub fn load_from_json(path: &Path) -> Result<PhonemeMap, PhonemeMapError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_json(&contents)
    }

    pub fn parse_json(input: &str) -> Result<PhonemeMap, PhonemeMapError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Morph set for a full aligner phoneme code such as `hh_B`.
    pub fn morph_set_for(&self, phoneme_code: &str) -> Option<&str> {
        self.entries
            .get(lookup_key(phoneme_code))
            .map(String::as_str)
    }

    /// Every distinct morph set the table can produce.
    pub fn morph_sets(&self) -> FxHashSet<&str> {
        self.entries.values().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PhonemeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = PhonemeMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// The mapping key of an aligner phoneme code: everything before the first
/// underscore. A code without an underscore is used whole.
pub fn lookup_key(phoneme_code: &str) -> &str {
    match phoneme_code.find('_') {
        Some(idx) => &phoneme_code[..idx],
        None => phoneme_code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_key_strips_suffix() {
        assert_eq!(lookup_key("hh_B"), "hh");
        assert_eq!(lookup_key("iy_E"), "iy");
        assert_eq!(lookup_key("ah_I_x"), "ah");
    }

    #[test]
    fn lookup_key_without_underscore_is_whole_code() {
        assert_eq!(lookup_key("sil"), "sil");
        assert_eq!(lookup_key(""), "");
        assert_eq!(lookup_key("_B"), "");
    }

    #[test]
    fn parse_and_lookup() {
        let map = PhonemeMap::parse_json(r#"{"HH": "aa", "IY": "ee"}"#).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.morph_set_for("HH_B"), Some("aa"));
        assert_eq!(map.morph_set_for("IY_E"), Some("ee"));
        assert_eq!(map.morph_set_for("IY"), Some("ee"));
        assert_eq!(map.morph_set_for("ZH_I"), None);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let map: PhonemeMap = [("hh", "aa")].into_iter().collect();
        assert_eq!(map.morph_set_for("hh_B"), Some("aa"));
        assert_eq!(map.morph_set_for("HH_B"), None);
    }

    #[test]
    fn morph_sets_deduplicated() {
        let map: PhonemeMap = [("aa", "ah"), ("ae", "ah"), ("iy", "ee")]
            .into_iter()
            .collect();
        let sets = map.morph_sets();
        assert_eq!(sets.len(), 2);
        assert!(sets.contains("ah"));
        assert!(sets.contains("ee"));
    }

    #[test]
    fn non_string_value_rejected() {
        assert!(PhonemeMap::parse_json(r#"{"aa": 1}"#).is_err());
    }
}
