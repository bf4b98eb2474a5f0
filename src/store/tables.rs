use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized English token to Hindi token
pub type WordMap = BTreeMap<String, String>;

/// Normalized English phrase or whole sentence to Hindi text
pub type PhraseMap = BTreeMap<String, String>;

/// One labeled example. Both sides are trimmed and non-empty once accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPair {
    pub english: String,
    pub hindi: String,
}

impl TrainingPair {
    pub fn new(english: impl Into<String>, hindi: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            hindi: hindi.into(),
        }
    }
}

/// The lookup tables consulted by translation.
///
/// Ordered maps keep the persisted documents byte-stable across rebuilds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTables {
    pub word_map: WordMap,
    pub phrase_map: PhraseMap,
}

impl LookupTables {
    pub fn new(word_map: WordMap, phrase_map: PhraseMap) -> Self {
        Self { word_map, phrase_map }
    }

    pub fn word(&self, token: &str) -> Option<&str> {
        self.word_map.get(token).map(String::as_str)
    }

    pub fn phrase(&self, key: &str) -> Option<&str> {
        self.phrase_map.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.word_map.clear();
        self.phrase_map.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.word_map.is_empty() && self.phrase_map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear() {
        let mut tables = LookupTables::default();
        tables.phrase_map.insert("good morning".to_string(), "सुप्रभात".to_string());
        assert!(!tables.is_empty());
        tables.clear();
        assert!(tables.is_empty());
    }
}
