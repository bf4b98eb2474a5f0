use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Result, ShabdError};
use crate::store::{LookupStore, LookupTables, TrainingPair};
use crate::text::{normalize, split_hindi_sentences, split_sentences, tokenize};
use super::align::Aligner;

/// A training pair as submitted by a caller; either side may be absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrainingPair {
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub hindi: Option<String>,
}

impl RawTrainingPair {
    pub fn new(english: impl Into<String>, hindi: impl Into<String>) -> Self {
        Self {
            english: Some(english.into()),
            hindi: Some(hindi.into()),
        }
    }

    /// Trim both sides, rejecting the pair when either is missing or blank
    pub fn validate(self) -> Result<TrainingPair> {
        let english = self.english.as_deref().map(str::trim).unwrap_or_default();
        let hindi = self.hindi.as_deref().map(str::trim).unwrap_or_default();

        match (english.is_empty(), hindi.is_empty()) {
            (true, _) => Err(ShabdError::MalformedPair("missing english text".to_string())),
            (_, true) => Err(ShabdError::MalformedPair("missing hindi text".to_string())),
            _ => Ok(TrainingPair::new(english, hindi)),
        }
    }
}

impl From<TrainingPair> for RawTrainingPair {
    fn from(pair: TrainingPair) -> Self {
        Self::new(pair.english, pair.hindi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestOutcome {
    /// Pairs appended to the corpus by this call
    pub accepted: usize,
    /// Pairs skipped because a side was missing or blank
    pub rejected: usize,
    /// Corpus size after the call
    pub corpus_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RebuildOutcome {
    pub word_map_size: usize,
    pub phrase_map_size: usize,
    pub corpus_size: usize,
}

/// Merge one accepted pair into `tables`.
///
/// Adds the whole-pair phrase, positional sentence phrases when both sides split into the
/// same number of sentences, and whatever word mappings `aligner` proposes. Never removes
/// an entry; later pairs may overwrite earlier targets.
pub fn merge_pair(tables: &mut LookupTables, pair: &TrainingPair, aligner: &dyn Aligner) {
    let whole_key = normalize(&pair.english);
    if !whole_key.is_empty() {
        tables.phrase_map.insert(whole_key.clone(), pair.hindi.clone());
    }

    let english_sentences = split_sentences(&pair.english);
    let hindi_sentences = split_hindi_sentences(&pair.hindi);
    if english_sentences.len() == hindi_sentences.len() {
        for (english, hindi) in english_sentences.iter().zip(hindi_sentences) {
            let key = normalize(english);
            // The whole-pair mapping keeps its original punctuation
            if key.is_empty() || key == whole_key {
                continue;
            }
            tables.phrase_map.insert(key, hindi);
        }
    } else {
        debug!(
            "Sentence counts differ ({} vs {}), skipping sentence pairing",
            english_sentences.len(),
            hindi_sentences.len()
        );
    }

    let english_tokens = tokenize(&pair.english);
    let hindi_tokens: Vec<String> = pair.hindi.split_whitespace().map(str::to_string).collect();
    for (english, hindi) in aligner.align(&english_tokens, &hindi_tokens, &tables.word_map) {
        tables.word_map.insert(english, hindi);
    }
}

/// Feeds labeled pairs into the shared [`LookupStore`] and keeps the corpus document.
pub struct TrainingIngestor {
    store: Arc<LookupStore>,
    aligner: Box<dyn Aligner>,
}

impl TrainingIngestor {
    pub fn new(store: Arc<LookupStore>, aligner: Box<dyn Aligner>) -> Self {
        Self { store, aligner }
    }

    /// Validate and merge a batch of pairs, then persist corpus and maps.
    ///
    /// Malformed pairs are skipped and counted, never fatal. A batch with nothing accepted
    /// leaves memory and disk untouched.
    pub fn add_pairs<I>(&self, pairs: I) -> Result<IngestOutcome>
    where
        I: IntoIterator<Item = RawTrainingPair>,
    {
        let writer = self.store.writer();
        let mut corpus = writer.documents().load_corpus()?.unwrap_or_default();
        let mut tables = LookupTables::clone(&writer.current());

        let mut accepted = 0;
        let mut rejected = 0;
        for raw in pairs {
            match raw.validate() {
                Ok(pair) => {
                    merge_pair(&mut tables, &pair, self.aligner.as_ref());
                    corpus.push(pair);
                    accepted += 1;
                }
                Err(e) => {
                    warn!("Skipping training pair: {}", e);
                    rejected += 1;
                }
            }
        }

        let outcome = IngestOutcome {
            accepted,
            rejected,
            corpus_size: corpus.len(),
        };

        if accepted == 0 {
            info!("No valid training pairs in batch ({} rejected)", rejected);
            return Ok(outcome);
        }

        let tables = writer.swap(tables);
        writer.documents().save_corpus(&corpus)?;
        writer.persist(&tables)?;

        info!(
            "Added {} training pairs ({} rejected), corpus now {} pairs, {} words, {} phrases",
            accepted,
            rejected,
            corpus.len(),
            tables.word_map.len(),
            tables.phrase_map.len()
        );
        Ok(outcome)
    }

    /// Discard both maps and replay the persisted corpus through [`merge_pair`].
    pub fn rebuild(&self) -> Result<RebuildOutcome> {
        let writer = self.store.writer();
        let corpus = writer
            .documents()
            .load_corpus()?
            .ok_or(ShabdError::MissingCorpus)?;

        info!("Rebuilding lookup tables from {} training pairs", corpus.len());

        let mut tables = LookupTables::default();
        for pair in corpus.iter().cloned() {
            match RawTrainingPair::from(pair).validate() {
                Ok(pair) => merge_pair(&mut tables, &pair, self.aligner.as_ref()),
                Err(e) => warn!("Skipping corpus entry during rebuild: {}", e),
            }
        }

        let tables = writer.publish(tables)?;
        let outcome = RebuildOutcome {
            word_map_size: tables.word_map.len(),
            phrase_map_size: tables.phrase_map.len(),
            corpus_size: corpus.len(),
        };

        info!(
            "Rebuild complete: {} words, {} phrases",
            outcome.word_map_size, outcome.phrase_map_size
        );
        Ok(outcome)
    }

    /// The persisted corpus, or `None` when it has never been written
    pub fn corpus(&self) -> Result<Option<Vec<TrainingPair>>> {
        self.store.documents().load_corpus()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::store::WordMap;
    use crate::training::align::{MockAligner, NaivePositionalAligner};

    fn store_in(dir: &std::path::Path) -> Arc<LookupStore> {
        Arc::new(LookupStore::new(&StoreConfig {
            data_dir: dir.to_path_buf(),
            ..StoreConfig::default()
        }))
    }

    fn naive(store: Arc<LookupStore>) -> TrainingIngestor {
        TrainingIngestor::new(store, Box::new(NaivePositionalAligner::default()))
    }

    #[test]
    fn test_validate_trims_and_rejects_blank_sides() {
        let pair = RawTrainingPair::new("  Hello  ", " नमस्ते ").validate().unwrap();
        assert_eq!(pair, TrainingPair::new("Hello", "नमस्ते"));

        let missing = RawTrainingPair {
            english: Some("Hello".to_string()),
            hindi: None,
        };
        assert!(matches!(missing.validate(), Err(ShabdError::MalformedPair(_))));
        assert!(RawTrainingPair::new("   ", "x").validate().is_err());
    }

    #[test]
    fn test_merge_pair_whole_sentence_keeps_punctuation() {
        let mut tables = LookupTables::default();
        let pair = TrainingPair::new("Hello world.", "नमस्ते दुनिया.");
        merge_pair(&mut tables, &pair, &NaivePositionalAligner::default());

        assert_eq!(tables.phrase("hello world"), Some("नमस्ते दुनिया."));
        assert_eq!(tables.word("hello"), Some("नमस्ते"));
        assert_eq!(tables.word("world"), Some("दुनिया."));
    }

    #[test]
    fn test_merge_pair_sentence_pairing() {
        let mut tables = LookupTables::default();
        let pair = TrainingPair::new("Good morning. Sit down!", "सुप्रभात। बैठ जाइए।");
        merge_pair(&mut tables, &pair, &NaivePositionalAligner::default());

        assert_eq!(tables.phrase("good morning sit down"), Some("सुप्रभात। बैठ जाइए।"));
        assert_eq!(tables.phrase("good morning"), Some("सुप्रभात"));
        assert_eq!(tables.phrase("sit down"), Some("बैठ जाइए"));
    }

    #[test]
    fn test_punctuation_only_english_adds_no_empty_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let ingestor = naive(Arc::clone(&store));

        let outcome = ingestor.add_pairs(vec![RawTrainingPair::new("???", "क्या")]).unwrap();
        assert_eq!(outcome.accepted, 1);
        assert!(store.snapshot().is_empty());

        // The pair stays in the corpus but never maps the empty key
        let rebuilt = ingestor.rebuild().unwrap();
        assert_eq!(rebuilt.corpus_size, 1);
        assert_eq!(rebuilt.phrase_map_size, 0);
        assert_eq!(store.snapshot().phrase(""), None);
    }

    #[test]
    fn test_merge_pair_skips_unequal_sentence_counts() {
        let mut tables = LookupTables::default();
        let pair = TrainingPair::new("One. Two.", "एक दो।");
        merge_pair(&mut tables, &pair, &NaivePositionalAligner::default());

        assert_eq!(tables.phrase_map.len(), 1);
        assert_eq!(tables.phrase("one two"), Some("एक दो।"));
    }

    #[test]
    fn test_merge_pair_uses_aligner_proposals() {
        let mut aligner = MockAligner::new();
        aligner
            .expect_align()
            .withf(|english: &[String], hindi: &[String], _: &WordMap| {
                english == ["apply", "online"] && hindi == ["ऑनलाइन", "आवेदन"]
            })
            .times(1)
            .returning(|_, _, _| vec![("apply".to_string(), "आवेदन".to_string())]);

        let mut tables = LookupTables::default();
        merge_pair(&mut tables, &TrainingPair::new("Apply online", "ऑनलाइन आवेदन"), &aligner);

        assert_eq!(tables.word_map.len(), 1);
        assert_eq!(tables.word("apply"), Some("आवेदन"));
    }

    #[test]
    fn test_add_pairs_counts_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let ingestor = naive(Arc::clone(&store));

        let outcome = ingestor
            .add_pairs(vec![
                RawTrainingPair::new("Thank you", "धन्यवाद"),
                RawTrainingPair {
                    english: Some("Hello".to_string()),
                    hindi: None,
                },
                RawTrainingPair::new("", "खाली"),
            ])
            .unwrap();

        assert_eq!(outcome, IngestOutcome { accepted: 1, rejected: 2, corpus_size: 1 });
        assert_eq!(store.snapshot().phrase("thank you"), Some("धन्यवाद"));
        assert_eq!(ingestor.corpus().unwrap().unwrap(), vec![TrainingPair::new("Thank you", "धन्यवाद")]);
        assert!(dir.path().join("word_map.json").exists());
        assert!(dir.path().join("phrase_map.json").exists());
    }

    #[test]
    fn test_add_pairs_with_nothing_valid_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = naive(store_in(dir.path()));

        let outcome = ingestor.add_pairs(vec![RawTrainingPair::default()]).unwrap();
        assert_eq!(outcome, IngestOutcome { accepted: 0, rejected: 1, corpus_size: 0 });
        assert!(ingestor.corpus().unwrap().is_none());
    }

    #[test]
    fn test_add_pairs_never_removes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let ingestor = naive(Arc::clone(&store));

        ingestor.add_pairs(vec![RawTrainingPair::new("Hello friend", "नमस्ते मित्र")]).unwrap();
        let before = store.snapshot();
        ingestor.add_pairs(vec![RawTrainingPair::new("Hello sir", "नमस्ते महोदय")]).unwrap();
        let after = store.snapshot();

        for (key, _) in before.word_map.iter() {
            assert!(after.word_map.contains_key(key));
        }
        for (key, _) in before.phrase_map.iter() {
            assert!(after.phrase_map.contains_key(key));
        }
        assert_eq!(after.word("sir"), Some("महोदय"));
    }

    #[test]
    fn test_rebuild_without_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let ingestor = naive(store_in(dir.path()));
        assert!(matches!(ingestor.rebuild(), Err(ShabdError::MissingCorpus)));
    }

    #[test]
    fn test_rebuild_matches_incremental_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let ingestor = naive(Arc::clone(&store));

        ingestor.add_pairs(vec![RawTrainingPair::new("Submit the form.", "फॉर्म जमा करें।")]).unwrap();
        ingestor.add_pairs(vec![RawTrainingPair::new("Read the notice.", "सूचना पढ़ें।")]).unwrap();
        let incremental = store.snapshot();

        let outcome = ingestor.rebuild().unwrap();
        assert_eq!(outcome.corpus_size, 2);
        assert_eq!(*store.snapshot(), *incremental);
        assert_eq!(outcome.word_map_size, incremental.word_map.len());
    }

    #[test]
    fn test_rebuild_drops_entries_not_backed_by_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let ingestor = naive(Arc::clone(&store));
        ingestor.add_pairs(vec![RawTrainingPair::new("Yes", "हाँ")]).unwrap();

        let mut stray = LookupTables::clone(&store.snapshot());
        stray.word_map.insert("stray".to_string(), "भटका".to_string());
        store.writer().publish(stray).unwrap();

        ingestor.rebuild().unwrap();
        assert_eq!(store.snapshot().word("stray"), None);
        assert_eq!(store.snapshot().phrase("yes"), Some("हाँ"));
    }
}
