use regex::{NoExpand, RegexBuilder};
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{Result, ShabdError};
use crate::store::{LookupStore, LookupTables};
use crate::text::{
    extract_phrases, join_paragraphs, join_sentences, normalize, segment_document,
};
use crate::text::phrases::phrase_len;

/// Phrase-based lookup translation over a shared [`LookupStore`].
///
/// Read-only: any number of translations may run in parallel with each other and with a
/// mutation of the store.
pub struct TranslationEngine {
    store: Arc<LookupStore>,
    min_phrase_len: usize,
    max_phrase_len: usize,
}

impl TranslationEngine {
    pub fn new(store: Arc<LookupStore>, config: &EngineConfig) -> Self {
        Self {
            store,
            min_phrase_len: config.min_phrase_len,
            max_phrase_len: config.max_phrase_len,
        }
    }

    /// Translate a whole document.
    ///
    /// With `preserve_formatting` the paragraph structure is kept (blank line between
    /// paragraphs); otherwise every sentence ends up in one paragraph. Sentences are always
    /// rejoined with `". "`, so the original punctuation does not survive.
    pub fn translate(&self, text: &str, preserve_formatting: bool) -> Result<String> {
        if text.trim().is_empty() {
            return Err(ShabdError::EmptyInput);
        }

        let tables = self.store.snapshot();
        let paragraphs: Vec<Vec<String>> = segment_document(text)
            .iter()
            .map(|sentences| {
                sentences
                    .iter()
                    .map(|sentence| self.translate_sentence(&tables, sentence))
                    .collect()
            })
            .collect();

        debug!("Translated {} paragraphs", paragraphs.len());

        if preserve_formatting {
            let rendered: Vec<String> = paragraphs.iter().map(|p| join_sentences(p)).collect();
            Ok(join_paragraphs(&rendered))
        } else {
            let flattened: Vec<String> = paragraphs.into_iter().flatten().collect();
            Ok(join_sentences(&flattened))
        }
    }

    /// Translate one sentence: whole-sentence hit, else longest-first phrase substitution
    /// followed by word-by-word lookup.
    pub fn translate_sentence(&self, tables: &LookupTables, sentence: &str) -> String {
        if let Some(target) = tables.phrase(&normalize(sentence)) {
            debug!("Sentence hit: {}", sentence);
            return target.to_string();
        }

        // Substitutions accumulate on the lowercased copy; original casing is not restored
        // and a shorter phrase may match inside text a longer phrase already rewrote.
        let mut working = sentence.to_lowercase();

        let mut candidates = extract_phrases(sentence, self.min_phrase_len, self.max_phrase_len);
        candidates.sort_by_key(|phrase| Reverse(phrase_len(phrase)));

        for candidate in &candidates {
            if let Some(target) = tables.phrase(candidate) {
                working = replace_ignore_case(&working, candidate, target);
            }
        }

        working
            .split_whitespace()
            .map(|token| tables.word(&normalize(token)).unwrap_or(token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> String {
    match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern.replace_all(haystack, NoExpand(replacement)).into_owned(),
        Err(_) => haystack.replace(needle, replacement),
    }
}
