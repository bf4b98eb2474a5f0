use std::collections::HashSet;

use crate::config::TrainingConfig;
use crate::store::WordMap;

/// Proposes word-level mappings for one training pair.
///
/// Implementations receive the normalized English tokens, the whitespace-split Hindi tokens
/// and the word map as it stands before this pair, and return `(english, hindi)` entries to
/// insert in order.
#[cfg_attr(test, mockall::automock)]
pub trait Aligner: Send + Sync {
    fn align(&self, english: &[String], hindi: &[String], word_map: &WordMap) -> Vec<(String, String)>;
}

/// One-to-one positional alignment.
///
/// Each English token without a word mapping takes the first Hindi token of the pair that is
/// not yet any word's target. This is an approximation: it has no notion of word order
/// differences and gives no correctness guarantee for reordering-heavy sentences.
#[derive(Debug, Clone)]
pub struct NaivePositionalAligner {
    max_tokens: usize,
    max_difference: usize,
}

impl NaivePositionalAligner {
    pub fn new(max_tokens: usize, max_difference: usize) -> Self {
        Self { max_tokens, max_difference }
    }

    pub fn from_config(config: &TrainingConfig) -> Self {
        Self::new(config.max_alignment_tokens, config.max_token_difference)
    }

    fn is_alignable(&self, english_len: usize, hindi_len: usize) -> bool {
        english_len <= self.max_tokens
            && hindi_len <= self.max_tokens
            && english_len.abs_diff(hindi_len) <= self.max_difference
    }
}

impl Default for NaivePositionalAligner {
    fn default() -> Self {
        Self::from_config(&TrainingConfig::default())
    }
}

impl Aligner for NaivePositionalAligner {
    fn align(&self, english: &[String], hindi: &[String], word_map: &WordMap) -> Vec<(String, String)> {
        if !self.is_alignable(english.len(), hindi.len()) {
            return Vec::new();
        }

        let mut used: HashSet<&str> = word_map.values().map(String::as_str).collect();
        let mut mapped: HashSet<&str> = HashSet::new();
        let mut alignments = Vec::new();

        for token in english {
            if word_map.contains_key(token) || mapped.contains(token.as_str()) {
                continue;
            }

            if let Some(target) = hindi.iter().find(|h| !used.contains(h.as_str())) {
                used.insert(target.as_str());
                mapped.insert(token.as_str());
                alignments.push((token.clone(), target.clone()));
            }
        }

        alignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_positional_alignment() {
        let aligner = NaivePositionalAligner::default();
        let alignments = aligner.align(&tokens("hello world"), &tokens("नमस्ते दुनिया"), &WordMap::new());
        assert_eq!(
            alignments,
            vec![
                ("hello".to_string(), "नमस्ते".to_string()),
                ("world".to_string(), "दुनिया".to_string()),
            ]
        );
    }

    #[test]
    fn test_known_words_and_used_targets_are_skipped() {
        let aligner = NaivePositionalAligner::default();
        let mut word_map = WordMap::new();
        word_map.insert("hello".to_string(), "नमस्ते".to_string());

        let alignments = aligner.align(&tokens("hello friend"), &tokens("नमस्ते मित्र"), &word_map);
        assert_eq!(alignments, vec![("friend".to_string(), "मित्र".to_string())]);
    }

    #[test]
    fn test_runs_out_of_hindi_tokens() {
        let aligner = NaivePositionalAligner::default();
        let alignments = aligner.align(&tokens("the big red car"), &tokens("बड़ी लाल"), &WordMap::new());
        assert_eq!(alignments.len(), 2);
        assert_eq!(alignments[0], ("the".to_string(), "बड़ी".to_string()));
        assert_eq!(alignments[1], ("big".to_string(), "लाल".to_string()));
    }

    #[test]
    fn test_repeated_english_token_maps_once() {
        let aligner = NaivePositionalAligner::default();
        let alignments = aligner.align(&tokens("no no no"), &tokens("नहीं नहीं नहीं"), &WordMap::new());
        assert_eq!(alignments, vec![("no".to_string(), "नहीं".to_string())]);
    }

    #[test]
    fn test_length_limits() {
        let aligner = NaivePositionalAligner::default();
        let long = tokens("a b c d e f g h i j k");
        assert!(aligner.align(&long, &long, &WordMap::new()).is_empty());

        let short = tokens("a");
        let five = tokens("क ख ग घ ङ");
        assert!(aligner.align(&short, &five, &WordMap::new()).is_empty());

        let four = tokens("क ख ग घ");
        assert_eq!(aligner.align(&short, &four, &WordMap::new()).len(), 1);
    }
}
