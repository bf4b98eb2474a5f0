use super::normalize::tokenize;

/// Generate contiguous token spans of `min_len..=max_len` tokens from `sentence`.
///
/// Spans are emitted by increasing length, then by starting offset. Callers that want
/// longest-first matching must sort the result themselves.
pub fn extract_phrases(sentence: &str, min_len: usize, max_len: usize) -> Vec<String> {
    let tokens = tokenize(sentence);
    let upper = max_len.min(tokens.len());
    let lower = min_len.max(1);

    let mut phrases = Vec::new();
    for len in lower..=upper {
        for window in tokens.windows(len) {
            phrases.push(window.join(" "));
        }
    }
    phrases
}

/// Token count of an already normalized phrase
pub fn phrase_len(phrase: &str) -> usize {
    phrase.split_whitespace().count()
}
