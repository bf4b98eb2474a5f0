use once_cell::sync::Lazy;
use regex::Regex;

/// Separator placed between translated sentences of one paragraph
pub const SENTENCE_SEPARATOR: &str = ". ";
/// Separator placed between paragraphs
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

static ENGLISH_TERMINATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]+").expect("sentence terminator pattern is valid")
});

static HINDI_TERMINATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[।.!?]+").expect("sentence terminator pattern is valid")
});

fn split_on(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split English text into sentences on runs of `.`, `!` or `?`.
/// Terminators are consumed; empty segments are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    split_on(&ENGLISH_TERMINATORS, text)
}

/// Split Hindi text into sentences, additionally recognising the danda (`।`)
pub fn split_hindi_sentences(text: &str) -> Vec<String> {
    split_on(&HINDI_TERMINATORS, text)
}

/// Split a document into paragraphs (on a blank line) and each paragraph into sentences.
///
/// Paragraphs that contain no sentence at all are dropped, so the result never holds an
/// empty inner vector.
pub fn segment_document(text: &str) -> Vec<Vec<String>> {
    text.replace("\r\n", "\n")
        .split(PARAGRAPH_SEPARATOR)
        .map(split_sentences)
        .filter(|sentences| !sentences.is_empty())
        .collect()
}

/// Rejoin the sentences of one paragraph. Lossy: original terminators are not restored.
pub fn join_sentences<S: AsRef<str>>(sentences: &[S]) -> String {
    sentences
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(SENTENCE_SEPARATOR)
}

/// Rejoin paragraphs with a blank line
pub fn join_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> String {
    paragraphs
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}
