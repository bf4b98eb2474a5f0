use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s]").expect("non-word pattern is valid")
});

/// Lowercase `text` and drop every character that is neither a word character nor whitespace.
///
/// Total and pure: any input yields a (possibly empty) key.
pub fn normalize(text: &str) -> String {
    NON_WORD.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Normalize and split on whitespace
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
