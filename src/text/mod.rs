// Text processing primitives shared by translation and training
//
// - normalize: case folding and punctuation stripping for lookup keys
// - segment: paragraph and sentence splitting, plus the lossy rejoin rules
// - phrases: n-gram phrase candidates over normalized tokens

pub mod normalize;
pub mod segment;
pub mod phrases;

pub use normalize::{normalize, tokenize};
pub use phrases::extract_phrases;
pub use segment::{
    join_paragraphs, join_sentences, segment_document, split_hindi_sentences, split_sentences,
    PARAGRAPH_SEPARATOR, SENTENCE_SEPARATOR,
};
