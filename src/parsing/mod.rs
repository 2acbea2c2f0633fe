//*** START FILE: src/parsing/mod.rs ***//
pub mod sentences;

// Re-export the segmentation helpers every pass relies on
pub use sentences::{
    count_words, limit_words, normalize_whitespace, split_paragraphs, split_sentences,
    split_with_delimiters,
};
//*** END FILE: src/parsing/mod.rs ***//
