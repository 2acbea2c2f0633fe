use crate::types::text_data::Chunk;

/// Separator placed between the outputs of consecutive chunks.
pub const CHUNK_OUTPUT_SEPARATOR: &str = "\n\n";

/// Splits text into consecutive runs of at most `max_words` whitespace-separated
/// words. A zero limit is treated as one. Empty text gives no chunks.
pub fn chunk_text(text: &str, max_words: usize) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(max_words.max(1))
        .enumerate()
        .map(|(index, slice)| Chunk { index, text: slice.join(" "), word_count: slice.len() })
        .collect()
}

/// Rebuilds the whitespace-normalized text the chunks were cut from.
pub fn join_chunks(chunks: &[Chunk]) -> String {
    chunks.iter().map(|chunk| chunk.text.as_str()).collect::<Vec<_>>().join(" ")
}

/// Joins per-chunk outputs into the final text, one blank line between them.
pub fn join_outputs<S: AsRef<str>>(outputs: &[S]) -> String {
    outputs.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(CHUNK_OUTPUT_SEPARATOR)
}
