//*** START FILE: src/parsing/sentences.rs ***//
use once_cell::sync::Lazy;
use regex::Regex;

// Terminal punctuation followed by a run of spaces. Newlines never end a sentence here.
static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?] +").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Splits text into sentences. The terminal punctuation stays attached to its
/// sentence and the spaces after it are dropped.
///
/// Always returns at least one element; empty input gives `[""]`.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        // the punctuation mark is a single ASCII byte
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&text[start..]);
    sentences
}

/// Splits on sentence breaks but keeps the breaks themselves, so the result
/// alternates text, break, text, ... and always has odd length.
pub fn split_with_delimiters(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        segments.push(&text[start..m.start()]);
        segments.push(m.as_str());
        start = m.end();
    }
    segments.push(&text[start..]);
    segments
}

/// Counts runs of word characters. Contractions count twice ("isn't" -> isn, t).
pub fn count_words(text: &str) -> usize {
    WORD.find_iter(text).count()
}

/// Trimmed, non-empty lines of the input.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    text.trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps at most `max_words` whitespace-separated words. Text under the limit
/// is returned untouched, including its line breaks.
pub fn limit_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max_words {
        words[..max_words].join(" ")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_punctuation_with_sentence() {
        let sentences = split_sentences("One two. Three four!  Five? six");
        assert_eq!(sentences, vec!["One two.", "Three four!", "Five?", "six"]);
    }

    #[test]
    fn newline_is_not_a_sentence_break() {
        assert_eq!(split_sentences("First.\nSecond."), vec!["First.\nSecond."]);
    }

    #[test]
    fn empty_text_yields_single_empty_sentence() {
        assert_eq!(split_sentences(""), vec![""]);
    }

    #[test]
    fn delimiters_alternate_with_text() {
        let parts = split_with_delimiters("a. b! c");
        assert_eq!(parts, vec!["a", ". ", "b", "! ", "c"]);
    }

    #[test]
    fn counts_contraction_parts_separately() {
        assert_eq!(count_words("It isn't over, 42 times."), 6);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn paragraphs_skip_blank_lines() {
        let paragraphs = split_paragraphs("\n  first line \n\n second\n");
        assert_eq!(paragraphs, vec!["first line", "second"]);
    }

    #[test]
    fn limit_words_only_truncates_long_text() {
        assert_eq!(limit_words("a b\nc", 5), "a b\nc");
        assert_eq!(limit_words("a b\nc d", 3), "a b c");
    }
}
//*** END FILE: src/parsing/sentences.rs ***//
