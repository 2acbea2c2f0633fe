//*** START FILE: src/types/text_data.rs ***//
use serde::{Deserialize, Serialize};

use crate::parsing::{count_words, split_paragraphs};

/// Input text as an ordered list of non-empty paragraphs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub paragraphs: Vec<String>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Document { paragraphs: split_paragraphs(text) }
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn word_count(&self) -> usize {
        self.paragraphs.iter().map(|p| count_words(p)).sum()
    }
}

/// A word-bounded slice of the filtered input, sent to the generator as one unit.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
    pub word_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    Org,
    Date,
    Person,
    Place,
    Other,
}

impl EntityKind {
    /// Maps spaCy-style labels. Labels the rewriter never looks at collapse to `Other`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "" => None,
            "ORG" => Some(EntityKind::Org),
            "DATE" => Some(EntityKind::Date),
            "PERSON" => Some(EntityKind::Person),
            "GPE" | "LOC" => Some(EntityKind::Place),
            _ => Some(EntityKind::Other),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    Verb,
    Noun,
    Det,
    Num,
    Punct,
    #[default]
    Other,
}

impl PartOfSpeech {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "VERB" => PartOfSpeech::Verb,
            "NOUN" | "PROPN" => PartOfSpeech::Noun,
            "DET" => PartOfSpeech::Det,
            "NUM" => PartOfSpeech::Num,
            "PUNCT" => PartOfSpeech::Punct,
            _ => PartOfSpeech::Other,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Token {
    pub text: String,
    pub entity: Option<EntityKind>,
    pub lemma: String,
    pub pos: PartOfSpeech,
    /// Whether whitespace followed this token in the annotated text.
    pub space_after: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AnnotatedSentence {
    pub tokens: Vec<Token>,
}

/// What a humanize request hands back to its caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HumanizedResult {
    pub text: String,
    pub original_word_count: usize,
    pub humanized_word_count: usize,
    /// `None` when the filtered input had no words.
    pub retention_percent: Option<f64>,
    pub similarity: Option<f32>,
    pub chunk_count: usize,
}

pub fn retention_percent(original_words: usize, humanized_words: usize) -> Option<f64> {
    if original_words == 0 {
        return None;
    }
    Some(humanized_words as f64 / original_words as f64 * 100.0)
}

//*** END FILE: src/types/text_data.rs ***//
