//*** START FILE: src/rewriting/pipeline.rs ***//
use std::sync::Arc;

use tracing::debug;

use super::dictionary::SubstitutionTable;
use super::entity::EntityRewriter;
use super::lexical::LexicalRewriter;
use super::noise::{NoiseInjector, RandomSource};
use super::preprocessor::remove_subheadings;
use crate::annotation::Annotator;
use crate::config::{CasingMode, Config};
use crate::error::{AnnotationError, ConfigError};
use crate::parsing::split_with_delimiters;

const LEADING_JUNK: &[char] = &[' ', ')', '(', '[', ']', '!', ','];

/// The post-generation passes, always run in the same order.
#[derive(Debug, Clone, Default)]
pub struct PostprocessPipeline {
    lexical: LexicalRewriter,
    noise: NoiseInjector,
    entities: EntityRewriter,
    casing: CasingMode,
}

impl PostprocessPipeline {
    pub fn new(
        lexical: LexicalRewriter,
        noise: NoiseInjector,
        entities: EntityRewriter,
        casing: CasingMode,
    ) -> Self {
        PostprocessPipeline { lexical, noise, entities, casing }
    }

    pub fn from_config(config: &Config, annotator: Arc<dyn Annotator>) -> Result<Self, ConfigError> {
        let (simplifications, contractions) = SubstitutionTable::from_lexicon(&config.lexicon)?;
        Ok(PostprocessPipeline::new(
            LexicalRewriter::new(simplifications, contractions),
            NoiseInjector::new(config.noise.clone()),
            EntityRewriter::new(annotator),
            config.casing.mode,
        ))
    }

    pub fn run<R: RandomSource + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> Result<String, AnnotationError> {
        let text = remove_subheadings(text);
        debug!(len = text.len(), "subheadings removed");

        // --- Deterministic passes ---
        let text = self.lexical.simplify(&text);
        let text = self.lexical.apply_contractions(&text);
        debug!(len = text.len(), "lexical passes done");

        // --- Word and sentence noise ---
        let text = self.noise.drop_small_function_words(&text, rng);
        let text = self.noise.repeat_words_randomly(&text, rng);
        let text = self.noise.shuffle_words_small_chunks(&text, rng);
        let text = self.noise.vary_sentence_length(&text, rng);
        debug!(len = text.len(), "word noise done");

        let text = self.entities.rewrite_with_entities(&text)?;
        let text = self.noise.inject_typos_and_mistakes(&text, rng);
        debug!(len = text.len(), "entity rewrite and typos done");

        Ok(apply_casing(&text, self.casing))
    }
}

/// Final clean-up: strips stray leading punctuation, capitalizes the first letter
/// and the start of every sentence, then trims.
pub fn apply_casing(text: &str, mode: CasingMode) -> String {
    let text = text.trim_start_matches(LEADING_JUNK);
    let text = upper_first(text);
    let mut out = String::with_capacity(text.len());
    for (i, segment) in split_with_delimiters(&text).into_iter().enumerate() {
        if i % 2 == 0 {
            out.push_str(&capitalize(segment, mode));
        } else {
            out.push_str(segment);
        }
    }
    out.trim().to_string()
}

fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(segment: &str, mode: CasingMode) -> String {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let head = first.to_uppercase();
    match mode {
        CasingMode::Sentence => head.chain(chars.flat_map(char::to_lowercase)).collect(),
        CasingMode::FirstLetter => head.chain(chars).collect(),
    }
}

//*** END FILE: src/rewriting/pipeline.rs ***//
