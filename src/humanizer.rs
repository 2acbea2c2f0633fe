//*** START FILE: src/humanizer.rs ***//
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::annotation::build_annotator;
use crate::config::{ChunkingConfig, Config, InputConfig};
use crate::error::{AnnotationError, HumanizeError};
use crate::generation::{build_prompt, Generator};
use crate::parsing::{count_words, limit_words};
use crate::rewriting::{
    chunk_text, join_outputs, remove_equations_and_graphs, LengthReconciler, PostprocessPipeline,
    RandomSource, Reconciled,
};
use crate::similarity::{build_scorer, similarity_between, SimilarityScorer};
use crate::types::text_data::{retention_percent, Document, HumanizedResult};

// Script blocks or anything that looks like a tag.
static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<\s*script.*?>.*?<\s*/\s*script\s*>|<[^>]+>").unwrap());

/// Runs a whole request: validation, filtering, chunking, generation, the
/// post-processing passes and length reconciliation for every chunk, then the metrics.
pub struct Humanizer {
    generator: Box<dyn Generator>,
    pipeline: PostprocessPipeline,
    reconciler: LengthReconciler,
    scorer: Option<Box<dyn SimilarityScorer>>,
    chunking: ChunkingConfig,
    input: InputConfig,
}

impl Humanizer {
    pub fn new(
        generator: Box<dyn Generator>,
        pipeline: PostprocessPipeline,
        reconciler: LengthReconciler,
    ) -> Self {
        Humanizer {
            generator,
            pipeline,
            reconciler,
            scorer: None,
            chunking: ChunkingConfig::default(),
            input: InputConfig::default(),
        }
    }

    /// Wires every pass from the loaded configuration. A similarity scorer that
    /// cannot be built only disables scoring.
    pub fn from_config(config: &Config, generator: Box<dyn Generator>) -> Result<Self, HumanizeError> {
        config.validate()?;
        let annotator = build_annotator(&config.annotator)?;
        let pipeline = PostprocessPipeline::from_config(config, Arc::from(annotator))?;
        let scorer = match build_scorer(config) {
            Ok(scorer) => scorer,
            Err(e) => {
                warn!(error = %e, "similarity scoring disabled");
                None
            }
        };
        Ok(Humanizer {
            generator,
            pipeline,
            reconciler: LengthReconciler::new(config.reconcile.clone()),
            scorer,
            chunking: config.chunking.clone(),
            input: config.input.clone(),
        })
    }

    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_input(mut self, input: InputConfig) -> Self {
        self.input = input;
        self
    }

    /// Rejects empty input and markup, then applies the optional word limit.
    pub fn prepare_input(&self, raw: &str) -> Result<String, HumanizeError> {
        if raw.trim().is_empty() {
            return Err(HumanizeError::EmptyInput);
        }
        if self.input.reject_markup && MARKUP.is_match(raw) {
            return Err(HumanizeError::MarkupRejected);
        }
        Ok(match self.input.max_words {
            Some(limit) => limit_words(raw, limit),
            None => raw.to_string(),
        })
    }

    pub fn humanize<R: RandomSource + ?Sized>(
        &self,
        raw: &str,
        rng: &mut R,
    ) -> Result<HumanizedResult, HumanizeError> {
        let prepared = self.prepare_input(raw)?;
        let cleaned = remove_equations_and_graphs(&prepared);
        let document = Document::parse(&cleaned);
        let chunks = chunk_text(&cleaned, self.chunking.max_words);
        info!(
            paragraphs = document.paragraph_count(),
            words = document.word_count(),
            chunks = chunks.len(),
            "humanize request"
        );

        let mut outputs = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let generated = self
                .generator
                .generate(&build_prompt(&chunk.text))
                .map_err(|source| HumanizeError::Generation { chunk: chunk.index, source })?;
            let reconciled = self
                .postprocess_chunk(&chunk.text, generated.trim(), rng)
                .map_err(|source| HumanizeError::Annotation { chunk: chunk.index, source })?;
            info!(
                chunk = chunk.index,
                original = chunk.word_count,
                delta = reconciled.delta,
                "chunk humanized"
            );
            outputs.push(reconciled.text.trim().to_string());
        }

        let text = join_outputs(&outputs);
        let original_word_count = count_words(&cleaned);
        let humanized_word_count = count_words(&text);
        let retention = retention_percent(original_word_count, humanized_word_count);
        let similarity = self.score(&cleaned, &text);

        info!(original_word_count, humanized_word_count, "word counts");
        match retention {
            Some(percent) => info!("word retention: {:.2}%", percent),
            None => info!("word retention undefined: no words in input"),
        }
        if let Some(score) = similarity {
            info!("cosine similarity: {:.4}", score);
        }

        Ok(HumanizedResult {
            text,
            original_word_count,
            humanized_word_count,
            retention_percent: retention,
            similarity,
            chunk_count: chunks.len(),
        })
    }

    /// The local passes for one chunk: the pipeline on the generated text, then
    /// length reconciliation against the chunk it came from.
    pub fn postprocess_chunk<R: RandomSource + ?Sized>(
        &self,
        chunk: &str,
        generated: &str,
        rng: &mut R,
    ) -> Result<Reconciled, AnnotationError> {
        let processed = self.pipeline.run(generated, rng)?;
        Ok(self.reconciler.reconcile(chunk, &processed))
    }

    /// Runs the local passes over text without calling the generator. Each
    /// chunk is its own reference for reconciliation.
    pub fn postprocess_only<R: RandomSource + ?Sized>(
        &self,
        raw: &str,
        rng: &mut R,
    ) -> Result<String, HumanizeError> {
        let prepared = self.prepare_input(raw)?;
        let cleaned = remove_equations_and_graphs(&prepared);
        let mut outputs = Vec::new();
        for chunk in chunk_text(&cleaned, self.chunking.max_words) {
            let reconciled = self
                .postprocess_chunk(&chunk.text, &chunk.text, rng)
                .map_err(|source| HumanizeError::Annotation { chunk: chunk.index, source })?;
            debug!(chunk = chunk.index, delta = reconciled.delta, "chunk post-processed");
            outputs.push(reconciled.text.trim().to_string());
        }
        Ok(join_outputs(&outputs))
    }

    fn score(&self, original: &str, humanized: &str) -> Option<f32> {
        let scorer = self.scorer.as_deref()?;
        if humanized.trim().is_empty() {
            return None;
        }
        match similarity_between(scorer, original, humanized) {
            Ok(score) => Some(score),
            Err(e) => {
                warn!(error = %e, "similarity scoring failed");
                None
            }
        }
    }
}

//*** END FILE: src/humanizer.rs ***//
