//! Semantic similarity between the input and the humanized text. Used for
//! reporting only; nothing here feeds back into the rewriting passes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::{json, Value};

use crate::annotation::truncate;
use crate::config::{Config, SimilarityKind};
use crate::error::SimilarityError;
use crate::generation::{read_api_key, resolve_endpoint};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

pub const HASHED_DIMENSIONS: usize = 256;

pub trait SimilarityScorer: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, SimilarityError>;
}

/// Cosine of the angle between two vectors, clamped to [-1, 1]. A zero vector
/// has no direction and scores 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch { left: a.len(), right: b.len() });
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

pub fn similarity_between(
    scorer: &dyn SimilarityScorer,
    original: &str,
    humanized: &str,
) -> Result<f32, SimilarityError> {
    let left = scorer.embed(original)?;
    let right = scorer.embed(humanized)?;
    cosine_similarity(&left, &right)
}

/// Picks the scorer named in `[similarity]`; `None` disables scoring.
pub fn build_scorer(config: &Config) -> Result<Option<Box<dyn SimilarityScorer>>, SimilarityError> {
    match config.similarity.kind {
        SimilarityKind::None => Ok(None),
        SimilarityKind::Hashed => Ok(Some(Box::new(HashedEmbedder::default()))),
        SimilarityKind::Gemini => Ok(Some(Box::new(GeminiEmbedder::from_config(config)?))),
    }
}

/// Offline bag-of-words embedding: lower-cased words hashed into a fixed
/// number of buckets.
#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimensions: usize,
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        HashedEmbedder { dimensions: HASHED_DIMENSIONS }
    }
}

impl SimilarityScorer for HashedEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, SimilarityError> {
        let mut vector = vec![0.0f32; self.dimensions];
        for word in WORD.find_iter(text) {
            let mut hasher = DefaultHasher::new();
            word.as_str().to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() % self.dimensions as u64) as usize] += 1.0;
        }
        Ok(vector)
    }
}

// --- Gemini embeddings ---

#[derive(Debug, Clone)]
pub struct GeminiEmbedder {
    client: Client,
    url: Url,
    model: String,
}

impl GeminiEmbedder {
    /// Shares the generator's endpoint and API key; the model comes from `[similarity]`.
    pub fn from_config(config: &Config) -> Result<Self, SimilarityError> {
        let generator = &config.generator;
        let api_key = read_api_key(&generator.api_key_env)
            .ok_or_else(|| SimilarityError::MissingApiKey(generator.api_key_env.clone()))?;
        let model = config.similarity.model.clone();
        let url = resolve_endpoint(&generator.endpoint, &model, "embedContent", &api_key)
            .map_err(SimilarityError::InvalidEndpoint)?;
        let client = Client::builder().timeout(Duration::from_secs(generator.timeout_secs)).build()?;
        Ok(GeminiEmbedder { client, url, model })
    }
}

impl SimilarityScorer for GeminiEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, SimilarityError> {
        let payload = json!({
            "model": format!("models/{}", self.model),
            "content": { "parts": [ { "text": text } ] }
        });
        let response = self.client.post(self.url.clone()).json(&payload).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(SimilarityError::Status { status: status.as_u16(), body: truncate(&body, 320) });
        }
        let body: Value = serde_json::from_str(&body)
            .map_err(|e| SimilarityError::MalformedResponse(e.to_string()))?;
        parse_embedding(&body)
    }
}

fn parse_embedding(body: &Value) -> Result<Vec<f32>, SimilarityError> {
    let values = body["embedding"]["values"].as_array().ok_or_else(|| {
        SimilarityError::MalformedResponse("response has no embedding values".to_string())
    })?;
    values
        .iter()
        .map(|value| {
            value.as_f64().map(|v| v as f32).ok_or_else(|| {
                SimilarityError::MalformedResponse(format!("non-numeric embedding value {}", value))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.5, 1.0, -2.0];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_opposite_vectors_is_minus_one() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn mismatched_dimensions_are_an_error() {
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(SimilarityError::DimensionMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn hashed_embedding_tracks_word_overlap() {
        let embedder = HashedEmbedder::default();
        let same = similarity_between(&embedder, "The cat sat", "the CAT sat").unwrap();
        assert!((same - 1.0).abs() < 1e-6);
        let related = similarity_between(&embedder, "the cat sat on the mat", "the cat sat down").unwrap();
        let unrelated = similarity_between(&embedder, "the cat sat on the mat", "quantum flux").unwrap();
        assert!(related > unrelated);
    }

    #[test]
    fn parses_embedding_values() {
        let body = json!({ "embedding": { "values": [0.25, -1.0] } });
        assert_eq!(parse_embedding(&body).unwrap(), vec![0.25, -1.0]);
        assert!(parse_embedding(&json!({})).is_err());
    }
}
