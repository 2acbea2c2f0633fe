use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "humanizer.toml";

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub chunking: ChunkingConfig,
    pub input: InputConfig,
    pub noise: NoiseConfig,
    pub reconcile: ReconcileConfig,
    pub casing: CasingConfig,
    pub lexicon: LexiconConfig,
    pub annotator: AnnotatorConfig,
    pub similarity: SimilarityConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GeneratorConfig {
    pub model: String,
    pub endpoint: String,
    /// Environment variable holding the API key. `GEMINI_API_KEY` is tried when it is unset.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            api_key_env: "API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        ChunkingConfig { max_words: 2000 }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub max_words: Option<usize>,
    pub reject_markup: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig { max_words: None, reject_markup: true }
    }
}

/// Per-unit trigger probabilities for the randomized passes.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    pub drop_function_word: f64,
    pub repeat_word: f64,
    pub shuffle_sentence: f64,
    pub merge_sentence: f64,
    pub typo: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig {
            drop_function_word: 0.1,
            repeat_word: 0.03,
            shuffle_sentence: 0.25,
            merge_sentence: 0.6,
            typo: 0.005,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaddingPolicy {
    /// Appends one space, which leaves the word count unchanged.
    #[default]
    TrailingSpace,
    /// Appends short filler sentences until the shortfall is within tolerance.
    Filler,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ReconcileConfig {
    pub tolerance: usize,
    pub padding: PaddingPolicy,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        ReconcileConfig { tolerance: 20, padding: PaddingPolicy::TrailingSpace }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CasingMode {
    /// Upper-cases the first letter of each sentence and lower-cases the rest of it.
    #[default]
    Sentence,
    /// Upper-cases the first letter of each sentence and leaves the rest alone.
    FirstLetter,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct CasingConfig {
    pub mode: CasingMode,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LexiconConfig {
    /// Literal words or phrases, appended after the built-in simplifications.
    pub extra_simplifications: Vec<Substitution>,
    /// Regex patterns, appended after the built-in contractions.
    pub extra_contractions: Vec<Substitution>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnnotatorKind {
    #[default]
    Heuristic,
    Http,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AnnotatorConfig {
    pub kind: AnnotatorKind,
    pub endpoint: Option<String>,
    /// Organization names the heuristic annotator treats as ORG entities.
    pub organizations: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKind {
    None,
    #[default]
    Hashed,
    Gemini,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SimilarityConfig {
    pub kind: SimilarityKind,
    pub model: String,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        SimilarityConfig { kind: SimilarityKind::Hashed, model: "text-embedding-004".to_string() }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunking.max_words == 0 {
            return Err(ConfigError::Invalid("chunking.max_words must be at least 1".to_string()));
        }
        if self.input.max_words == Some(0) {
            return Err(ConfigError::Invalid("input.max_words must be at least 1".to_string()));
        }
        let probabilities = [
            ("noise.drop_function_word", self.noise.drop_function_word),
            ("noise.repeat_word", self.noise.repeat_word),
            ("noise.shuffle_sentence", self.noise.shuffle_sentence),
            ("noise.merge_sentence", self.noise.merge_sentence),
            ("noise.typo", self.noise.typo),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.annotator.kind == AnnotatorKind::Http && self.annotator.endpoint.is_none() {
            return Err(ConfigError::Invalid(
                "annotator.endpoint is required when annotator.kind = \"http\"".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config_from_file(file_path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(file_path).map_err(|source| ConfigError::Read {
        path: file_path.to_path_buf(),
        source,
    })?;
    Config::from_toml_str(&contents, file_path)
}

/// Loads `file_path` when it exists, otherwise falls back to the built-in defaults.
pub fn load_config_or_default(file_path: &Path) -> Result<Config, ConfigError> {
    if file_path.exists() {
        load_config_from_file(file_path)
    } else {
        Ok(Config::default())
    }
}
