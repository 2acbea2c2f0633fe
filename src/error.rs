//! Error types for the humanizer library and binary.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no generator api key found in ${0}")]
    MissingApiKey(String),
    #[error("invalid generator endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("generator request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generator returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed generator response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("annotator request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("annotator returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed annotator response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("no embedding api key found in ${0}")]
    MissingApiKey(String),
    #[error("invalid embedding endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("embedding request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("embedding service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),
    #[error("embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },
}

/// Failures surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Humanize(#[from] HumanizeError),
    #[error("failed to encode result: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum HumanizeError {
    #[error("input text is empty")]
    EmptyInput,
    #[error("input contains markup or script tags")]
    MarkupRejected,
    #[error("generation failed for chunk {chunk}: {source}")]
    Generation {
        chunk: usize,
        #[source]
        source: GenerationError,
    },
    #[error("annotation failed for chunk {chunk}: {source}")]
    Annotation {
        chunk: usize,
        #[source]
        source: AnnotationError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
