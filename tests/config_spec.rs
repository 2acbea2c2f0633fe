use std::error::Error;
use std::fs;

use tempfile::TempDir;

use humanizer::config::{
    load_config_from_file, load_config_or_default, AnnotatorKind, CasingMode, PaddingPolicy,
    SimilarityKind,
};
use humanizer::error::ConfigError;

#[test]
fn missing_file_falls_back_to_defaults() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let config = load_config_or_default(&dir.path().join("absent.toml"))?;
    assert_eq!(config.chunking.max_words, 2000);
    assert_eq!(config.similarity.kind, SimilarityKind::Hashed);
    Ok(())
}

#[test]
fn explicit_missing_file_is_a_read_error() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let err = load_config_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    Ok(())
}

#[test]
fn bundled_sample_config_loads() -> Result<(), Box<dyn Error>> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("humanizer.toml");
    let config = load_config_from_file(&path)?;
    assert_eq!(config.reconcile.tolerance, 20);
    assert_eq!(config.casing.mode, CasingMode::Sentence);
    Ok(())
}

#[test]
fn full_file_overrides_every_section() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("humanizer.toml");
    fs::write(
        &path,
        r#"
[generator]
model = "gemini-2.0-flash"
api_key_env = "MY_KEY"

[chunking]
max_words = 500

[input]
max_words = 500
reject_markup = false

[noise]
drop_function_word = 0.0
typo = 0.01

[reconcile]
tolerance = 10
padding = "filler"

[casing]
mode = "first_letter"

[[lexicon.extra_contractions]]
from = '\bit is\b'
to = "it's"

[annotator]
kind = "http"
endpoint = "http://localhost:9000/annotate"
organizations = ["Acme"]

[similarity]
kind = "none"
"#,
    )?;

    let config = load_config_from_file(&path)?;
    assert_eq!(config.generator.model, "gemini-2.0-flash");
    assert_eq!(config.generator.api_key_env, "MY_KEY");
    assert_eq!(config.generator.timeout_secs, 120);
    assert_eq!(config.chunking.max_words, 500);
    assert_eq!(config.input.max_words, Some(500));
    assert!(!config.input.reject_markup);
    assert_eq!(config.noise.drop_function_word, 0.0);
    assert_eq!(config.noise.repeat_word, 0.03);
    assert_eq!(config.reconcile.padding, PaddingPolicy::Filler);
    assert_eq!(config.casing.mode, CasingMode::FirstLetter);
    assert_eq!(config.lexicon.extra_contractions[0].to, "it's");
    assert_eq!(config.annotator.kind, AnnotatorKind::Http);
    assert_eq!(config.similarity.kind, SimilarityKind::None);
    Ok(())
}

#[test]
fn malformed_toml_reports_the_path() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[chunking\nmax_words = ")?;
    let err = load_config_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
    Ok(())
}

#[test]
fn zero_chunk_size_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("zero.toml");
    fs::write(&path, "[chunking]\nmax_words = 0\n")?;
    assert!(matches!(load_config_from_file(&path), Err(ConfigError::Invalid(_))));
    Ok(())
}
