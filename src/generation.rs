//*** START FILE: src/generation.rs ***//
use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::{json, Value};
use tracing::debug;

use crate::annotation::truncate;
use crate::config::GeneratorConfig;
use crate::error::GenerationError;

const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Rewrites a prompt into prose. Implementations must be usable from several threads.
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

impl<F> Generator for F
where
    F: Fn(&str) -> Result<String, GenerationError> + Send + Sync,
{
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self(prompt)
    }
}

/// The rewrite instructions sent ahead of every chunk.
pub fn build_prompt(chunk: &str) -> String {
    format!(
        "You rewrite text so it reads naturally and fluently while keeping the paragraph structure.

TASK:
- Rewrite each paragraph so it sounds smooth and human, like a university student or a blogger.
- Keep each rewritten paragraph about as long as the original.
- Do not merge, split or remove paragraphs. The output has as many paragraphs as the input.
- Separate paragraphs with exactly two newline characters.
- Do not add filler or framing such as \"here is the rewritten text:\".

RULES:
- Do not start a paragraph with an interjection such as \"Oh\" or \"Ah\".
- Output only the rewritten text, with no explanation and no copy of the input.
- Keep the original meaning.
- Retain 70% to 85% of the original words.
- If the input has no headings, do not add any. If it has headings, keep them exactly.
- Do not use the characters ) ( ] [ ! in the output.
- Start the output with a letter (A-Z, a-z).

INPUT:
{}
",
        chunk
    )
}

// --- Gemini ---

#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Client,
    url: Url,
}

impl GeminiGenerator {
    /// Builds the client, reading the API key from `api_key_env` or `GEMINI_API_KEY`.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let api_key = read_api_key(&config.api_key_env)
            .ok_or_else(|| GenerationError::MissingApiKey(config.api_key_env.clone()))?;
        Self::with_api_key(config, &api_key)
    }

    pub fn with_api_key(config: &GeneratorConfig, api_key: &str) -> Result<Self, GenerationError> {
        let url = resolve_endpoint(&config.endpoint, &config.model, "generateContent", api_key)
            .map_err(GenerationError::InvalidEndpoint)?;
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(GeminiGenerator { client, url })
    }
}

impl Generator for GeminiGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let payload = json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        let response = self.client.post(self.url.clone()).json(&payload).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(GenerationError::Status { status: status.as_u16(), body: truncate(&body, 320) });
        }

        let body: Value = serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        let text = extract_candidate_text(&body).ok_or_else(|| {
            GenerationError::MalformedResponse("response has no candidate text".to_string())
        })?;
        debug!(chars = text.len(), "generator answered");
        Ok(text.trim().to_string())
    }
}

/// Reads the key from the process environment only; `.env` files are not loaded.
pub(crate) fn read_api_key(primary_env: &str) -> Option<String> {
    [primary_env, FALLBACK_API_KEY_ENV]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

/// Accepts either a base URL or a full `:method` URL and appends the key when missing.
pub(crate) fn resolve_endpoint(
    endpoint: &str,
    model: &str,
    method: &str,
    api_key: &str,
) -> Result<Url, String> {
    let mut url = if endpoint.contains(&format!(":{}", method)) {
        Url::parse(endpoint).map_err(|e| format!("invalid endpoint {}: {}", endpoint, e))?
    } else {
        let built =
            format!("{}/v1beta/models/{}:{}", endpoint.trim_end_matches('/'), model, method);
        Url::parse(&built).map_err(|e| format!("invalid endpoint {}: {}", built, e))?
    };

    if !url.query_pairs().any(|(k, _)| k == "key") {
        url.query_pairs_mut().append_pair("key", api_key);
    }
    Ok(url)
}

fn extract_candidate_text(body: &Value) -> Option<String> {
    body["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|text| !text.trim().is_empty())
}

//*** END FILE: src/generation.rs ***//
