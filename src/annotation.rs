//! Linguistic annotation used by the entity-aware rewriter.
//!
//! Two implementations: an offline rule-based tagger that knows just enough
//! (dates, organizations, the verb "increase") for the rewriter, and a client
//! for an external spaCy-style service.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::{AnnotatorConfig, AnnotatorKind};
use crate::error::{AnnotationError, ConfigError};
use crate::parsing::split_sentences;
use crate::types::text_data::{AnnotatedSentence, EntityKind, PartOfSpeech, Token};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+(?:['’]\w+)*|[^\w\s]").unwrap());
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:1[5-9]\d{2}|20\d{2})s?$").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:[.,]\d+)*$").unwrap());
static DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[1-9]|[12]\d|3[01])(?:st|nd|rd|th)?$").unwrap());

const MONTHS: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const WEEKDAYS: &[&str] =
    &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
const RELATIVE_DAYS: &[&str] = &["yesterday", "today", "tomorrow"];
/// Words that make a bare year read as a date: "in 1999", "since 2010".
const YEAR_CUES: &[&str] = &["in", "since", "by", "during", "of"];
const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "any", "no", "each", "every", "its",
    "their", "our", "his", "her", "my", "your",
];
const INCREASE_FORMS: &[&str] = &["increase", "increases", "increased", "increasing"];
const ORG_SUFFIXES: &[&str] = &[
    "Inc", "Corp", "Corporation", "Ltd", "LLC", "Company", "Group", "University", "Institute",
    "Foundation", "Association", "Agency", "Bank",
];

/// Splits text into sentences of tagged tokens.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Result<Vec<AnnotatedSentence>, AnnotationError>;
}

pub fn build_annotator(config: &AnnotatorConfig) -> Result<Box<dyn Annotator>, ConfigError> {
    match config.kind {
        AnnotatorKind::Heuristic => {
            Ok(Box::new(HeuristicAnnotator::with_organizations(&config.organizations)))
        }
        AnnotatorKind::Http => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                ConfigError::Invalid("annotator.endpoint is not set".to_string())
            })?;
            Ok(Box::new(HttpAnnotator::new(endpoint)?))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeuristicAnnotator {
    /// Lower-cased token sequences of known organization names.
    organizations: Vec<Vec<String>>,
}

impl HeuristicAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organizations<S: AsRef<str>>(names: &[S]) -> Self {
        let organizations = names
            .iter()
            .map(|name| {
                TOKEN
                    .find_iter(name.as_ref())
                    .map(|m| m.as_str().to_lowercase())
                    .collect::<Vec<_>>()
            })
            .filter(|tokens| !tokens.is_empty())
            .collect();
        HeuristicAnnotator { organizations }
    }

    fn tokenize(sentence: &str) -> Vec<Token> {
        TOKEN
            .find_iter(sentence)
            .map(|m| Token {
                text: m.as_str().to_string(),
                entity: None,
                lemma: m.as_str().to_lowercase(),
                pos: PartOfSpeech::Other,
                space_after: sentence[m.end()..].starts_with(char::is_whitespace),
            })
            .collect()
    }

    fn tag_parts_of_speech(tokens: &mut [Token]) {
        for i in 0..tokens.len() {
            let lower = tokens[i].lemma.clone();
            let pos = if !tokens[i].text.chars().any(char::is_alphanumeric) {
                PartOfSpeech::Punct
            } else if NUMBER.is_match(&tokens[i].text) {
                PartOfSpeech::Num
            } else if DETERMINERS.contains(&lower.as_str()) {
                PartOfSpeech::Det
            } else if INCREASE_FORMS.contains(&lower.as_str()) {
                tokens[i].lemma = "increase".to_string();
                // "an increase", "the increase": a noun after a determiner
                let after_determiner = i > 0 && tokens[i - 1].pos == PartOfSpeech::Det;
                if after_determiner {
                    PartOfSpeech::Noun
                } else {
                    PartOfSpeech::Verb
                }
            } else {
                PartOfSpeech::Other
            };
            tokens[i].pos = pos;
        }
    }

    fn tag_dates(tokens: &mut [Token]) {
        for i in 0..tokens.len() {
            let prev = i.checked_sub(1).map(|p| tokens[p].text.as_str());
            let next = tokens.get(i + 1).map(|t| t.text.as_str());
            let text = tokens[i].text.as_str();
            let is_date = if text == "May" {
                is_month_may(prev, next)
            } else if YEAR.is_match(text) {
                prev.is_some_and(|p| {
                    MONTHS.contains(&p) || YEAR_CUES.contains(&p.to_lowercase().as_str())
                })
            } else {
                MONTHS.contains(&text)
                    || WEEKDAYS.contains(&text)
                    || RELATIVE_DAYS.contains(&tokens[i].lemma.as_str())
            };
            if is_date {
                tokens[i].entity = Some(EntityKind::Date);
            }
        }
    }

    fn tag_organizations(&self, tokens: &mut [Token]) {
        for name in &self.organizations {
            if name.len() > tokens.len() {
                continue;
            }
            for start in 0..=tokens.len() - name.len() {
                let matches = tokens[start..start + name.len()]
                    .iter()
                    .zip(name)
                    .all(|(token, part)| token.lemma == *part);
                if matches {
                    for token in &mut tokens[start..start + name.len()] {
                        token.entity = Some(EntityKind::Org);
                    }
                }
            }
        }

        for i in 0..tokens.len() {
            if !ORG_SUFFIXES.contains(&tokens[i].text.as_str()) {
                continue;
            }
            let mut start = i;
            while start > 0 && is_capitalized(&tokens[start - 1].text) {
                // every sentence opens with a capital; only a known name counts there
                if start == 1 && tokens[0].entity != Some(EntityKind::Org) {
                    break;
                }
                start -= 1;
            }
            let mut end = i + 1;
            // "University of Chicago"
            if end + 1 < tokens.len() && tokens[end].text == "of" && is_capitalized(&tokens[end + 1].text) {
                end += 1;
                while end < tokens.len() && is_capitalized(&tokens[end].text) {
                    end += 1;
                }
            }
            if start == i && end == i + 1 {
                continue;
            }
            for token in &mut tokens[start..end] {
                token.entity = Some(EntityKind::Org);
            }
        }
    }
}

impl Annotator for HeuristicAnnotator {
    fn annotate(&self, text: &str) -> Result<Vec<AnnotatedSentence>, AnnotationError> {
        let mut sentences = Vec::new();
        for sentence in split_sentences(text) {
            let mut tokens = Self::tokenize(sentence);
            if tokens.is_empty() {
                continue;
            }
            Self::tag_parts_of_speech(&mut tokens);
            Self::tag_dates(&mut tokens);
            self.tag_organizations(&mut tokens);
            sentences.push(AnnotatedSentence { tokens });
        }
        Ok(sentences)
    }
}

/// "May" is the month only next to a day or year ("May 5", "3 May", "May 2020")
/// or after "in"/"of"; otherwise it is the modal verb.
fn is_month_may(prev: Option<&str>, next: Option<&str>) -> bool {
    let dated = |word: &str| DAY.is_match(word) || YEAR.is_match(word);
    next.is_some_and(dated)
        || prev.is_some_and(|p| dated(p) || matches!(p.to_lowercase().as_str(), "in" | "of"))
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
        && word.chars().any(char::is_alphabetic)
        && !DETERMINERS.contains(&word.to_lowercase().as_str())
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    sentences: Vec<WireSentence>,
}

#[derive(Deserialize)]
struct WireSentence {
    tokens: Vec<WireToken>,
}

#[derive(Deserialize)]
struct WireToken {
    text: String,
    #[serde(default)]
    ent_type: String,
    #[serde(default)]
    lemma: String,
    #[serde(default)]
    pos: String,
    #[serde(default)]
    whitespace: String,
}

impl From<WireToken> for Token {
    fn from(wire: WireToken) -> Self {
        Token {
            entity: EntityKind::from_label(&wire.ent_type),
            lemma: if wire.lemma.is_empty() { wire.text.to_lowercase() } else { wire.lemma },
            pos: PartOfSpeech::from_label(&wire.pos),
            space_after: !wire.whitespace.is_empty(),
            text: wire.text,
        }
    }
}

/// Client for an annotation service that accepts `{"text": ...}` and answers with
/// sentences of spaCy-style tokens (`text`, `ent_type`, `lemma`, `pos`, `whitespace`).
#[derive(Debug, Clone)]
pub struct HttpAnnotator {
    client: Client,
    endpoint: String,
}

impl HttpAnnotator {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("cannot build annotator client: {}", e)))?;
        Ok(HttpAnnotator { client, endpoint: endpoint.into() })
    }
}

impl Annotator for HttpAnnotator {
    fn annotate(&self, text: &str) -> Result<Vec<AnnotatedSentence>, AnnotationError> {
        let response = self.client.post(&self.endpoint).json(&AnnotateRequest { text }).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(AnnotationError::Status { status: status.as_u16(), body: truncate(&body, 320) });
        }
        let parsed: AnnotateResponse = serde_json::from_str(&body)
            .map_err(|e| AnnotationError::MalformedResponse(e.to_string()))?;
        Ok(parsed
            .sentences
            .into_iter()
            .map(|sentence| AnnotatedSentence {
                tokens: sentence.tokens.into_iter().map(Token::from).collect(),
            })
            .collect())
    }
}

pub(crate) fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(annotator: &HeuristicAnnotator, text: &str) -> Vec<Token> {
        annotator
            .annotate(text)
            .unwrap()
            .into_iter()
            .flat_map(|sentence| sentence.tokens)
            .collect()
    }

    #[test]
    fn records_spacing_around_punctuation() {
        let annotated = tokens(&HeuristicAnnotator::new(), "Hi, there.");
        let layout: Vec<(&str, bool)> =
            annotated.iter().map(|t| (t.text.as_str(), t.space_after)).collect();
        assert_eq!(layout, vec![("Hi", false), (",", true), ("there", false), (".", false)]);
    }

    #[test]
    fn tags_dates() {
        let annotated = tokens(&HeuristicAnnotator::new(), "It shipped in March 2021 and again yesterday.");
        let dates: Vec<&str> = annotated
            .iter()
            .filter(|t| t.entity == Some(EntityKind::Date))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(dates, vec!["March", "2021", "yesterday"]);
    }

    fn dates_in(text: &str) -> Vec<String> {
        tokens(&HeuristicAnnotator::new(), text)
            .into_iter()
            .filter(|t| t.entity == Some(EntityKind::Date))
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn bare_numbers_are_not_years() {
        assert!(dates_in("The report has 1800 pages and 2000 words.").is_empty());
        assert_eq!(dates_in("Sales doubled since 2010."), vec!["2010"]);
        assert_eq!(dates_in("The 1990s ended during 1999."), vec!["1999"]);
    }

    #[test]
    fn may_is_a_month_only_in_date_context() {
        assert!(dates_in("May I help you with this?").is_empty());
        assert!(dates_in("You may go.").is_empty());
        assert_eq!(dates_in("It opened on May 5 in Leeds."), vec!["May"]);
        assert_eq!(dates_in("We met in May."), vec!["May"]);
        assert_eq!(dates_in("May 2020 was quiet."), vec!["May", "2020"]);
    }

    #[test]
    fn sentence_initial_word_is_not_pulled_into_suffix_names() {
        let annotated = tokens(&HeuristicAnnotator::new(), "Many Bank customers increased savings.");
        assert!(annotated.iter().all(|t| t.entity != Some(EntityKind::Org)));

        let annotator = HeuristicAnnotator::with_organizations(&["Northwind"]);
        let annotated = tokens(&annotator, "Northwind Bank opened.");
        assert_eq!(annotated[0].entity, Some(EntityKind::Org));
        assert_eq!(annotated[1].entity, Some(EntityKind::Org));
    }

    #[test]
    fn increase_is_a_verb_unless_determined() {
        let annotated = tokens(&HeuristicAnnotator::new(), "Sales increased after an increase.");
        let increased = &annotated[1];
        assert_eq!((increased.lemma.as_str(), increased.pos), ("increase", PartOfSpeech::Verb));
        let noun = &annotated[4];
        assert_eq!((noun.lemma.as_str(), noun.pos), ("increase", PartOfSpeech::Noun));
    }

    #[test]
    fn tags_gazetteer_and_suffix_organizations() {
        let annotator = HeuristicAnnotator::with_organizations(&["Open Lab"]);
        let annotated = tokens(&annotator, "Open Lab met Acme Corp and the University of Leeds.");
        let orgs: Vec<&str> = annotated
            .iter()
            .filter(|t| t.entity == Some(EntityKind::Org))
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(orgs, vec!["Open", "Lab", "Acme", "Corp", "University", "of", "Leeds"]);
    }

    #[test]
    fn wire_tokens_map_spacy_labels() {
        let wire = WireToken {
            text: "Google".to_string(),
            ent_type: "ORG".to_string(),
            lemma: String::new(),
            pos: "PROPN".to_string(),
            whitespace: " ".to_string(),
        };
        let token = Token::from(wire);
        assert_eq!(token.entity, Some(EntityKind::Org));
        assert_eq!(token.lemma, "google");
        assert_eq!(token.pos, PartOfSpeech::Noun);
        assert!(token.space_after);
    }
}
