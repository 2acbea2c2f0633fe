use std::sync::Arc;

use tracing::debug;

use crate::annotation::{Annotator, HeuristicAnnotator};
use crate::error::AnnotationError;
use crate::types::text_data::{AnnotatedSentence, EntityKind, PartOfSpeech, Token};

/// Rewrites text token by token using an annotator's tags: organization names
/// are removed, dates become "some time ago" and the verb "increase" becomes "grow".
#[derive(Clone)]
pub struct EntityRewriter {
    annotator: Arc<dyn Annotator>,
}

impl Default for EntityRewriter {
    fn default() -> Self {
        EntityRewriter::new(Arc::new(HeuristicAnnotator::new()))
    }
}

impl std::fmt::Debug for EntityRewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRewriter").finish_non_exhaustive()
    }
}

impl EntityRewriter {
    pub fn new(annotator: Arc<dyn Annotator>) -> Self {
        EntityRewriter { annotator }
    }

    pub fn rewrite_with_entities(&self, text: &str) -> Result<String, AnnotationError> {
        let sentences = self.annotator.annotate(text)?;
        let mut replaced = 0usize;
        let rewritten: Vec<String> = sentences
            .iter()
            .map(|sentence| reassemble(sentence, &mut replaced))
            .filter(|sentence| !sentence.is_empty())
            .collect();
        debug!(sentences = sentences.len(), replaced, "entity rewrite");
        Ok(rewritten.join(" "))
    }
}

fn replacement_for(token: &Token) -> Option<&'static str> {
    match token.entity {
        Some(EntityKind::Org) => Some(""),
        Some(EntityKind::Date) => Some("some time ago"),
        _ if token.lemma == "increase" && token.pos == PartOfSpeech::Verb => Some("grow"),
        _ => None,
    }
}

/// Joins token texts back together, keeping the original spacing. A removed
/// token leaves nothing behind, and runs of spaces collapse to one.
fn reassemble(sentence: &AnnotatedSentence, replaced: &mut usize) -> String {
    let mut out = String::new();
    for token in &sentence.tokens {
        let text = match replacement_for(token) {
            Some(replacement) => {
                *replaced += 1;
                replacement
            }
            None => token.text.as_str(),
        };
        if !text.is_empty() {
            out.push_str(text);
        }
        if token.space_after && !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(text: &str) -> String {
        EntityRewriter::default().rewrite_with_entities(text).unwrap()
    }

    #[test]
    fn plain_sentence_round_trips() {
        assert_eq!(rewrite("The cat sat on the mat."), "The cat sat on the mat.");
        assert_eq!(rewrite("Well, it works!"), "Well, it works!");
    }

    #[test]
    fn replaces_dates_and_increase() {
        assert_eq!(
            rewrite("Prices increased in March 2020."),
            "Prices grow in some time ago some time ago."
        );
    }

    #[test]
    fn noun_increase_is_kept() {
        assert_eq!(rewrite("We saw an increase."), "We saw an increase.");
    }

    #[test]
    fn removes_organizations() {
        assert_eq!(rewrite("She joined Acme Corp last year."), "She joined last year.");
    }

    #[test]
    fn ordinary_prose_is_left_alone() {
        for text in [
            "The report has 1800 pages and 2000 words.",
            "May I help you with this?",
        ] {
            assert_eq!(rewrite(text), text);
        }
        assert_eq!(
            rewrite("Many Bank customers increased savings."),
            "Many Bank customers grow savings."
        );
    }

    #[test]
    fn sentences_are_joined_with_single_space() {
        assert_eq!(rewrite("One here.  Two there."), "One here. Two there.");
    }

    struct FailingAnnotator;

    impl Annotator for FailingAnnotator {
        fn annotate(&self, _text: &str) -> Result<Vec<AnnotatedSentence>, AnnotationError> {
            Err(AnnotationError::MalformedResponse("down".to_string()))
        }
    }

    #[test]
    fn annotator_errors_propagate() {
        let rewriter = EntityRewriter::new(Arc::new(FailingAnnotator));
        assert!(rewriter.rewrite_with_entities("text").is_err());
    }
}
