use tracing::{debug, warn};

use crate::config::{PaddingPolicy, ReconcileConfig};
use crate::parsing::{count_words, split_sentences};

const FILLER_SENTENCES: [&str; 4] = [
    "That is how it went.",
    "It was like that for a while.",
    "Most people would agree.",
    "There is more to it, of course.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    Unchanged,
    /// Trailing sentences were removed, this many of them.
    Truncated(usize),
    /// Output fell short and a single space was appended.
    TrailingSpace,
    /// Output fell short and this many filler sentences were appended.
    Padded(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub text: String,
    /// Words in the output minus words in the original chunk, before reconciling.
    pub delta: i64,
    pub action: ReconcileAction,
}

/// Keeps a chunk's output word count within `tolerance` of the original.
#[derive(Debug, Clone, Default)]
pub struct LengthReconciler {
    settings: ReconcileConfig,
}

impl LengthReconciler {
    pub fn new(settings: ReconcileConfig) -> Self {
        LengthReconciler { settings }
    }

    pub fn reconcile(&self, chunk: &str, output: &str) -> Reconciled {
        let original = count_words(chunk) as i64;
        let tolerance = self.settings.tolerance as i64;
        let delta = count_words(output) as i64 - original;

        let reconciled = if delta > tolerance {
            let mut sentences = split_sentences(output);
            let mut text = output.to_string();
            let mut dropped = 0;
            while count_words(&text) as i64 - original > tolerance && !sentences.is_empty() {
                sentences.pop();
                dropped += 1;
                text = sentences.join(" ");
            }
            Reconciled { text, delta, action: ReconcileAction::Truncated(dropped) }
        } else if delta < -tolerance {
            self.pad(output, original, delta)
        } else {
            Reconciled { text: output.to_string(), delta, action: ReconcileAction::Unchanged }
        };

        debug!(delta, action = ?reconciled.action, "length reconciled");
        reconciled
    }

    fn pad(&self, output: &str, original: i64, delta: i64) -> Reconciled {
        match self.settings.padding {
            PaddingPolicy::TrailingSpace => {
                warn!(delta, "output is short of the original; appending a space only");
                Reconciled {
                    text: format!("{} ", output),
                    delta,
                    action: ReconcileAction::TrailingSpace,
                }
            }
            PaddingPolicy::Filler => {
                let tolerance = self.settings.tolerance as i64;
                let mut text = output.trim_end().to_string();
                let mut added = 0;
                while count_words(&text) as i64 - original < -tolerance {
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    text.push_str(FILLER_SENTENCES[added % FILLER_SENTENCES.len()]);
                    added += 1;
                }
                Reconciled { text, delta, action: ReconcileAction::Padded(added) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn within_tolerance_is_unchanged() {
        let reconciler = LengthReconciler::default();
        let result = reconciler.reconcile(&words(30), &words(45));
        assert_eq!(result.action, ReconcileAction::Unchanged);
        assert_eq!(result.delta, 15);
        assert_eq!(result.text, words(45));
    }

    #[test]
    fn drops_trailing_sentences_until_within_tolerance() {
        let reconciler = LengthReconciler::new(ReconcileConfig { tolerance: 2, ..Default::default() });
        let output = "One two three. Four five six. Seven eight nine.";
        let result = reconciler.reconcile("one two", output);
        assert_eq!(result.text, "One two three.");
        assert_eq!(result.action, ReconcileAction::Truncated(2));
        assert_eq!(result.delta, 7);
    }

    #[test]
    fn extreme_overshoot_empties_the_chunk() {
        let reconciler = LengthReconciler::new(ReconcileConfig { tolerance: 0, ..Default::default() });
        let result = reconciler.reconcile("", "Alpha beta. Gamma.");
        assert_eq!(result.text, "");
        assert_eq!(result.action, ReconcileAction::Truncated(2));
    }

    #[test]
    fn shortfall_appends_a_space_by_default() {
        let reconciler = LengthReconciler::default();
        let result = reconciler.reconcile(&words(40), "Short.");
        assert_eq!(result.text, "Short. ");
        assert_eq!(result.action, ReconcileAction::TrailingSpace);
        assert_eq!(result.delta, -39);
    }

    #[test]
    fn filler_policy_pads_into_tolerance() {
        let reconciler = LengthReconciler::new(ReconcileConfig {
            tolerance: 5,
            padding: PaddingPolicy::Filler,
        });
        let result = reconciler.reconcile(&words(20), "Short.");
        let after = count_words(&result.text) as i64 - 20;
        assert!(after >= -5, "still short by {}", after);
        assert!(result.text.starts_with("Short. That is how it went."));
        assert!(matches!(result.action, ReconcileAction::Padded(n) if n > 0));
    }

    proptest! {
        #[test]
        fn overshoot_is_bounded_or_emptied(
            chunk in "[a-z ]{0,200}",
            output in "[A-Za-z ,.!?]{0,400}",
            tolerance in 0usize..30,
        ) {
            let reconciler = LengthReconciler::new(ReconcileConfig { tolerance, ..Default::default() });
            let result = reconciler.reconcile(&chunk, &output);
            let after = count_words(&result.text) as i64 - count_words(&chunk) as i64;
            prop_assert!(after <= tolerance as i64 || result.text.is_empty());
        }
    }
}
