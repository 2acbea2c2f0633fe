//! Randomized perturbation passes.
//!
//! Every pass takes its randomness from the caller. Each decision is an
//! independent draw, and no state is carried from one pass to the next.

use once_cell::sync::Lazy;
use rand::rngs::mock::StepRng;
use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;
use regex::{Captures, Regex};
use tracing::trace;

use crate::config::NoiseConfig;
use crate::parsing::split_sentences;

static FUNCTION_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(the|a|an|that|which|and)\b").unwrap());

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const MERGE_SEPARATORS: [&str; 2] = [", ", " - "];

/// Source of the random draws the noise passes make.
pub trait RandomSource {
    /// Uniform draw from `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;

    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.index(items.len())]
    }
}

macro_rules! impl_random_source {
    ($($rng:ty),*) => {
        $(
            impl RandomSource for $rng {
                fn next_f64(&mut self) -> f64 {
                    self.gen::<f64>()
                }

                fn index(&mut self, len: usize) -> usize {
                    self.gen_range(0..len)
                }
            }
        )*
    };
}

impl_random_source!(StdRng, ThreadRng, StepRng);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypoAction {
    Comma,
    Period,
    Letter,
    Recase,
    Ellipsis,
    Dash,
    Repeat,
}

const TYPO_ACTIONS: [TypoAction; 7] = [
    TypoAction::Comma,
    TypoAction::Period,
    TypoAction::Letter,
    TypoAction::Recase,
    TypoAction::Ellipsis,
    TypoAction::Dash,
    TypoAction::Repeat,
];

#[derive(Debug, Clone, Default)]
pub struct NoiseInjector {
    settings: NoiseConfig,
}

impl NoiseInjector {
    pub fn new(settings: NoiseConfig) -> Self {
        NoiseInjector { settings }
    }

    /// Deletes articles and a few connectives at random. The surrounding spaces
    /// are kept, so a deletion leaves a double space behind.
    pub fn drop_small_function_words<R: RandomSource + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> String {
        let probability = self.settings.drop_function_word;
        FUNCTION_WORD
            .replace_all(text, |caps: &Captures| {
                if rng.chance(probability) {
                    String::new()
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    }

    /// Doubles words at random. Whitespace is normalized to single spaces.
    pub fn repeat_words_randomly<R: RandomSource + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> String {
        let mut words = Vec::new();
        for word in text.split_whitespace() {
            words.push(word);
            if rng.chance(self.settings.repeat_word) {
                words.push(word);
            }
        }
        words.join(" ")
    }

    /// Permutes a short run of 2 to 5 words inside some of the longer sentences.
    pub fn shuffle_words_small_chunks<R: RandomSource + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> String {
        let mut shuffled = Vec::new();
        for sentence in split_sentences(text) {
            let mut words: Vec<&str> = sentence.split_whitespace().collect();
            if words.len() > 6 && rng.chance(self.settings.shuffle_sentence) {
                let max_span = (words.len() / 2).min(5);
                let span = 2 + rng.index(max_span - 1);
                let start = rng.index(words.len() - span + 1);
                shuffle(&mut words[start..start + span], rng);
                trace!(start, span, "shuffled span");
                shuffled.push(words.join(" "));
            } else {
                shuffled.push(sentence.to_string());
            }
        }
        shuffled.join(" ")
    }

    /// Joins sentences onto the one before them with ", " or " - ". A joined
    /// sentence can absorb the next one too.
    pub fn vary_sentence_length<R: RandomSource + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> String {
        let mut result: Vec<String> = Vec::new();
        for sentence in split_sentences(text) {
            if !result.is_empty() && rng.chance(self.settings.merge_sentence) {
                let separator = *rng.choose(&MERGE_SEPARATORS);
                if let Some(previous) = result.last_mut() {
                    let head_len = previous.trim_end_matches(['.', '!', '?']).len();
                    previous.truncate(head_len);
                    previous.push_str(separator);
                    previous.push_str(&lowercase_first(sentence));
                }
            } else {
                result.push(sentence.to_string());
            }
        }
        result.join(" ")
    }

    /// Character-level noise: stray punctuation, letter swaps, re-casing,
    /// ellipses, dashes and doubled letters.
    pub fn inject_typos_and_mistakes<R: RandomSource + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> String {
        self.inject_typos_counted(text, rng).0
    }

    /// Same as [`Self::inject_typos_and_mistakes`], also returning how many
    /// positions triggered an action.
    pub fn inject_typos_counted<R: RandomSource + ?Sized>(
        &self,
        text: &str,
        rng: &mut R,
    ) -> (String, usize) {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len() + 8);
        let mut triggered = 0;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            i += 1;
            if !rng.chance(self.settings.typo) {
                out.push(c);
                continue;
            }
            triggered += 1;
            match *rng.choose(&TYPO_ACTIONS) {
                TypoAction::Comma => out.push(','),
                TypoAction::Period => out.push('.'),
                TypoAction::Letter if c.is_alphabetic() => {
                    out.push(LOWERCASE[rng.index(LOWERCASE.len())] as char);
                }
                TypoAction::Recase => {
                    if rng.chance(0.5) {
                        out.extend(c.to_uppercase());
                    } else {
                        out.extend(c.to_lowercase());
                    }
                }
                // replaces this character and the two after it
                TypoAction::Ellipsis if i + 1 < chars.len() => {
                    out.push_str("...");
                    i += 2;
                }
                TypoAction::Dash => out.push('-'),
                // never doubles the final character
                TypoAction::Repeat if c.is_alphabetic() && i < chars.len() => {
                    out.push(c);
                    out.push(c);
                }
                _ => out.push(c),
            }
        }
        (out, triggered)
    }
}

fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1);
        items.swap(i, j);
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
