//*** START FILE: src/rewriting/dictionary.rs ***//
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

use crate::config::{LexiconConfig, Substitution};
use crate::error::ConfigError;

const SIMPLIFICATIONS: &[(&str, &str)] = &[
    ("utilize", "use"),
    ("commence", "start"),
    ("terminate", "end"),
    ("numerous", "many"),
    ("assist", "help"),
    ("demonstrate", "show"),
    ("contemplate", "think about"),
    ("methodology", "method"),
    ("consequently", "so"),
    ("approximately", "about"),
    ("therefore", "so"),
    ("ameliorate", "improve"),
    ("facilitate", "help"),
    ("implement", "do"),
    ("acquire", "get"),
    ("endeavor", "try"),
    ("prioritize", "focus on"),
    ("subsequent", "next"),
    ("predominantly", "mainly"),
    ("optimize", "improve"),
    ("utilization", "use"),
    ("collaborate", "work together"),
    ("comprehensive", "detailed"),
    ("infrastructure", "framework"),
    ("sufficient", "enough"),
    ("innovative", "new"),
    ("predicament", "problem"),
    ("concur", "agree"),
    ("adverse", "bad"),
    ("exemplify", "show"),
    ("cognizant", "aware"),
];

const CONTRACTIONS: &[(&str, &str)] = &[
    (r"\bis not\b", "isn't"),
    (r"\bare not\b", "aren't"),
    (r"\bdoes not\b", "doesn't"),
    (r"\bdid not\b", "didn't"),
    (r"\bcan not\b", "can't"),
    (r"\bcannot\b", "can't"),
    (r"\bwill not\b", "won't"),
    (r"\bwould not\b", "wouldn't"),
    (r"\bshould not\b", "shouldn't"),
    (r"\bhave not\b", "haven't"),
    (r"\bhas not\b", "hasn't"),
    (r"\bhad not\b", "hadn't"),
    (r"\bI am\b", "I'm"),
    (r"\bwe are\b", "we're"),
    (r"\bthey are\b", "they're"),
    (r"\byou are\b", "you're"),
    (r"\bI will\b", "I'll"),
    (r"\bwe will\b", "we'll"),
    (r"\bthey will\b", "they'll"),
    (r"\byou will\b", "you'll"),
];

static SIMPLIFICATION_TABLE: Lazy<Arc<SubstitutionTable>> = Lazy::new(|| {
    let mut table = SubstitutionTable::new();
    for (word, replacement) in SIMPLIFICATIONS {
        table
            .push_literal(word, replacement)
            .expect("built-in simplification entries are valid");
    }
    Arc::new(table)
});

static CONTRACTION_TABLE: Lazy<Arc<SubstitutionTable>> = Lazy::new(|| {
    let mut table = SubstitutionTable::new();
    for (pattern, contraction) in CONTRACTIONS {
        table
            .push_pattern(pattern, contraction)
            .expect("built-in contraction patterns are valid");
    }
    Arc::new(table)
});

#[derive(Debug, Clone)]
struct Entry {
    matcher: Regex,
    replacement: String,
}

/// Ordered, case-insensitive substitutions. Entries apply in insertion order,
/// each one to the output of the previous.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    entries: Vec<Entry>,
}

impl SubstitutionTable {
    pub fn new() -> Self {
        SubstitutionTable { entries: Vec::new() }
    }

    /// The built-in word simplification table, shared process-wide.
    pub fn simplifications() -> Arc<SubstitutionTable> {
        Arc::clone(&SIMPLIFICATION_TABLE)
    }

    /// The built-in contraction table, shared process-wide.
    pub fn contractions() -> Arc<SubstitutionTable> {
        Arc::clone(&CONTRACTION_TABLE)
    }

    /// Builds the two tables used by the lexical rewriter: the built-ins
    /// followed by any configured extras. Without extras the shared tables are reused.
    pub fn from_lexicon(
        lexicon: &LexiconConfig,
    ) -> Result<(Arc<SubstitutionTable>, Arc<SubstitutionTable>), ConfigError> {
        let simplify = extend_shared(
            SubstitutionTable::simplifications(),
            &lexicon.extra_simplifications,
            SubstitutionTable::push_literal,
        )?;
        let contract = extend_shared(
            SubstitutionTable::contractions(),
            &lexicon.extra_contractions,
            SubstitutionTable::push_pattern,
        )?;
        Ok((simplify, contract))
    }

    /// Adds a literal word or phrase, matched on word boundaries.
    pub fn push_literal(&mut self, phrase: &str, replacement: &str) -> Result<(), ConfigError> {
        let pattern = format!(r"\b{}\b", regex::escape(phrase.trim()));
        self.push_compiled(phrase, &pattern, replacement)
    }

    /// Adds a raw regex pattern. The replacement is inserted literally.
    pub fn push_pattern(&mut self, pattern: &str, replacement: &str) -> Result<(), ConfigError> {
        self.push_compiled(pattern, pattern, replacement)
    }

    fn push_compiled(
        &mut self,
        source: &str,
        pattern: &str,
        replacement: &str,
    ) -> Result<(), ConfigError> {
        let matcher = Regex::new(&format!("(?i){}", pattern)).map_err(|e| {
            ConfigError::Invalid(format!("bad substitution pattern '{}': {}", source, e))
        })?;
        self.entries.push(Entry {
            matcher,
            replacement: replacement.to_string(),
        });
        Ok(())
    }

    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for entry in &self.entries {
            current = entry
                .matcher
                .replace_all(&current, NoExpand(&entry.replacement))
                .into_owned();
        }
        current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn extend_shared(
    base: Arc<SubstitutionTable>,
    extras: &[Substitution],
    push: fn(&mut SubstitutionTable, &str, &str) -> Result<(), ConfigError>,
) -> Result<Arc<SubstitutionTable>, ConfigError> {
    if extras.is_empty() {
        return Ok(base);
    }
    let mut table = (*base).clone();
    for extra in extras {
        push(&mut table, &extra.from, &extra.to)?;
    }
    Ok(Arc::new(table))
}

//*** END FILE: src/rewriting/dictionary.rs ***//
