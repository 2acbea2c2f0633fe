use std::sync::Arc;

use super::dictionary::SubstitutionTable;

/// Dictionary-driven word simplification and contraction folding. Both passes
/// are deterministic.
#[derive(Debug, Clone)]
pub struct LexicalRewriter {
    simplifications: Arc<SubstitutionTable>,
    contractions: Arc<SubstitutionTable>,
}

impl Default for LexicalRewriter {
    fn default() -> Self {
        LexicalRewriter::new(SubstitutionTable::simplifications(), SubstitutionTable::contractions())
    }
}

impl LexicalRewriter {
    pub fn new(simplifications: Arc<SubstitutionTable>, contractions: Arc<SubstitutionTable>) -> Self {
        LexicalRewriter { simplifications, contractions }
    }

    /// Replaces formal words with plainer ones ("utilize" -> "use").
    pub fn simplify(&self, text: &str) -> String {
        self.simplifications.apply(text)
    }

    /// Folds "is not", "we are", ... into their contracted forms.
    pub fn apply_contractions(&self, text: &str) -> String {
        self.contractions.apply(text)
    }
}
