// Per-document count vectorization against a fixed feature set.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::selection::FeatureSet;
use super::tokenizer::Tokenizer;
use super::FeatureVector;

/// Case handling for tokens at vectorization time.
///
/// Vocabulary building always lower-cases, but vectorization matches tokens
/// verbatim by default, so a capitalized "Revenue" does not count toward the
/// "revenue" feature. `Fold` lower-cases tokens here as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseMode {
    #[default]
    Preserve,
    Fold,
}

impl FromStr for CaseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "preserve" => Ok(CaseMode::Preserve),
            "fold" | "lower" => Ok(CaseMode::Fold),
            other => Err(format!(
                "unknown case mode '{other}' (expected 'preserve' or 'fold')"
            )),
        }
    }
}

impl fmt::Display for CaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseMode::Preserve => write!(f, "preserve"),
            CaseMode::Fold => write!(f, "fold"),
        }
    }
}

/// Turns documents into count vectors. Holds no mutable state.
pub struct Vectorizer<'a> {
    tokenizer: &'a dyn Tokenizer,
    features: &'a FeatureSet,
    case: CaseMode,
}

impl<'a> Vectorizer<'a> {
    pub fn new(tokenizer: &'a dyn Tokenizer, features: &'a FeatureSet, case: CaseMode) -> Self {
        Self {
            tokenizer,
            features,
            case,
        }
    }

    /// Count each feature in `document`.
    ///
    /// Unigram counts come first, then bigram counts, in feature-set order.
    /// The result always has `features.len()` entries.
    pub fn vectorize(&self, document: &str) -> FeatureVector {
        let mut tokens = self.tokenizer.tokenize(document);
        if self.case == CaseMode::Fold {
            for token in &mut tokens {
                *token = token.to_lowercase();
            }
        }

        let mut vector = Vec::with_capacity(self.features.len());

        for feature in &self.features.unigrams {
            let count = tokens.iter().filter(|t| *t == feature).count();
            vector.push(count as u32);
        }

        for (first, second) in &self.features.bigrams {
            let count = tokens
                .windows(2)
                .filter(|pair| pair[0] == *first && pair[1] == *second)
                .count();
            vector.push(count as u32);
        }

        vector
    }

    /// Vectorize every document, preserving corpus order.
    pub fn vectorize_all<S: AsRef<str>>(&self, corpus: &[S]) -> Vec<FeatureVector> {
        let vectors: Vec<FeatureVector> =
            corpus.iter().map(|doc| self.vectorize(doc.as_ref())).collect();
        debug!(
            documents = vectors.len(),
            width = self.features.len(),
            case = %self.case,
            "Vectorized corpus"
        );
        vectors
    }
}
