// Top-N feature selection over a count table.

use serde::Serialize;
use tracing::info;
use unicode_general_category::{get_general_category, GeneralCategory};

use super::vocabulary::{CountTable, Vocabulary};
use super::Bigram;
use crate::error::PipelineError;

/// True when `s` is non-empty and every character is a letter.
///
/// Letters are the Lu, Ll, Lt, Lm and Lo general categories. Letter-numbers
/// such as roman numerals and combining marks do not qualify.
pub fn is_alphabetic(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_letter)
}

fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

/// The `n` most frequent alphabetic unigrams, most frequent first.
pub fn select_unigrams(table: &CountTable<String>, n: usize) -> Result<Vec<String>, PipelineError> {
    select_top(table, n, |word| is_alphabetic(word))
}

/// The `n` most frequent bigrams whose two halves are both alphabetic.
pub fn select_bigrams(table: &CountTable<Bigram>, n: usize) -> Result<Vec<Bigram>, PipelineError> {
    select_top(table, n, |(first, second)| {
        is_alphabetic(first) && is_alphabetic(second)
    })
}

/// Walk the table by descending count and take the first `n` accepted keys.
///
/// Running off the end of the table before `n` keys are accepted is an
/// error; the list is never silently truncated.
fn select_top<K, F>(table: &CountTable<K>, n: usize, accept: F) -> Result<Vec<K>, PipelineError>
where
    K: Eq + std::hash::Hash + Clone,
    F: Fn(&K) -> bool,
{
    let mut selected = Vec::with_capacity(n);
    let mut ranked = table.ranked().into_iter();

    while selected.len() < n {
        match ranked.next() {
            Some((key, _count)) if accept(key) => selected.push(key.clone()),
            Some(_) => {}
            None => {
                return Err(PipelineError::FeatureSelectionRange {
                    requested: n,
                    available: selected.len(),
                })
            }
        }
    }

    Ok(selected)
}

/// The fixed, ordered feature list every document is vectorized against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSet {
    pub unigrams: Vec<String>,
    pub bigrams: Vec<Bigram>,
}

impl FeatureSet {
    /// Select `unigrams` + `bigrams` features from a built vocabulary.
    pub fn select(
        vocabulary: &Vocabulary,
        unigrams: usize,
        bigrams: usize,
    ) -> Result<Self, PipelineError> {
        let features = Self {
            unigrams: select_unigrams(&vocabulary.unigrams, unigrams)?,
            bigrams: select_bigrams(&vocabulary.bigrams, bigrams)?,
        };

        info!(
            unigrams = features.unigrams.len(),
            bigrams = features.bigrams.len(),
            top_unigram = features.unigrams.first().map(String::as_str).unwrap_or(""),
            "Selected features"
        );

        Ok(features)
    }

    /// Length of every vector produced against this feature set.
    pub fn len(&self) -> usize {
        self.unigrams.len() + self.bigrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
