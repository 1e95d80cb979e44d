// Corpus vocabulary: unigram and bigram count tables.
//
// Tables remember the order in which keys were first inserted. Feature
// selection sorts by count with a stable sort, so keys with equal counts come
// out in first-encounter order and the selected feature list is reproducible
// across runs and platforms.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use tracing::info;

use super::tokenizer::Tokenizer;
use super::Bigram;

/// How occurrences are accumulated into the count tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountPolicy {
    /// Every token occurrence anywhere in the corpus adds one.
    #[default]
    CorpusTotal,
    /// A key adds at most one per document.
    DocumentFrequency,
}

impl FromStr for CountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "corpus" | "corpus-total" => Ok(CountPolicy::CorpusTotal),
            "document" | "document-frequency" | "df" => Ok(CountPolicy::DocumentFrequency),
            other => Err(format!(
                "unknown count policy '{other}' (expected 'corpus' or 'document')"
            )),
        }
    }
}

impl fmt::Display for CountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountPolicy::CorpusTotal => write!(f, "corpus"),
            CountPolicy::DocumentFrequency => write!(f, "document"),
        }
    }
}

/// Insertion-ordered count table.
#[derive(Debug, Clone)]
pub struct CountTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

impl<K> Default for CountTable<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> CountTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one to `key`, inserting it at the end if unseen.
    pub fn increment(&mut self, key: K) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    /// Count for `key`, zero if absent.
    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every count in the table.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(k, c)| (k, *c))
    }

    /// Entries by descending count; equal counts keep insertion order.
    pub fn ranked(&self) -> Vec<(&K, u64)> {
        let mut ranked: Vec<(&K, u64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Unigram and bigram counts for a whole corpus.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub unigrams: CountTable<String>,
    pub bigrams: CountTable<Bigram>,
    pub documents: usize,
    pub policy: CountPolicy,
}

/// Count lower-cased unigrams and adjacent bigrams across `corpus`.
///
/// Bigrams never span two documents. With [`CountPolicy::CorpusTotal`] the
/// unigram table's total equals the number of tokens in the corpus.
pub fn build_vocabulary<S: AsRef<str>>(
    corpus: &[S],
    tokenizer: &dyn Tokenizer,
    policy: CountPolicy,
) -> Vocabulary {
    let mut unigrams = CountTable::new();
    let mut bigrams = CountTable::new();

    for document in corpus {
        let tokens: Vec<String> = tokenizer
            .tokenize(document.as_ref())
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();

        match policy {
            CountPolicy::CorpusTotal => {
                for token in &tokens {
                    unigrams.increment(token.clone());
                }
                for pair in tokens.windows(2) {
                    bigrams.increment((pair[0].clone(), pair[1].clone()));
                }
            }
            CountPolicy::DocumentFrequency => {
                let mut seen_words = HashSet::new();
                for token in &tokens {
                    if seen_words.insert(token.as_str()) {
                        unigrams.increment(token.clone());
                    }
                }
                let mut seen_pairs = HashSet::new();
                for pair in tokens.windows(2) {
                    if seen_pairs.insert((pair[0].as_str(), pair[1].as_str())) {
                        bigrams.increment((pair[0].clone(), pair[1].clone()));
                    }
                }
            }
        }
    }

    info!(
        documents = corpus.len(),
        unigrams = unigrams.len(),
        bigrams = bigrams.len(),
        policy = %policy,
        "Built vocabulary"
    );

    Vocabulary {
        unigrams,
        bigrams,
        documents: corpus.len(),
        policy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tokenizer::WhitespaceTokenizer;

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut table = CountTable::new();
        for key in ["b", "a", "b", "c"] {
            table.increment(key.to_string());
        }
        let keys: Vec<&String> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(table.get("b"), 2);
        assert_eq!(table.get("missing"), 0);
    }

    #[test]
    fn test_ranked_is_stable_for_ties() {
        let mut table = CountTable::new();
        for key in ["x", "y", "z", "z"] {
            table.increment(key.to_string());
        }
        let ranked: Vec<&str> = table.ranked().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(ranked, vec!["z", "x", "y"]);
    }

    #[test]
    fn test_lowercases_before_counting() {
        let vocab = build_vocabulary(
            &["The the THE"],
            &WhitespaceTokenizer,
            CountPolicy::CorpusTotal,
        );
        assert_eq!(vocab.unigrams.len(), 1);
        assert_eq!(vocab.unigrams.get("the"), 3);
        assert_eq!(
            vocab.bigrams.get(&("the".to_string(), "the".to_string())),
            2
        );
    }

    #[test]
    fn test_document_frequency_caps_per_document() {
        let corpus = ["up up up", "up down"];
        let vocab = build_vocabulary(&corpus, &WhitespaceTokenizer, CountPolicy::DocumentFrequency);
        assert_eq!(vocab.unigrams.get("up"), 2);
        assert_eq!(vocab.unigrams.get("down"), 1);
        assert_eq!(vocab.bigrams.get(&("up".to_string(), "up".to_string())), 1);
    }

    #[test]
    fn test_bigrams_do_not_span_documents() {
        let corpus = ["alpha", "beta"];
        let vocab = build_vocabulary(&corpus, &WhitespaceTokenizer, CountPolicy::CorpusTotal);
        assert!(vocab.bigrams.is_empty());
    }

    #[test]
    fn test_empty_corpus() {
        let corpus: [&str; 0] = [];
        let vocab = build_vocabulary(&corpus, &WhitespaceTokenizer, CountPolicy::CorpusTotal);
        assert!(vocab.unigrams.is_empty());
        assert!(vocab.bigrams.is_empty());
        assert_eq!(vocab.documents, 0);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("corpus".parse::<CountPolicy>(), Ok(CountPolicy::CorpusTotal));
        assert_eq!("DF".parse::<CountPolicy>(), Ok(CountPolicy::DocumentFrequency));
        assert!("sometimes".parse::<CountPolicy>().is_err());
    }
}
