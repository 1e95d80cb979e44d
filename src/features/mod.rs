// Feature extraction: vocabulary, top-N selection, count vectors.

pub mod selection;
pub mod tokenizer;
pub mod vectorizer;
pub mod vocabulary;

/// An ordered pair of adjacent tokens.
pub type Bigram = (String, String);

/// Per-feature occurrence counts for one document.
pub type FeatureVector = Vec<u32>;
