// earcall: earnings-call transcript features and outcome evaluation
//
// This is the library root. Each module corresponds to a stage of the
// pipeline: load a corpus, count words, select features, vectorize, and
// cross-validate a classifier over the vectors.

pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod output;
pub mod pipeline;
pub mod scrape;

/// Integer outcome aligned by position with a transcript.
pub type Label = i64;
