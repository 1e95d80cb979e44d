// Domain errors for the transcript pipeline.
//
// Plumbing (file I/O, HTTP, config) goes through anyhow with context; these
// are the failures that carry meaning for the pipeline itself. They convert
// into anyhow::Error with `?` and can be downcast back by callers and tests.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Page markup did not contain the expected transcript markers.
    #[error("transcript markup not recognized: {0}")]
    ScrapeFormat(String),

    /// More features were requested than the count table can supply.
    #[error(
        "requested {requested} features but only {available} alphabetic keys are available"
    )]
    FeatureSelectionRange { requested: usize, available: usize },

    /// The corpus and the label file disagree on the number of entries.
    #[error("{documents} documents but {labels} labels; they must align by position")]
    Alignment { documents: usize, labels: usize },

    /// A label row could not be parsed.
    #[error("label row {row}: {reason}")]
    LabelParse { row: usize, reason: String },

    /// The label set cannot support the requested evaluation.
    #[error("invalid labels: {0}")]
    InvalidLabels(String),

    /// The fold count is out of range for the sample count.
    #[error("invalid fold count {folds} for {samples} samples")]
    InvalidFolds { folds: usize, samples: usize },
}

impl PipelineError {
    pub fn scrape_format<S: Into<String>>(msg: S) -> Self {
        PipelineError::ScrapeFormat(msg.into())
    }

    pub fn invalid_labels<S: Into<String>>(msg: S) -> Self {
        PipelineError::InvalidLabels(msg.into())
    }
}
