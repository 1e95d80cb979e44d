// Cross-validation results as printed or emitted as JSON.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one evaluation run.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// Where the corpus came from
    pub source: String,
    pub documents: usize,
    pub unigram_features: usize,
    pub bigram_features: usize,
    pub count_policy: String,
    pub case_mode: String,
    /// Per-fold accuracy, in fold order
    pub scores: Vec<f64>,
    pub generated_at: DateTime<Utc>,
}

impl EvaluationReport {
    pub fn folds(&self) -> usize {
        self.scores.len()
    }

    /// Mean fold score (0.0 when there are no folds).
    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    /// Population standard deviation of the fold scores.
    pub fn std_dev(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .scores
            .iter()
            .map(|s| (s - mean) * (s - mean))
            .sum::<f64>()
            / self.scores.len() as f64;
        var.sqrt()
    }
}
