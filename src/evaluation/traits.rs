// Classifier trait: the evaluation boundary.
//
// The feature pipeline only needs "vectors in, per-fold scores out". The
// default implementation is an RBF-kernel SVM, but anything that can run
// cross-validation over count vectors plugs in here.

use anyhow::Result;

use crate::features::FeatureVector;
use crate::Label;

/// Trait for cross-validating a classifier over vectorized documents.
pub trait Classifier {
    /// Split into `folds` folds, train on the rest, score each held-out fold.
    ///
    /// Returns one score per fold, in fold order.
    fn cross_validate(
        &self,
        vectors: &[FeatureVector],
        labels: &[Label],
        folds: usize,
    ) -> Result<Vec<f64>>;
}
