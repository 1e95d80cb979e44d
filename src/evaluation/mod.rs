// Evaluation: stratified cross-validation of a classifier over count vectors.

pub mod folds;
pub mod report;
pub mod svm;
pub mod traits;
