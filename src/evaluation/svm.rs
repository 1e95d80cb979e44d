// RBF-kernel support vector classifier on top of linfa-svm.
//
// linfa's SVM separates two classes, so more than two are handled
// one-vs-one with majority voting; ties go to the smallest class label.
// linfa writes the Gaussian kernel as exp(-|x - z|^2 / eps), so eps is the
// reciprocal of gamma.

use std::fmt;

use anyhow::{Context, Result};
use linfa::traits::{Fit, Predict};
use linfa::Dataset;
use linfa_svm::Svm;
use ndarray::{Array1, Array2, Axis};
use tracing::{debug, info};

use super::folds::stratified_k_fold;
use super::traits::Classifier;
use crate::error::PipelineError;
use crate::features::FeatureVector;
use crate::Label;

/// Support vector classifier hyperparameters.
#[derive(Debug, Clone)]
pub struct SvmClassifier {
    /// Soft-margin penalty, applied to both classes of every pair
    pub c: f64,
    /// RBF kernel width: k(x, z) = exp(-gamma * |x - z|^2)
    pub gamma: f64,
    /// Solver stopping tolerance
    pub tolerance: f64,
}

impl Default for SvmClassifier {
    fn default() -> Self {
        Self {
            c: 100.0,
            gamma: 0.001,
            tolerance: 1e-3,
        }
    }
}

/// A trained classifier: one binary machine per class pair.
pub struct SvmModel {
    classes: Vec<Label>,
    machines: Vec<BinaryMachine>,
}

struct BinaryMachine {
    /// Index into `SvmModel::classes` predicted when the machine says true
    positive: usize,
    negative: usize,
    svm: Svm<f64, bool>,
}

impl fmt::Debug for SvmModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvmModel")
            .field("classes", &self.classes)
            .field("machines", &self.machines.len())
            .finish()
    }
}

/// Stack equal-width rows into a matrix.
fn to_matrix(samples: &[Vec<f64>]) -> Result<Array2<f64>> {
    let width = samples.first().map_or(0, Vec::len);
    if let Some(row) = samples.iter().position(|s| s.len() != width) {
        anyhow::bail!(
            "sample {row} has {} features, expected {width}",
            samples[row].len()
        );
    }
    let flat: Vec<f64> = samples.iter().flatten().copied().collect();
    Array2::from_shape_vec((samples.len(), width), flat).context("Failed to build sample matrix")
}

fn to_dense(vectors: &[FeatureVector]) -> Vec<Vec<f64>> {
    vectors
        .iter()
        .map(|v| v.iter().map(|&c| c as f64).collect())
        .collect()
}

impl SvmClassifier {
    /// Train on `samples` with aligned `labels`.
    pub fn fit(&self, samples: &[Vec<f64>], labels: &[Label]) -> Result<SvmModel> {
        if samples.len() != labels.len() {
            return Err(PipelineError::Alignment {
                documents: samples.len(),
                labels: labels.len(),
            }
            .into());
        }

        let mut classes: Vec<Label> = labels.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            return Err(PipelineError::invalid_labels("training data needs at least two classes").into());
        }

        let records = to_matrix(samples)?;
        let mut machines = Vec::new();
        for p in 0..classes.len() {
            for q in (p + 1)..classes.len() {
                let members: Vec<usize> = (0..labels.len())
                    .filter(|&i| labels[i] == classes[p] || labels[i] == classes[q])
                    .collect();
                let targets: Array1<bool> = members.iter().map(|&i| labels[i] == classes[p]).collect();
                let dataset = Dataset::new(records.select(Axis(0), &members), targets);

                let svm = Svm::<f64, bool>::params()
                    .pos_neg_weights(self.c, self.c)
                    .gaussian_kernel(1.0 / self.gamma)
                    .eps(self.tolerance)
                    .fit(&dataset)
                    .with_context(|| {
                        format!("Failed to train SVM for classes {} and {}", classes[p], classes[q])
                    })?;

                machines.push(BinaryMachine {
                    positive: p,
                    negative: q,
                    svm,
                });
            }
        }

        debug!(
            samples = samples.len(),
            classes = classes.len(),
            machines = machines.len(),
            "Trained SVM"
        );

        Ok(SvmModel { classes, machines })
    }
}

impl SvmModel {
    /// Predict the class of each sample.
    pub fn predict(&self, samples: &[Vec<f64>]) -> Result<Vec<Label>> {
        let records = to_matrix(samples)?;
        let mut votes = vec![vec![0usize; self.classes.len()]; samples.len()];

        for machine in &self.machines {
            let decisions: Array1<bool> = machine.svm.predict(&records);
            for (row, &positive) in decisions.iter().enumerate() {
                let winner = if positive {
                    machine.positive
                } else {
                    machine.negative
                };
                votes[row][winner] += 1;
            }
        }

        // First maximum wins, so ties favor the smaller label
        Ok(votes
            .iter()
            .map(|counts| {
                let mut best = 0;
                for (class, &count) in counts.iter().enumerate() {
                    if count > counts[best] {
                        best = class;
                    }
                }
                self.classes[best]
            })
            .collect())
    }

    pub fn classes(&self) -> &[Label] {
        &self.classes
    }
}

impl Classifier for SvmClassifier {
    fn cross_validate(
        &self,
        vectors: &[FeatureVector],
        labels: &[Label],
        folds: usize,
    ) -> Result<Vec<f64>> {
        if vectors.len() != labels.len() {
            return Err(PipelineError::Alignment {
                documents: vectors.len(),
                labels: labels.len(),
            }
            .into());
        }

        let samples = to_dense(vectors);
        let splits = stratified_k_fold(labels, folds)?;
        let mut scores = Vec::with_capacity(splits.len());

        for (index, split) in splits.iter().enumerate() {
            let train_x: Vec<Vec<f64>> = split.train.iter().map(|&i| samples[i].clone()).collect();
            let train_y: Vec<Label> = split.train.iter().map(|&i| labels[i]).collect();
            let model = self
                .fit(&train_x, &train_y)
                .with_context(|| format!("Fold {} failed to train", index + 1))?;

            let test_x: Vec<Vec<f64>> = split.test.iter().map(|&i| samples[i].clone()).collect();
            let predicted = model.predict(&test_x)?;
            let correct = split
                .test
                .iter()
                .zip(&predicted)
                .filter(|&(&i, &p)| labels[i] == p)
                .count();
            let accuracy = correct as f64 / split.test.len() as f64;

            info!(
                fold = index + 1,
                train = split.train.len(),
                test = split.test.len(),
                accuracy,
                "Scored fold"
            );
            scores.push(accuracy);
        }

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clusters() -> (Vec<Vec<f64>>, Vec<Label>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..10 {
            let d = i as f64 * 0.1;
            x.push(vec![0.0 + d, 0.0]);
            y.push(0);
            x.push(vec![5.0 + d, 5.0]);
            y.push(1);
        }
        (x, y)
    }

    #[test]
    fn test_separates_two_clusters() {
        let (x, y) = clusters();
        let svm = SvmClassifier {
            gamma: 0.5,
            c: 10.0,
            ..Default::default()
        };
        let model = svm.fit(&x, &y).unwrap();
        let predicted = model.predict(&[vec![0.2, 0.1], vec![5.3, 4.9]]).unwrap();
        assert_eq!(predicted, vec![0, 1]);
    }

    #[test]
    fn test_three_classes_one_vs_one() {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..6 {
            let d = i as f64 * 0.1;
            x.push(vec![d, 0.0]);
            y.push(2);
            x.push(vec![10.0 + d, 0.0]);
            y.push(7);
            x.push(vec![0.0, 10.0 + d]);
            y.push(9);
        }
        let svm = SvmClassifier {
            gamma: 0.1,
            c: 10.0,
            ..Default::default()
        };
        let model = svm.fit(&x, &y).unwrap();
        assert_eq!(model.classes(), &[2, 7, 9]);
        let predicted = model
            .predict(&[vec![0.1, 0.2], vec![10.2, 0.1], vec![0.2, 10.1]])
            .unwrap();
        assert_eq!(predicted, vec![2, 7, 9]);
    }

    #[test]
    fn test_single_class_rejected() {
        let svm = SvmClassifier::default();
        let err = svm.fit(&[vec![1.0], vec![2.0]], &[1, 1]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InvalidLabels(_))
        ));
    }

    #[test]
    fn test_ragged_samples_rejected() {
        assert!(to_matrix(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        assert_eq!(to_matrix(&[]).unwrap().dim(), (0, 0));
    }

    #[test]
    fn test_cross_validate_on_separable_counts() {
        let mut vectors = Vec::new();
        let mut labels = Vec::new();
        for i in 0..10u32 {
            vectors.push(vec![10 + i % 3, 0, 1]);
            labels.push(1);
            vectors.push(vec![0, 10 + i % 3, 1]);
            labels.push(0);
        }
        let svm = SvmClassifier {
            gamma: 0.01,
            c: 10.0,
            ..Default::default()
        };
        let scores = svm.cross_validate(&vectors, &labels, 5).unwrap();
        assert_eq!(scores.len(), 5);
        assert!(scores.iter().all(|&s| (s - 1.0).abs() < 1e-9), "{scores:?}");
    }
}
