// Stratified k-fold splitting without shuffling.
//
// Classes are numbered in order of first appearance. Samples are sorted by
// class and dealt round-robin to decide how many of each class every fold
// receives; then each class's samples, in original order, fill fold 0 first,
// fold 1 next, and so on. The split depends only on the label sequence.

use tracing::warn;

use crate::error::PipelineError;
use crate::Label;

/// Train/test indices for one fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split `labels` into `k` stratified folds.
pub fn stratified_k_fold(labels: &[Label], k: usize) -> Result<Vec<Fold>, PipelineError> {
    let n = labels.len();
    if k < 2 || k > n {
        return Err(PipelineError::InvalidFolds {
            folds: k,
            samples: n,
        });
    }

    // Encode classes by first appearance
    let mut classes: Vec<Label> = Vec::new();
    let encoded: Vec<usize> = labels
        .iter()
        .map(|label| match classes.iter().position(|c| c == label) {
            Some(i) => i,
            None => {
                classes.push(*label);
                classes.len() - 1
            }
        })
        .collect();

    let mut class_counts = vec![0usize; classes.len()];
    for &c in &encoded {
        class_counts[c] += 1;
    }

    if class_counts.iter().all(|&count| count < k) {
        return Err(PipelineError::invalid_labels(format!(
            "no class has at least {k} members"
        )));
    }
    if let Some(&smallest) = class_counts.iter().min() {
        if smallest < k {
            warn!(
                smallest_class = smallest,
                folds = k,
                "Least populated class has fewer members than folds"
            );
        }
    }

    // allocation[fold][class]: how many of each class land in each test fold
    let mut sorted = encoded.clone();
    sorted.sort_unstable();
    let mut allocation = vec![vec![0usize; classes.len()]; k];
    for (i, &c) in sorted.iter().enumerate() {
        allocation[i % k][c] += 1;
    }

    let mut test_fold = vec![0usize; n];
    for class in 0..classes.len() {
        let assignments =
            (0..k).flat_map(|fold| std::iter::repeat(fold).take(allocation[fold][class]));
        let members = encoded
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == class)
            .map(|(i, _)| i);
        for (sample, fold) in members.zip(assignments) {
            test_fold[sample] = fold;
        }
    }

    Ok((0..k)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..n).partition(|&i| test_fold[i] == fold);
            Fold { train, test }
        })
        .collect())
}
