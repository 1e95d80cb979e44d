// Unit tests for cross-validation: fold assignment, the SVM and the report.
//
// All inputs are small hand-built label sequences and count vectors.

use chrono::Utc;
use earcall::error::PipelineError;
use earcall::evaluation::folds::stratified_k_fold;
use earcall::evaluation::report::EvaluationReport;
use earcall::evaluation::svm::SvmClassifier;
use earcall::evaluation::traits::Classifier;
use earcall::features::FeatureVector;

// ============================================================
// Stratified folds
// ============================================================

#[test]
fn classes_fill_folds_in_original_order() {
    // Classes are numbered by first appearance: 1 -> class 0, 0 -> class 1
    let labels = [1, 1, 0, 0, 1, 0];
    let folds = stratified_k_fold(&labels, 3).unwrap();
    let tests: Vec<Vec<usize>> = folds.iter().map(|f| f.test.clone()).collect();
    assert_eq!(tests, vec![vec![0, 2], vec![1, 3], vec![4, 5]]);
}

#[test]
fn train_is_the_complement_of_test() {
    let labels = [0, 1, 0, 1, 0, 1, 0, 1, 1, 1];
    for fold in stratified_k_fold(&labels, 4).unwrap() {
        for i in 0..labels.len() {
            assert_ne!(fold.train.contains(&i), fold.test.contains(&i), "index {i}");
        }
    }
}

#[test]
fn split_depends_only_on_labels() {
    let labels = [3, 1, 3, 3, 1, 2, 2, 3, 1, 2];
    assert_eq!(
        stratified_k_fold(&labels, 3).unwrap(),
        stratified_k_fold(&labels, 3).unwrap()
    );
}

#[test]
fn small_minority_class_is_allowed() {
    // Class 1 has two members for three folds: one fold tests no class-1 sample
    let labels = [0, 0, 0, 0, 0, 0, 1, 1];
    let folds = stratified_k_fold(&labels, 3).unwrap();
    assert_eq!(folds.len(), 3);
    let minority: Vec<usize> = folds
        .iter()
        .map(|f| f.test.iter().filter(|&&i| labels[i] == 1).count())
        .collect();
    assert_eq!(minority.iter().sum::<usize>(), 2);
    assert!(minority.contains(&0));
}

#[test]
fn more_folds_than_samples_is_rejected() {
    let err = stratified_k_fold(&[0, 1], 3).unwrap_err();
    assert_eq!(
        err,
        PipelineError::InvalidFolds {
            folds: 3,
            samples: 2
        }
    );
}

// ============================================================
// Support vector classifier
// ============================================================

/// Two groups of count vectors that share no non-zero features.
fn separable_counts() -> (Vec<FeatureVector>, Vec<i64>) {
    let mut vectors = Vec::new();
    let mut labels = Vec::new();
    for i in 0..10u32 {
        vectors.push(vec![8 + i % 3, 1, 0, 0]);
        labels.push(1);
        vectors.push(vec![0, 0, 1, 8 + i % 3]);
        labels.push(0);
    }
    (vectors, labels)
}

#[test]
fn svm_cross_validates_separable_counts() {
    let (vectors, labels) = separable_counts();
    let svm = SvmClassifier {
        gamma: 0.05,
        ..Default::default()
    };
    let scores = svm.cross_validate(&vectors, &labels, 5).unwrap();
    assert_eq!(scores.len(), 5);
    assert!(scores.iter().all(|&s| s == 1.0), "{scores:?}");
}

#[test]
fn svm_rejects_misaligned_input() {
    let (vectors, labels) = separable_counts();
    let err = SvmClassifier::default()
        .cross_validate(&vectors, &labels[..labels.len() - 1], 5)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::Alignment {
            documents: 20,
            labels: 19
        })
    ));
}

#[test]
fn svm_model_reports_classes_in_sorted_order() {
    let samples = vec![vec![0.0], vec![0.1], vec![4.0], vec![4.1]];
    let labels = [5, 5, -2, -2];
    let model = SvmClassifier {
        gamma: 1.0,
        c: 10.0,
        ..Default::default()
    }
    .fit(&samples, &labels)
    .unwrap();
    assert_eq!(model.classes(), &[-2, 5]);
    assert_eq!(model.predict(&[vec![0.05], vec![3.9]]).unwrap(), vec![5, -2]);
}

// ============================================================
// Report
// ============================================================

#[test]
fn report_summarizes_fold_scores() {
    let report = EvaluationReport {
        source: "call_transcripts.txt".to_string(),
        documents: 50,
        unigram_features: 1000,
        bigram_features: 500,
        count_policy: "corpus".to_string(),
        case_mode: "preserve".to_string(),
        scores: vec![0.6, 0.8, 0.7, 0.9, 0.5],
        generated_at: Utc::now(),
    };
    assert_eq!(report.folds(), 5);
    assert!((report.mean() - 0.7).abs() < 1e-9);
    // population std of {0.6, 0.8, 0.7, 0.9, 0.5} = sqrt(0.02)
    assert!((report.std_dev() - 0.02f64.sqrt()).abs() < 1e-9);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["documents"], 50);
    assert_eq!(json["scores"].as_array().map(|s| s.len()), Some(5));
}
