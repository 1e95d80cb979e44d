// Evaluation pipeline: corpus -> vocabulary -> features -> vectors -> scores.
//
// Each stage takes explicit inputs and returns explicit outputs:
// 1. Load the corpus from its source and check it lines up with the labels
// 2. Count unigrams and bigrams over the whole corpus
// 3. Select the top alphabetic unigrams and bigrams
// 4. Vectorize every document against the fixed feature set
// 5. Cross-validate the classifier over the vectors

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::corpus::traits::CorpusSource;
use crate::error::PipelineError;
use crate::evaluation::report::EvaluationReport;
use crate::evaluation::traits::Classifier;
use crate::features::selection::FeatureSet;
use crate::features::tokenizer::Tokenizer;
use crate::features::vectorizer::{CaseMode, Vectorizer};
use crate::features::vocabulary::{build_vocabulary, CountPolicy, Vocabulary};
use crate::features::FeatureVector;
use crate::Label;

/// Knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub unigrams: usize,
    pub bigrams: usize,
    pub folds: usize,
    pub count_policy: CountPolicy,
    pub case_mode: CaseMode,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            unigrams: 1000,
            bigrams: 500,
            folds: 5,
            count_policy: CountPolicy::CorpusTotal,
            case_mode: CaseMode::Preserve,
        }
    }
}

/// Vocabulary plus the feature set selected from it.
#[derive(Debug, Clone)]
pub struct FeatureStage {
    pub vocabulary: Vocabulary,
    pub features: FeatureSet,
}

/// Load every document from `source`.
pub async fn load_corpus(source: &dyn CorpusSource) -> Result<Vec<String>> {
    source
        .load()
        .await
        .with_context(|| format!("Failed to load corpus from {}", source.describe()))
}

/// Documents and labels must pair up one-to-one by position.
pub fn check_alignment(documents: usize, labels: usize) -> Result<(), PipelineError> {
    if documents != labels {
        return Err(PipelineError::Alignment { documents, labels });
    }
    Ok(())
}

/// Build the vocabulary and select features from it.
pub fn build_features<S: AsRef<str>>(
    corpus: &[S],
    tokenizer: &dyn Tokenizer,
    settings: &PipelineSettings,
) -> Result<FeatureStage, PipelineError> {
    let vocabulary = build_vocabulary(corpus, tokenizer, settings.count_policy);
    let features = FeatureSet::select(&vocabulary, settings.unigrams, settings.bigrams)?;
    Ok(FeatureStage {
        vocabulary,
        features,
    })
}

/// Vectorize the whole corpus against `features`.
pub fn vectorize_corpus<S: AsRef<str>>(
    corpus: &[S],
    tokenizer: &dyn Tokenizer,
    features: &FeatureSet,
    case_mode: CaseMode,
) -> Vec<FeatureVector> {
    Vectorizer::new(tokenizer, features, case_mode).vectorize_all(corpus)
}

/// Run the whole pipeline and score the classifier.
pub async fn run(
    source: &dyn CorpusSource,
    labels: &[Label],
    tokenizer: &dyn Tokenizer,
    classifier: &dyn Classifier,
    settings: &PipelineSettings,
) -> Result<EvaluationReport> {
    let corpus = load_corpus(source).await?;
    check_alignment(corpus.len(), labels.len())?;

    let stage = build_features(&corpus, tokenizer, settings)?;
    let vectors = vectorize_corpus(&corpus, tokenizer, &stage.features, settings.case_mode);

    let scores = classifier.cross_validate(&vectors, labels, settings.folds)?;

    let report = EvaluationReport {
        source: source.describe(),
        documents: corpus.len(),
        unigram_features: stage.features.unigrams.len(),
        bigram_features: stage.features.bigrams.len(),
        count_policy: settings.count_policy.to_string(),
        case_mode: settings.case_mode.to_string(),
        scores,
        generated_at: Utc::now(),
    };

    info!(
        documents = report.documents,
        folds = report.folds(),
        mean = report.mean(),
        std_dev = report.std_dev(),
        "Evaluation complete"
    );

    Ok(report)
}
