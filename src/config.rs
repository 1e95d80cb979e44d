use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::features::vectorizer::CaseMode;
use crate::features::vocabulary::CountPolicy;
use crate::pipeline::evaluate::PipelineSettings;
use crate::scrape::client::DEFAULT_USER_AGENT;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command-line
/// flags override individual fields after loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// Newline-separated article URLs (only read when scraping)
    pub urls_path: PathBuf,
    /// Pre-scraped transcripts joined by `separator`
    pub transcripts_path: PathBuf,
    /// CSV file holding one integer label per document
    pub labels_path: PathBuf,
    pub separator: String,
    /// Zero-based CSV column holding the label
    pub label_column: usize,
    /// Skip the first row of the label file
    pub labels_have_header: bool,
    pub unigrams: usize,
    pub bigrams: usize,
    pub folds: usize,
    pub count_policy: CountPolicy,
    pub case_mode: CaseMode,
    /// SVM soft-margin penalty
    pub svm_c: f64,
    /// SVM RBF kernel width
    pub svm_gamma: f64,
    pub user_agent: String,
    /// Pages fetched in parallel while scraping
    pub concurrency: usize,
}

/// Read `key`, falling back to `default` when unset. A set but malformed
/// value is an error rather than a silent default.
fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key}={raw:?} is invalid: {e}")),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e).with_context(|| format!("Failed to read {key}")),
    }
}

/// The transcript separator; unset means "SEPARATOR", empty is an error.
fn separator(raw: Option<String>) -> Result<String> {
    match raw {
        None => Ok("SEPARATOR".to_string()),
        Some(sep) if sep.is_empty() => {
            anyhow::bail!("EARCALL_SEPARATOR is set but empty; transcripts cannot be split on \"\"")
        }
        Some(sep) => Ok(sep),
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every field has a default; paths default to files in the working directory.
    pub fn load() -> Result<Self> {
        Ok(Self {
            urls_path: env_or("EARCALL_URLS_PATH", PathBuf::from("urls.txt"))?,
            transcripts_path: env_or(
                "EARCALL_TRANSCRIPTS_PATH",
                PathBuf::from("call_transcripts.txt"),
            )?,
            labels_path: env_or(
                "EARCALL_LABELS_PATH",
                PathBuf::from("quarterly_earnings_data.csv"),
            )?,
            separator: separator(env::var("EARCALL_SEPARATOR").ok())?,
            label_column: env_or("EARCALL_LABEL_COLUMN", 1)?,
            labels_have_header: env_or("EARCALL_LABELS_HEADER", false)?,
            unigrams: env_or("EARCALL_UNIGRAMS", 1000)?,
            bigrams: env_or("EARCALL_BIGRAMS", 500)?,
            folds: env_or("EARCALL_FOLDS", 5)?,
            count_policy: env_or("EARCALL_COUNT_POLICY", CountPolicy::CorpusTotal)?,
            case_mode: env_or("EARCALL_CASE_MODE", CaseMode::Preserve)?,
            svm_c: env_or("EARCALL_SVM_C", 100.0)?,
            svm_gamma: env_or("EARCALL_SVM_GAMMA", 0.001)?,
            user_agent: env::var("EARCALL_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            concurrency: env_or("EARCALL_CONCURRENCY", 4)?,
        })
    }

    /// Pipeline knobs derived from this configuration.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            unigrams: self.unigrams,
            bigrams: self.bigrams,
            folds: self.folds,
            count_policy: self.count_policy,
            case_mode: self.case_mode,
        }
    }

    /// Check that the transcript file exists.
    /// Call this before any command that reads the pre-scraped corpus.
    pub fn require_transcripts(&self) -> Result<()> {
        require_file(
            &self.transcripts_path,
            "Transcript file",
            "Run `earcall scrape` to build it, or set EARCALL_TRANSCRIPTS_PATH.",
        )
    }

    /// Check that the label file exists.
    pub fn require_labels(&self) -> Result<()> {
        require_file(
            &self.labels_path,
            "Label file",
            "Set EARCALL_LABELS_PATH to the CSV of outcomes.",
        )
    }

    /// Check that the URL list exists.
    pub fn require_urls(&self) -> Result<()> {
        require_file(
            &self.urls_path,
            "URL list",
            "Set EARCALL_URLS_PATH to a file with one article URL per line.",
        )
    }
}

fn require_file(path: &Path, what: &str, hint: &str) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!("{what} not found at {}\n{hint}", path.display());
    }
    Ok(())
}
