// Transcript and URL list files.
//
// Transcripts are stored as one text file with a literal separator token
// between documents. Splitting is literal: a trailing separator produces a
// trailing empty document, which the alignment check then reports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use super::traits::CorpusSource;

/// Split the contents of a transcript file into documents.
pub fn split_transcripts(raw: &str, separator: &str) -> Vec<String> {
    raw.split(separator).map(str::to_string).collect()
}

/// Join documents back into transcript-file form.
pub fn join_transcripts<S: AsRef<str>>(documents: &[S], separator: &str) -> String {
    documents
        .iter()
        .map(|d| d.as_ref())
        .collect::<Vec<&str>>()
        .join(separator)
}

/// A pre-scraped transcript file.
pub struct TranscriptFile {
    path: PathBuf,
    separator: String,
}

impl TranscriptFile {
    pub fn new(path: impl Into<PathBuf>, separator: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            separator: separator.into(),
        }
    }

    /// Write `documents` to `path`, joined by `separator`.
    pub async fn write<S: AsRef<str>>(path: &Path, documents: &[S], separator: &str) -> Result<()> {
        let contents = join_transcripts(documents, separator);
        tokio::fs::write(path, contents)
            .await
            .with_context(|| format!("Failed to write transcripts to {}", path.display()))?;
        info!(
            path = %path.display(),
            documents = documents.len(),
            "Wrote transcript file"
        );
        Ok(())
    }
}

#[async_trait]
impl CorpusSource for TranscriptFile {
    async fn load(&self) -> Result<Vec<String>> {
        anyhow::ensure!(!self.separator.is_empty(), "Transcript separator must not be empty");
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read transcripts from {}", self.path.display()))?;
        let documents = split_transcripts(&raw, &self.separator);
        info!(
            path = %self.path.display(),
            documents = documents.len(),
            "Loaded transcript file"
        );
        Ok(documents)
    }

    fn describe(&self) -> String {
        format!("transcript file {}", self.path.display())
    }
}

/// Parse a newline-separated URL list, skipping blank lines.
pub fn parse_url_list(raw: &str) -> Vec<String> {
    let lines: Vec<&str> = raw.lines().collect();
    let mut urls = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let url = line.trim();
        if url.is_empty() {
            if i + 1 < lines.len() {
                debug!(line = i + 1, "Skipping blank line in URL list");
            }
            continue;
        }
        urls.push(url.to_string());
    }
    urls
}

/// Read and parse a URL list file.
pub async fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read URL list from {}", path.display()))?;
    Ok(parse_url_list(&raw))
}
