// Corpus source trait: where the documents come from.
//
// Pre-scraped transcript files and live scraping both sit behind this trait,
// so the feature pipeline never sees markup or network details.

use anyhow::Result;
use async_trait::async_trait;

/// Trait for loading an ordered corpus of transcript documents.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Load every document, in label order.
    async fn load(&self) -> Result<Vec<String>>;

    /// Short human-readable description for logs and terminal output.
    fn describe(&self) -> String;
}
