// Transcript page client: plain HTTP GETs with a browser user agent.
//
// Pages are fetched with bounded concurrency but returned in URL order, so
// document i still lines up with label i. There are no retries: the first
// failed request or unrecognized page ends the scrape.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::transcript::TranscriptExtractor;
use crate::corpus::traits::CorpusSource;

/// Desktop browser user agent; the site rejects obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_5) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/50.0.2661.102 Safari/537.36";

/// HTTP client that turns article URLs into transcript text.
pub struct TranscriptClient {
    client: reqwest::Client,
    extractor: TranscriptExtractor,
}

impl TranscriptClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            extractor: TranscriptExtractor::new()?,
        })
    }

    /// GET a page and return its body.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!(url, "GET transcript page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request failed: {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("{url} returned {status}");
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {url}"))
    }

    /// Fetch one page and cut the transcript out of it.
    pub async fn fetch_transcript(&self, url: &str) -> Result<String> {
        let html = self.fetch_page(url).await?;
        let transcript = self
            .extractor
            .extract(&html)
            .with_context(|| format!("Unrecognized transcript page: {url}"))?;
        debug!(url, chars = transcript.len(), "Extracted transcript");
        Ok(transcript)
    }

    /// Fetch every URL, `concurrency` at a time, keeping input order.
    pub async fn fetch_all(&self, urls: &[String], concurrency: usize) -> Result<Vec<String>> {
        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar().template("  Fetching [{bar:30}] {pos}/{len} ({eta})")?,
        );

        let fetches: Vec<_> = urls
            .iter()
            .map(|url| {
                let pb = &pb;
                async move {
                    let transcript = self.fetch_transcript(url).await;
                    pb.inc(1);
                    transcript
                }
            })
            .collect();
        let result: Result<Vec<String>> = stream::iter(fetches)
        .buffered(concurrency.max(1))
        .try_collect()
        .await;

        pb.finish_and_clear();
        let transcripts = result?;

        info!(
            urls = urls.len(),
            concurrency,
            "Scraped transcripts"
        );
        Ok(transcripts)
    }
}

/// A corpus scraped live from a list of article URLs.
pub struct ScrapedCorpus {
    client: TranscriptClient,
    urls: Vec<String>,
    concurrency: usize,
}

impl ScrapedCorpus {
    pub fn new(client: TranscriptClient, urls: Vec<String>, concurrency: usize) -> Self {
        Self {
            client,
            urls,
            concurrency,
        }
    }
}

#[async_trait]
impl CorpusSource for ScrapedCorpus {
    async fn load(&self) -> Result<Vec<String>> {
        self.client.fetch_all(&self.urls, self.concurrency).await
    }

    fn describe(&self) -> String {
        format!("{} live transcript pages", self.urls.len())
    }
}
