//! Discovery crawl: category listings -> product review-page links
//!
//! Categories are too few to lose: a failed category attempt is retried
//! forever with bounded exponential backoff, and the checkpoint only moves
//! past a category once it went through completely.

use crate::browser::{BrowserSession, Jitter};
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::crawler::page_url;
use crate::extract::{extract_product_links, page_count_from_hrefs};
use crate::input::Category;
use crate::output::CsvSink;
use crate::state::{CheckpointStore, Heartbeat};
use crate::{Result, TrawlError};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Outcome of one category attempt.
enum AttemptError {
    /// Transient; the category will be retried.
    Retry(String),

    /// The run cannot continue (output file broke).
    Fatal(TrawlError),
}

/// Controller for the discovery crawl.
pub struct DiscoveryCrawler<S, J, C> {
    fetcher: Fetcher<S, J>,
    checkpoint: C,
    heartbeat: Heartbeat,
    sink: CsvSink,
    origin: Url,
    reviews_prefix: String,
    retry_base: Duration,
    retry_max: Duration,
    persist_checkpoint: bool,
}

impl<S, J, C> DiscoveryCrawler<S, J, C>
where
    S: BrowserSession,
    J: Jitter,
    C: CheckpointStore,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fetcher: Fetcher<S, J>,
        checkpoint: C,
        heartbeat: Heartbeat,
        sink: CsvSink,
        origin: Url,
        reviews_prefix: String,
        retry_base: Duration,
        retry_max: Duration,
        persist_checkpoint: bool,
    ) -> Self {
        Self {
            fetcher,
            checkpoint,
            heartbeat,
            sink,
            origin,
            reviews_prefix,
            retry_base,
            retry_max,
            persist_checkpoint,
        }
    }

    /// Gives the fetch layer back for teardown.
    pub fn into_fetcher(self) -> Fetcher<S, J> {
        self.fetcher
    }

    /// Crawls the given category indices, strictly in order.
    pub async fn run(&mut self, categories: &[Category], indices: &[usize]) -> Result<()> {
        tracing::info!(
            "Discovery crawl over {} of {} categories",
            indices.len(),
            categories.len()
        );

        for &index in indices {
            let category = &categories[index];
            self.crawl_category_forever(index, category).await?;

            if self.persist_checkpoint {
                self.checkpoint.save(index)?;
            }
        }

        tracing::info!("Discovery crawl finished");
        Ok(())
    }

    /// Retries one category until it succeeds. Only a broken output file
    /// ends the run.
    async fn crawl_category_forever(&mut self, index: usize, category: &Category) -> Result<()> {
        let mut retry: u32 = 0;

        loop {
            self.heartbeat.beat(index);

            match self.crawl_category(category).await {
                Ok(written) => {
                    tracing::info!(
                        "Category {} '{}': {} product links",
                        index,
                        category.text,
                        written
                    );
                    return Ok(());
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Retry(reason)) => {
                    let delay = self
                        .fetcher
                        .jitter_mut()
                        .backoff_delay(retry + 1, self.retry_base, self.retry_max);
                    tracing::warn!(
                        "Category {} '{}' failed ({}), retry {} in {}s",
                        index,
                        category.text,
                        reason,
                        retry + 1,
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
            }
        }
    }

    /// One pass over a category: first listing page, then the rest of the
    /// pager. Returns how many links were written.
    async fn crawl_category(
        &mut self,
        category: &Category,
    ) -> std::result::Result<usize, AttemptError> {
        let FetchOutcome::Page(html) = self.fetcher.fetch(&category.href).await else {
            return Err(AttemptError::Retry("listing fetch abandoned".to_string()));
        };

        let page_count = page_count_from_hrefs(&html);
        tracing::debug!("Category '{}' spans {} pages", category.text, page_count);

        let mut seen = HashSet::new();
        let mut written = self.write_links(&category.text, &html, &mut seen)?;

        for page in 2..=page_count {
            self.fetcher.pause_between_pages().await;

            let url = page_url(&category.href, page);
            match self.fetcher.fetch(&url).await {
                FetchOutcome::Page(html) => {
                    written += self.write_links(&category.text, &html, &mut seen)?;
                }
                // Later pages are skipped, not retried; the first page
                // carrying the pager already succeeded
                FetchOutcome::Abandoned => {
                    tracing::warn!("Skipping page {} of '{}'", page, category.text);
                }
            }
        }

        Ok(written)
    }

    /// Extracts product links from one listing page and writes the ones not
    /// seen earlier in this category.
    fn write_links(
        &mut self,
        category: &str,
        html: &str,
        seen: &mut HashSet<String>,
    ) -> std::result::Result<usize, AttemptError> {
        let mut written = 0;

        for link in extract_product_links(html, &self.origin, &self.reviews_prefix) {
            if !seen.insert(link.clone()) {
                continue;
            }
            self.sink
                .write_row([category, link.as_str()])
                .map_err(|e| AttemptError::Fatal(e.into()))?;
            written += 1;
        }

        Ok(written)
    }
}
