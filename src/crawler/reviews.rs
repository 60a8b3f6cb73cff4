//! Review crawl: product review pages -> normalized review records
//!
//! Products are plentiful and individually expendable: a product that fails
//! is logged and skipped, never retried, and the checkpoint advances after
//! every attempt so a crash resumes at the next product rather than looping
//! on a poisoned one.
//!
//! Reviews are read newest-first; the scan of a product stops at the first
//! review past the age cutoff, and no later page of that product is
//! fetched.

use crate::browser::{BrowserSession, Jitter};
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::crawler::page_url;
use crate::extract::{
    extract_reviews, extract_tool_name, is_older_than_threshold, page_count_from_pager,
    ReviewRecord,
};
use crate::input::Product;
use crate::output::CsvSink;
use crate::state::{CheckpointStore, Heartbeat};
use crate::{Result, TrawlError};
use std::time::Duration;

/// Sort control on the review page and its newest-first option.
const SORT_CONTROL: &str = "#sortOrder";
const SORT_MOST_RECENT: &str = "#sortOrder option[value='MOST_RECENT']";

/// How long to wait for the sort control before concluding the page has
/// none.
const SORT_CONTROL_WINDOW: Duration = Duration::from_secs(3);

/// Outcome of one product attempt.
enum AttemptError {
    /// The product is skipped; the crawl moves on.
    Skip(String),

    /// The run cannot continue (output file broke).
    Fatal(TrawlError),
}

/// Controller for the review crawl.
pub struct ReviewCrawler<S, J, C> {
    fetcher: Fetcher<S, J>,
    checkpoint: C,
    heartbeat: Heartbeat,
    sink: CsvSink,
    max_age_months: u32,
    persist_checkpoint: bool,
}

impl<S, J, C> ReviewCrawler<S, J, C>
where
    S: BrowserSession,
    J: Jitter,
    C: CheckpointStore,
{
    pub fn new(
        fetcher: Fetcher<S, J>,
        checkpoint: C,
        heartbeat: Heartbeat,
        sink: CsvSink,
        max_age_months: u32,
        persist_checkpoint: bool,
    ) -> Self {
        Self {
            fetcher,
            checkpoint,
            heartbeat,
            sink,
            max_age_months,
            persist_checkpoint,
        }
    }

    /// Gives the fetch layer back for teardown.
    pub fn into_fetcher(self) -> Fetcher<S, J> {
        self.fetcher
    }

    /// Crawls the given product indices, strictly in order.
    pub async fn run(&mut self, products: &[Product], indices: &[usize]) -> Result<()> {
        tracing::info!(
            "Review crawl over {} of {} products",
            indices.len(),
            products.len()
        );

        for (position, &index) in indices.iter().enumerate() {
            if position > 0 {
                self.fetcher.pause_between_products().await;
            }

            self.heartbeat.beat(index);
            let product = &products[index];

            match self.crawl_product(product).await {
                Ok(written) => {
                    tracing::info!("Product {} ({}): {} reviews", index, product.link, written);
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Skip(reason)) => {
                    tracing::warn!("Product {} ({}) skipped: {}", index, product.link, reason);
                }
            }

            // The checkpoint records the attempt, successful or not
            if self.persist_checkpoint {
                self.checkpoint.save(index)?;
            }
        }

        tracing::info!("Review crawl finished");
        Ok(())
    }

    /// One product: first review page, sort toggle, then the remaining
    /// pages until the pager ends or an over-age review stops the scan.
    async fn crawl_product(&mut self, product: &Product) -> std::result::Result<usize, AttemptError> {
        let FetchOutcome::Page(html) = self.fetcher.fetch(&product.link).await else {
            return Err(AttemptError::Skip("fetch abandoned".to_string()));
        };

        let html = self.apply_recent_sort(html).await;
        let tool = extract_tool_name(&html);

        let (mut written, stopped) = self.scan_page(product, &tool, &html)?;
        if stopped {
            return Ok(written);
        }

        let page_count = page_count_from_pager(&html);
        tracing::debug!("Product '{}' spans {} review pages", tool, page_count);

        for page in 2..=page_count {
            self.fetcher.pause_between_pages().await;

            let url = page_url(&product.link, page);
            match self.fetcher.fetch(&url).await {
                FetchOutcome::Page(html) => {
                    let (count, stopped) = self.scan_page(product, &tool, &html)?;
                    written += count;
                    if stopped {
                        break;
                    }
                }
                // That page's reviews are lost; the product carries on
                FetchOutcome::Abandoned => {
                    tracing::warn!("Skipping review page {} of '{}'", page, tool);
                }
            }
        }

        Ok(written)
    }

    /// Switches the review list to newest-first when the page offers a sort
    /// control; the early-stop scan depends on that order. Pages without
    /// the control already sort newest-first.
    async fn apply_recent_sort(&mut self, html: String) -> String {
        let session = self.fetcher.session();

        match session.wait_for_selector(SORT_CONTROL, SORT_CONTROL_WINDOW).await {
            Ok(true) => {}
            Ok(false) => return html,
            Err(e) => {
                tracing::debug!("Sort control check failed: {}", e);
                return html;
            }
        }

        if let Err(e) = session.click(SORT_CONTROL).await {
            tracing::debug!("Failed to open sort control: {}", e);
            return html;
        }
        if let Err(e) = session.click(SORT_MOST_RECENT).await {
            tracing::debug!("Failed to select most-recent sort: {}", e);
            return html;
        }

        // Give the list a moment to re-render before re-reading
        tokio::time::sleep(Duration::from_secs(1)).await;
        match session.current_html().await {
            Ok(resorted) => resorted,
            Err(e) => {
                tracing::warn!("Failed to re-read page after sorting: {}", e);
                html
            }
        }
    }

    /// Writes the page's reviews until one is past the age cutoff. Returns
    /// how many were written and whether the cutoff was hit.
    fn scan_page(
        &mut self,
        product: &Product,
        tool: &str,
        html: &str,
    ) -> std::result::Result<(usize, bool), AttemptError> {
        let mut written = 0;

        for mut review in extract_reviews(html, tool) {
            if is_older_than_threshold(&review.date, self.max_age_months) {
                tracing::debug!(
                    "Hit review older than {} months for '{}', stopping",
                    self.max_age_months,
                    tool
                );
                return Ok((written, true));
            }
            review.category = product.category.clone();
            review.product_link = product.link.clone();
            self.write_review(&review)?;
            written += 1;
        }

        Ok((written, false))
    }

    fn write_review(&mut self, review: &ReviewRecord) -> std::result::Result<(), AttemptError> {
        self.sink
            .write_row(review.as_fields())
            .map_err(|e| AttemptError::Fatal(e.into()))
    }
}
