//! Crawl controllers and the resilient fetch layer
//!
//! This module contains the core crawling logic:
//! - `fetcher`: cookie reset, human-like interaction, backoff, abandonment
//! - `discovery`: categories -> product review-page links (retries forever)
//! - `reviews`: product pages -> normalized review records (never retries)
//!
//! Both controllers walk their work list strictly in index order, one fetch
//! in flight at a time.

mod discovery;
mod fetcher;
mod reviews;

pub use discovery::DiscoveryCrawler;
pub use fetcher::{FetchOutcome, Fetcher};
pub use reviews::ReviewCrawler;

/// Where a crawl run starts, before the checkpoint is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartIndex {
    /// Explicit zero-based index into the work list.
    Index(usize),

    /// Midpoint of the work list (discovery only).
    Half,
}

/// The ordered indices one run will visit.
///
/// Forward runs go from the explicit start (or the checkpoint's resume
/// index) to the end of the list. Backward runs replay `[0..=start]` in
/// reverse; the checkpoint is ignored as a starting point and the default
/// start is the last index.
pub fn plan_indices(
    total: usize,
    resume_index: usize,
    start: Option<usize>,
    backward: bool,
) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }

    if backward {
        let start = start.unwrap_or(total - 1).min(total - 1);
        (0..=start).rev().collect()
    } else {
        let start = start.unwrap_or(resume_index);
        (start..total).collect()
    }
}

/// Appends the page number to a listing or review URL.
///
/// Page 1 is the bare URL; later pages get a `page` query parameter,
/// appended with `&` when the URL already carries a query.
pub fn page_url(base: &str, page: usize) -> String {
    if page <= 1 {
        return base.to_string();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", base, separator, page)
}
