//! Resilient page fetching
//!
//! Every page the crawl reads goes through [`Fetcher::fetch`]: clear
//! cookies, navigate, dismiss the consent banner, scroll around like a
//! person, then read the rendered HTML. Block signals (HTTP 403/429,
//! rate-limit phrases, CAPTCHA challenges, navigation errors) trigger
//! exponential backoff and a retry of the same URL; once the cumulative
//! wait for one URL exhausts the configured budget the URL is abandoned.
//!
//! Abandonment is an outcome, not an error: the controllers decide what a
//! missing page means for their crawl.

use crate::browser::{BrowserSession, CrawlKind, Jitter};
use crate::config::FetchConfig;
use std::time::Duration;

/// Accept button of the cookie-consent banner.
const CONSENT_SELECTOR: &str = "#onetrust-accept-btn-handler";

/// Body phrase the site serves alongside HTTP 429.
const RATE_LIMIT_PHRASE: &str = "too many requests";

/// Result of fetching one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The rendered HTML of the page.
    Page(String),

    /// The wait budget for this URL ran out; there is no content.
    Abandoned,
}

/// Why an attempt was blocked; selects the backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockSignal {
    RateLimit,
    Captcha,
    Error,
}

/// Shared fetch layer for both crawl variants.
pub struct Fetcher<S, J> {
    session: S,
    jitter: J,
    config: FetchConfig,
    navigation_timeout: Duration,
    kind: CrawlKind,
}

impl<S: BrowserSession, J: Jitter> Fetcher<S, J> {
    pub fn new(
        session: S,
        jitter: J,
        config: FetchConfig,
        navigation_timeout: Duration,
        kind: CrawlKind,
    ) -> Self {
        Self {
            session,
            jitter,
            config,
            navigation_timeout,
            kind,
        }
    }

    /// The underlying browser session, for page interaction beyond fetching
    /// (e.g. flipping a sort control).
    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn jitter_mut(&mut self) -> &mut J {
        &mut self.jitter
    }

    /// Gives the session back for teardown.
    pub fn into_session(self) -> S {
        self.session
    }

    /// Fetches a URL, retrying through block signals until the cumulative
    /// wait budget is spent.
    pub async fn fetch(&mut self, url: &str) -> FetchOutcome {
        let mut attempt: u32 = 1;
        let mut total_wait = Duration::ZERO;
        let budget = Duration::from_secs(self.config.max_total_wait_secs);
        let ceiling = Duration::from_secs(self.config.per_wait_ceiling_secs);

        loop {
            match self.attempt(url).await {
                Ok(html) => return FetchOutcome::Page(html),
                Err(signal) => {
                    let delay = self
                        .jitter
                        .backoff_delay(attempt, self.base_for(signal), ceiling);
                    total_wait += delay;

                    if total_wait >= budget {
                        tracing::warn!(
                            "Abandoning {} after {} attempts ({}s waited)",
                            url,
                            attempt,
                            total_wait.as_secs()
                        );
                        return FetchOutcome::Abandoned;
                    }

                    tracing::warn!(
                        "Blocked on {} ({:?}), attempt {}, backing off {}s",
                        url,
                        signal,
                        attempt,
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Sleeps the jittered pause between consecutive pages of one listing
    /// or product.
    pub async fn pause_between_pages(&mut self) {
        tokio::time::sleep(self.jitter.between_pages(self.kind)).await;
    }

    /// Sleeps the jittered pause between products.
    pub async fn pause_between_products(&mut self) {
        tokio::time::sleep(self.jitter.between_products()).await;
    }

    /// One navigation attempt: returns the rendered HTML or the block
    /// signal that stopped it.
    async fn attempt(&mut self, url: &str) -> Result<String, BlockSignal> {
        // Every attempt starts without session state from the last one
        if let Err(e) = self.session.clear_cookies().await {
            tracing::debug!("Failed to clear cookies: {}", e);
        }

        let status = match self.session.navigate(url, self.navigation_timeout).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!("Navigation failed for {}: {}", url, e);
                return Err(BlockSignal::Error);
            }
        };

        if matches!(status, Some(403) | Some(429)) {
            return Err(BlockSignal::RateLimit);
        }

        self.dismiss_cookie_banner().await;
        self.simulate_reading().await;

        let html = match self.session.current_html().await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to read page content for {}: {}", url, e);
                return Err(BlockSignal::Error);
            }
        };

        match classify_content(&html) {
            Some(signal) => Err(signal),
            None => Ok(html),
        }
    }

    /// Clicks the consent banner away if it shows up within the configured
    /// window. Nothing here is allowed to fail the attempt.
    async fn dismiss_cookie_banner(&self) {
        let window = Duration::from_secs(self.config.cookie_banner_timeout_secs);
        match self.session.wait_for_selector(CONSENT_SELECTOR, window).await {
            Ok(true) => {
                if let Err(e) = self.session.click(CONSENT_SELECTOR).await {
                    tracing::debug!("Failed to dismiss cookie banner: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => tracing::debug!("Cookie banner check failed: {}", e),
        }
    }

    /// Scrolls through the page on the jitter's plan, then lets it settle.
    async fn simulate_reading(&mut self) {
        for step in self.jitter.scroll_plan() {
            if let Err(e) = self.session.scroll_by(step.delta).await {
                tracing::debug!("Scroll failed: {}", e);
                break;
            }
            tokio::time::sleep(step.pause).await;
        }
        tokio::time::sleep(self.jitter.settle_wait(self.kind)).await;
    }

    fn base_for(&self, signal: BlockSignal) -> Duration {
        let secs = match signal {
            BlockSignal::RateLimit => self.config.rate_limit_base_secs,
            BlockSignal::Captcha => self.config.captcha_base_secs,
            BlockSignal::Error => self.config.error_base_secs,
        };
        Duration::from_secs(secs)
    }
}

/// Looks for block signals in the rendered page body.
fn classify_content(html: &str) -> Option<BlockSignal> {
    let lower = html.to_lowercase();

    if lower.contains(RATE_LIMIT_PHRASE) {
        return Some(BlockSignal::RateLimit);
    }

    if lower.contains("captcha") || lower.contains("i am not a robot") {
        return Some(BlockSignal::Captcha);
    }

    None
}
