//! Randomized timing policy for human-like crawling
//!
//! Every wait the crawl takes between observable actions (scrolls, page
//! turns, settle pauses) is drawn through this trait, so production runs
//! get irregular timing and tests get a deterministic zero-wait policy.

use rand::Rng;
use std::time::Duration;

/// Which crawl variant is asking; the two variants pace differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlKind {
    Discovery,
    Reviews,
}

/// One step of a scroll simulation: signed pixel delta, then a pause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStep {
    pub delta: f64,
    pub pause: Duration,
}

/// Source of all randomized crawl timing.
pub trait Jitter {
    /// Plan for one scroll simulation: 3-6 steps, mostly downward.
    fn scroll_plan(&mut self) -> Vec<ScrollStep>;

    /// Long pause after interacting with a page, before reading its HTML.
    fn settle_wait(&mut self, kind: CrawlKind) -> Duration;

    /// Pause before fetching the next page of the same listing or product.
    fn between_pages(&mut self, kind: CrawlKind) -> Duration;

    /// Pause before moving on to the next product.
    fn between_products(&mut self) -> Duration;

    /// Backoff before retry `attempt` (1-based): the base doubles per
    /// attempt, capped at `ceiling`. Deterministic, but on the trait so
    /// tests can shrink it to zero alongside the other waits.
    fn backoff_delay(&self, attempt: u32, base: Duration, ceiling: Duration) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        base.saturating_mul(factor).min(ceiling)
    }
}

/// Production jitter: uniform draws from ranges tuned to look like a person
/// skimming a directory site.
#[derive(Debug, Default)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn scroll_plan(&mut self) -> Vec<ScrollStep> {
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(3..=6);

        (0..count)
            .map(|_| {
                let distance = rng.gen_range(200.0..900.0);
                // Mostly down the page, occasionally back up
                let delta = if rng.gen_bool(0.8) { distance } else { -distance };
                ScrollStep {
                    delta,
                    pause: Duration::from_millis(rng.gen_range(500..=3000)),
                }
            })
            .collect()
    }

    fn settle_wait(&mut self, kind: CrawlKind) -> Duration {
        let mut rng = rand::thread_rng();
        let millis = match kind {
            CrawlKind::Discovery => rng.gen_range(4_000..=9_000),
            CrawlKind::Reviews => rng.gen_range(8_000..=15_000),
        };
        Duration::from_millis(millis)
    }

    fn between_pages(&mut self, kind: CrawlKind) -> Duration {
        let mut rng = rand::thread_rng();
        let millis = match kind {
            CrawlKind::Discovery => rng.gen_range(5_000..=10_000),
            CrawlKind::Reviews => rng.gen_range(3_000..=6_000),
        };
        Duration::from_millis(millis)
    }

    fn between_products(&mut self) -> Duration {
        let mut rng = rand::thread_rng();
        Duration::from_millis(rng.gen_range(5_000..=8_000))
    }
}
