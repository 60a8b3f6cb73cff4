//! Headless browser layer
//!
//! The crawl fetches through a real browser so the pages render their
//! JavaScript and the traffic looks like a person's. Everything above this
//! module talks to the [`BrowserSession`] trait; the chromium-backed
//! implementation lives in `session`, and all randomized human-like timing
//! comes from the [`Jitter`] policy in `jitter`.

mod jitter;
mod session;

pub use jitter::{CrawlKind, Jitter, RandomJitter, ScrollStep};
pub use session::{BrowserSession, ChromiumSession, SessionError};
