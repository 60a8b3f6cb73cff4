//! Liveness heartbeat file
//!
//! Each crawl attempt overwrites a one-line file with a timestamp and the
//! index being worked on. An external watchdog reads the timestamp to tell
//! a long backoff from a hung process.

use chrono::Utc;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Which crawl variant the heartbeat belongs to; shows up verbatim in the
/// heartbeat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatKind {
    Category,
    Product,
}

impl fmt::Display for HeartbeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeartbeatKind::Category => write!(f, "Category"),
            HeartbeatKind::Product => write!(f, "Product"),
        }
    }
}

/// Writes heartbeat lines of the form
/// `2024-05-01T12:00:00+00:00 - Category Index: 17`.
pub struct Heartbeat {
    path: PathBuf,
    kind: HeartbeatKind,
}

impl Heartbeat {
    pub fn new(path: impl Into<PathBuf>, kind: HeartbeatKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Overwrites the heartbeat file for the given index. Failures are
    /// logged, not propagated: a missing heartbeat must never stop a crawl.
    pub fn beat(&self, index: usize) {
        let line = format!(
            "{} - {} Index: {}",
            Utc::now().to_rfc3339(),
            self.kind,
            index
        );
        if let Err(e) = fs::write(&self.path, line) {
            tracing::warn!("Failed to write heartbeat {}: {}", self.path.display(), e);
        }
    }
}
