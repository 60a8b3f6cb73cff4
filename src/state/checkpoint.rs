//! Crawl progress checkpoints
//!
//! A checkpoint is a single decimal integer in a text file: the index the
//! crawl last dealt with. The store is a trait so controllers can be driven
//! against an in-memory implementation in tests.

use std::fs;
use std::path::PathBuf;

/// Persistence seam for crawl progress.
pub trait CheckpointStore {
    /// Returns the last recorded index, or `None` on a fresh start.
    fn load(&self) -> Option<usize>;

    /// Records `index` as the current progress.
    fn save(&mut self, index: usize) -> std::io::Result<()>;

    /// The index the next run should start from: one past the recorded
    /// progress, or 0 when nothing was recorded.
    fn resume_index(&self) -> usize {
        self.load().map(|k| k + 1).unwrap_or(0)
    }
}

/// File-backed checkpoint store.
///
/// Saves rewrite the whole file through a temp-file rename, so a crash
/// mid-write never leaves a truncated checkpoint behind.
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn load(&self) -> Option<usize> {
        let content = fs::read_to_string(&self.path).ok()?;
        match content.trim().parse() {
            Ok(index) => Some(index),
            Err(_) => {
                tracing::warn!(
                    "Checkpoint file {} is unreadable, starting fresh",
                    self.path.display()
                );
                None
            }
        }
    }

    fn save(&mut self, index: usize) -> std::io::Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, index.to_string())?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
