//! Append-friendly CSV sink
//!
//! Both crawl outputs (product links, review records) go through this sink.
//! A fresh run truncates the file and writes the header; a resumed run
//! appends rows with no header, so an interrupted crawl grows one file
//! across restarts.

use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing crawl output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// CSV writer that knows whether it is starting fresh or resuming.
pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Opens the sink.
    ///
    /// `fresh` truncates the file and writes `header` as the first row.
    /// Otherwise rows are appended; the header is still written when the
    /// file does not exist yet (a resume pointed at a missing file is a
    /// fresh start in practice).
    pub fn open(path: &Path, header: &[&str], fresh: bool) -> OutputResult<Self> {
        let fresh = fresh || !path.exists();

        let file = if fresh {
            File::create(path)?
        } else {
            OpenOptions::new().append(true).open(path)?
        };

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if fresh {
            writer.write_record(header)?;
            writer.flush()?;
        }

        Ok(Self { writer })
    }

    /// Writes one row and flushes it, so rows survive a kill mid-crawl.
    pub fn write_row<I, T>(&mut self, fields: I) -> OutputResult<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(fields)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Header for the discovery crawl output.
pub const PRODUCT_LINKS_HEADER: [&str; 2] = ["Category", "Product Link"];
