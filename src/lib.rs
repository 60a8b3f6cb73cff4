//! Review-Trawler: a resilient review-directory crawler
//!
//! This crate implements a sequential crawl-and-extract pipeline for a
//! software-review directory. A discovery crawl walks category listing pages
//! and collects product review-page links; a review crawl walks those product
//! pages and extracts normalized review records. Both variants checkpoint
//! their progress to flat files and resume after interruption, and both fetch
//! through a headless browser session with human-like interaction to avoid
//! bot detection.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod input;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Review-Trawler operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser session error: {0}")]
    Session(#[from] browser::SessionError),

    #[error("Input file not found: {path}")]
    InputMissing { path: String },

    #[error("Failed to parse input file {path}: {message}")]
    InputParse { path: String, message: String },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Review-Trawler operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use browser::{BrowserSession, CrawlKind, Jitter, RandomJitter, SessionError};
pub use config::Config;
pub use crawler::{DiscoveryCrawler, FetchOutcome, Fetcher, ReviewCrawler, StartIndex};
pub use extract::ReviewRecord;
pub use state::{CheckpointStore, FileCheckpointStore, Heartbeat, HeartbeatKind};
