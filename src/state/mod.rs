//! State module for tracking crawl progress
//!
//! This module provides the resumption machinery shared by both crawl
//! variants.
//!
//! # Components
//!
//! - `CheckpointStore`: persistence seam for the last handled index
//! - `FileCheckpointStore`: single-integer text file implementation
//! - `Heartbeat`: per-attempt liveness file for external watchdogs

mod checkpoint;
mod heartbeat;

// Re-export main types
pub use checkpoint::{CheckpointStore, FileCheckpointStore};
pub use heartbeat::{Heartbeat, HeartbeatKind};
