//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the orchestrator's state machine
//! - `DownloadOutcome` / `BatchReport`: per-link classification and per-page batches
//! - `CandidateLink`: a discovered URL with its resolved extension

mod outcome;
mod phase;

// Re-export main types
pub use outcome::{BatchReport, CandidateLink, DownloadOutcome, OutcomeKind};
pub use phase::CrawlPhase;
