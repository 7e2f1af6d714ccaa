//! Media-Harvest: a media link crawler and downloader
//!
//! This crate fetches a web page, extracts candidate media links with
//! pattern heuristics, downloads the ones that carry a known media extension,
//! optionally follows same-origin extension-less links for one more round,
//! and prunes the save directory by minimum size and duplicate content.

pub mod config;
pub mod crawler;
pub mod output;
pub mod prune;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Media-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid crawl request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors raised while opening a connection or reading a response
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported protocol '{scheme}' in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("Connection to {url} failed: {source}")]
    Connect { url: String, source: reqwest::Error },

    #[error("Timed out waiting for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed reading body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Invalid header value '{value}': {reason}")]
    InvalidHeader { value: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors that turn a single media download into a failed outcome
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Transport(#[from] TransportError),

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

    #[error("Invalid link pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Result type alias for Media-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for transport operations
pub type TransportResult<T> = std::result::Result<T, TransportError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, CrawlRequest};
pub use output::CrawlAggregate;
pub use state::{CrawlPhase, DownloadOutcome};
pub use crate::url::{clean_origin, file_extension, is_valid_url};
