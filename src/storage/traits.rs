//! Storage traits and error types
//!
//! This module defines the trait interface for crawl history backends and
//! associated error types.

use crate::crawler::CrawlRequest;
use crate::output::CrawlAggregate;
use crate::storage::HistoryRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Crawl request not found: {0}")]
    RequestNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for crawl history backends
///
/// A request is recorded before the crawl starts and completed afterwards
/// with either its aggregate or the reason it failed.
pub trait CrawlHistory {
    /// Records a new crawl request
    ///
    /// # Returns
    ///
    /// The ID of the newly created history entry
    fn record_request(&mut self, request: &CrawlRequest) -> StorageResult<i64>;

    /// Stores the result of a finished crawl and marks the request completed
    fn record_result(&mut self, request_id: i64, aggregate: &CrawlAggregate) -> StorageResult<()>;

    /// Marks the request failed with `reason`
    fn record_failure(&mut self, request_id: i64, reason: &str) -> StorageResult<()>;

    /// Gets one history entry by ID
    fn get(&self, request_id: i64) -> StorageResult<HistoryRecord>;

    /// Gets up to `limit` entries, newest first
    fn recent(&self, limit: usize) -> StorageResult<Vec<HistoryRecord>>;
}
