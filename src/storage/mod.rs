//! Storage module for the crawl history
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Recording crawl requests as they are made
//! - Recording each crawl's result or failure
//! - Listing recent crawls

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteHistory;
pub use traits::{CrawlHistory, StorageError, StorageResult};

use std::path::{Path, PathBuf};

/// Initializes or opens a history database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteHistory)` - Successfully initialized storage
/// * `Err(HarvestError)` - Failed to initialize storage
pub fn open_history(path: &Path) -> crate::Result<SqliteHistory> {
    SqliteHistory::new(path)
}

/// Represents one recorded crawl request
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub id: i64,
    pub url: String,
    pub save_path: PathBuf,
    pub min_size_kb: u64,
    pub check_nested: bool,
    pub requested_at: String,
    pub status: RequestStatus,
    pub error_message: Option<String>,
    pub result: Option<ResultRecord>,
}

/// Numeric results of a completed crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub finished_at: String,
    pub pages_visited: u64,
    pub urls_found: u64,
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub invalid: u64,
    pub no_extension: u64,
    pub duplicates_removed: u64,
    pub small_files_removed: u64,
    pub elapsed_ms: u64,
}

/// Status of a recorded crawl request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Running,
    Completed,
    Failed,
}

impl RequestStatus {
    /// Converts the status to a database string
    pub fn to_db_string(&self) -> &'static str {
        match self {
            RequestStatus::Running => "running",
            RequestStatus::Completed => "completed",
            RequestStatus::Failed => "failed",
        }
    }

    /// Parses a status from a database string
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(RequestStatus::Running),
            "completed" => Some(RequestStatus::Completed),
            "failed" => Some(RequestStatus::Failed),
            _ => None,
        }
    }
}
