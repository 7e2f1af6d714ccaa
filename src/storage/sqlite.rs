//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the CrawlHistory trait.

use crate::crawler::CrawlRequest;
use crate::output::CrawlAggregate;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{CrawlHistory, StorageError, StorageResult};
use crate::storage::{HistoryRecord, RequestStatus, ResultRecord};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};

const SELECT_HISTORY: &str = "
    SELECT r.id, r.url, r.save_path, r.min_size_kb, r.check_nested, r.requested_at,
           r.status, r.error_message,
           s.finished_at, s.pages_visited, s.urls_found, s.processed, s.succeeded,
           s.failed, s.invalid, s.no_extension, s.duplicates_removed,
           s.small_files_removed, s.elapsed_ms
    FROM crawl_requests r
    LEFT JOIN crawl_results s ON s.request_id = r.id";

/// SQLite history backend
pub struct SqliteHistory {
    conn: Connection,
}

impl SqliteHistory {
    /// Creates a new SqliteHistory instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteHistory)` - Successfully opened/created database
    /// * `Err(HarvestError)` - Failed to open database
    pub fn new(path: &Path) -> crate::Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn request_exists(&self, request_id: i64) -> StorageResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM crawl_requests WHERE id = ?1",
                params![request_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

fn history_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryRecord> {
    let finished_at: Option<String> = row.get(8)?;

    let result = match finished_at {
        Some(finished_at) => Some(ResultRecord {
            finished_at,
            pages_visited: row.get::<_, i64>(9)? as u64,
            urls_found: row.get::<_, i64>(10)? as u64,
            processed: row.get::<_, i64>(11)? as u64,
            succeeded: row.get::<_, i64>(12)? as u64,
            failed: row.get::<_, i64>(13)? as u64,
            invalid: row.get::<_, i64>(14)? as u64,
            no_extension: row.get::<_, i64>(15)? as u64,
            duplicates_removed: row.get::<_, i64>(16)? as u64,
            small_files_removed: row.get::<_, i64>(17)? as u64,
            elapsed_ms: row.get::<_, i64>(18)? as u64,
        }),
        None => None,
    };

    Ok(HistoryRecord {
        id: row.get(0)?,
        url: row.get(1)?,
        save_path: PathBuf::from(row.get::<_, String>(2)?),
        min_size_kb: row.get::<_, i64>(3)? as u64,
        check_nested: row.get(4)?,
        requested_at: row.get(5)?,
        status: RequestStatus::from_db_string(&row.get::<_, String>(6)?)
            .unwrap_or(RequestStatus::Running),
        error_message: row.get(7)?,
        result,
    })
}

impl CrawlHistory for SqliteHistory {
    fn record_request(&mut self, request: &CrawlRequest) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO crawl_requests (url, save_path, min_size_kb, check_nested, requested_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                request.url,
                request.save_path.to_string_lossy().to_string(),
                request.min_size_kb as i64,
                request.check_nested,
                request.requested_at.to_rfc3339(),
                RequestStatus::Running.to_db_string(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn record_result(&mut self, request_id: i64, aggregate: &CrawlAggregate) -> StorageResult<()> {
        if !self.request_exists(request_id)? {
            return Err(StorageError::RequestNotFound(request_id));
        }

        let details = serde_json::to_string(aggregate)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO crawl_results (
                request_id, finished_at, pages_visited, urls_found, processed, succeeded,
                failed, invalid, no_extension, duplicates_removed, small_files_removed,
                elapsed_ms, details)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                request_id,
                now,
                aggregate.pages_visited as i64,
                aggregate.urls_found as i64,
                aggregate.processed as i64,
                aggregate.succeeded as i64,
                aggregate.failed as i64,
                aggregate.invalid as i64,
                aggregate.no_extension as i64,
                aggregate.duplicates_removed as i64,
                aggregate.small_files_removed as i64,
                aggregate.elapsed_ms as i64,
                details,
            ],
        )?;
        tx.execute(
            "UPDATE crawl_requests SET status = ?1, error_message = NULL WHERE id = ?2",
            params![RequestStatus::Completed.to_db_string(), request_id],
        )?;
        tx.commit()?;

        Ok(())
    }

    fn record_failure(&mut self, request_id: i64, reason: &str) -> StorageResult<()> {
        let changed = self.conn.execute(
            "UPDATE crawl_requests SET status = ?1, error_message = ?2 WHERE id = ?3",
            params![RequestStatus::Failed.to_db_string(), reason, request_id],
        )?;

        if changed == 0 {
            return Err(StorageError::RequestNotFound(request_id));
        }
        Ok(())
    }

    fn get(&self, request_id: i64) -> StorageResult<HistoryRecord> {
        let sql = format!("{} WHERE r.id = ?1", SELECT_HISTORY);

        self.conn
            .query_row(&sql, params![request_id], history_from_row)
            .optional()?
            .ok_or(StorageError::RequestNotFound(request_id))
    }

    fn recent(&self, limit: usize) -> StorageResult<Vec<HistoryRecord>> {
        let sql = format!("{} ORDER BY r.id DESC LIMIT ?1", SELECT_HISTORY);
        let mut stmt = self.conn.prepare(&sql)?;

        let records = stmt
            .query_map(params![limit as i64], history_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
