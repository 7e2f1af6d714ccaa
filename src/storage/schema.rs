//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the crawl history
//! database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per crawl request
CREATE TABLE IF NOT EXISTS crawl_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    save_path TEXT NOT NULL,
    min_size_kb INTEGER NOT NULL,
    check_nested INTEGER NOT NULL,
    requested_at TEXT NOT NULL,
    status TEXT NOT NULL,
    error_message TEXT
);

CREATE INDEX IF NOT EXISTS idx_crawl_requests_url ON crawl_requests(url);

-- Numeric results of a completed crawl
CREATE TABLE IF NOT EXISTS crawl_results (
    request_id INTEGER PRIMARY KEY REFERENCES crawl_requests(id),
    finished_at TEXT NOT NULL,
    pages_visited INTEGER NOT NULL,
    urls_found INTEGER NOT NULL,
    processed INTEGER NOT NULL,
    succeeded INTEGER NOT NULL,
    failed INTEGER NOT NULL,
    invalid INTEGER NOT NULL,
    no_extension INTEGER NOT NULL,
    duplicates_removed INTEGER NOT NULL,
    small_files_removed INTEGER NOT NULL,
    elapsed_ms INTEGER NOT NULL,
    details TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// Creates all tables and indexes if they don't exist.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["crawl_requests", "crawl_results"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }
}
