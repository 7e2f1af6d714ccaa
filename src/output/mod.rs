//! Output module for reporting crawl results
//!
//! This module handles:
//! - Aggregating per-page download batches into crawl-wide totals
//! - Printing results and history to the terminal
//! - Exporting results as JSON

mod aggregate;
pub mod stats;

pub use aggregate::{CrawlAggregate, PageFailure};
pub use stats::{print_aggregate, print_history};

/// Serializes an aggregate as pretty-printed JSON
///
/// # Example
///
/// ```
/// use media_harvest::output::{to_json, CrawlAggregate};
///
/// let json = to_json(&CrawlAggregate::default()).unwrap();
/// assert!(json.contains("\"processed\": 0"));
/// ```
pub fn to_json(aggregate: &CrawlAggregate) -> serde_json::Result<String> {
    serde_json::to_string_pretty(aggregate)
}
