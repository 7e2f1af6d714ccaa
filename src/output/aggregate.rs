//! Crawl-wide result aggregation

use crate::prune::{PruneFailure, PruneReport};
use crate::state::{BatchReport, OutcomeKind};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A page in the nested worklist that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    pub url: String,
    pub reason: String,
}

/// Totals and URL lists for one complete crawl
///
/// Counters only grow while batches are absorbed. At every point
/// `processed == succeeded + failed + invalid + no_extension`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlAggregate {
    /// The URL the crawl started from
    pub from_url: String,

    /// Directory media was saved into
    pub save_path: PathBuf,

    /// Pages whose links were extracted, root included
    pub pages_visited: usize,

    /// Raw link matches across all visited pages
    pub urls_found: usize,

    /// Links handed to the downloader
    pub processed: usize,

    /// Files written
    pub succeeded: usize,

    pub failed: usize,
    pub invalid: usize,
    pub no_extension: usize,

    /// Files deleted by duplicate pruning
    pub duplicates_removed: usize,

    /// Files deleted by size pruning
    pub small_files_removed: usize,

    /// Wall time of the whole crawl
    pub elapsed_ms: u64,

    pub failed_urls: Vec<String>,
    pub invalid_urls: Vec<String>,
    pub no_extension_urls: Vec<String>,
    pub page_failures: Vec<PageFailure>,
    pub prune_failures: Vec<PruneFailure>,
}

impl CrawlAggregate {
    pub fn new(from_url: &str, save_path: &Path) -> Self {
        Self {
            from_url: from_url.to_string(),
            save_path: save_path.to_path_buf(),
            ..Self::default()
        }
    }

    /// Counts a visited page and the raw links found on it
    pub fn record_page(&mut self, links_found: usize) {
        self.pages_visited += 1;
        self.urls_found += links_found;
    }

    /// Records a nested page that could not be fetched
    pub fn record_page_failure(&mut self, url: &str, reason: impl ToString) {
        self.page_failures.push(PageFailure {
            url: url.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Folds one download batch into the totals
    pub fn absorb(&mut self, batch: &BatchReport) {
        let succeeded = batch.succeeded();
        let failed = batch.failed();
        let invalid = batch.invalid();
        let no_extension = batch.no_extension();
        debug_assert_eq!(
            batch.processed(),
            succeeded + failed + invalid + no_extension
        );

        self.processed += batch.processed();
        self.succeeded += succeeded;
        self.failed += failed;
        self.invalid += invalid;
        self.no_extension += no_extension;

        self.failed_urls.extend(batch.urls(OutcomeKind::Failed));
        self.invalid_urls.extend(batch.urls(OutcomeKind::InvalidUrl));
        self.no_extension_urls
            .extend(batch.urls(OutcomeKind::NoExtension));
    }

    /// Records the size and duplicate pruning passes
    pub fn record_pruning(&mut self, small: PruneReport, duplicates: PruneReport) {
        self.small_files_removed += small.removed;
        self.duplicates_removed += duplicates.removed;
        self.prune_failures.extend(small.failures);
        self.prune_failures.extend(duplicates.failures);
    }

    pub fn finish(&mut self, elapsed: Duration) {
        self.elapsed_ms = elapsed.as_millis() as u64;
    }

    /// True if the category counters partition `processed`
    pub fn is_consistent(&self) -> bool {
        self.processed == self.succeeded + self.failed + self.invalid + self.no_extension
    }

    /// Files still expected on disk after pruning
    pub fn files_kept(&self) -> usize {
        self.succeeded
            .saturating_sub(self.duplicates_removed + self.small_files_removed)
    }
}
