//! Size and duplicate pruning of a save directory
//!
//! Both passes look only at the regular files directly inside the directory,
//! enumerated in file-name order. A file that cannot be hashed or deleted is
//! recorded as a [`PruneFailure`] and left in place; the pass continues.

mod record;

pub use record::{hash_file, FileRecord};

use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file the pruner could not process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of one pruning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Number of files deleted
    pub removed: usize,
    pub failures: Vec<PruneFailure>,
}

impl PruneReport {
    fn fail(&mut self, path: &Path, reason: impl ToString) {
        self.failures.push(PruneFailure {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        });
    }

    fn delete(&mut self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => {
                self.removed += 1;
                tracing::debug!("Removed {}", path.display());
            }
            Err(e) => {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
                self.fail(path, e);
            }
        }
    }
}

/// Lists the regular files directly inside `dir`, sorted by file name
pub fn list_files(dir: &Path) -> io::Result<Vec<FileRecord>> {
    let mut records = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        if metadata.is_file() {
            records.push(FileRecord::new(entry.path(), metadata.len()));
        }
    }

    records.sort_by(|a, b| a.path().file_name().cmp(&b.path().file_name()));
    Ok(records)
}

/// Deletes every file smaller than `size_kb * 1000` bytes
///
/// Files at or above the threshold are never touched; a threshold of zero
/// removes nothing.
pub fn prune_small_files(dir: &Path, size_kb: u64) -> io::Result<PruneReport> {
    let threshold = size_kb.saturating_mul(1000);
    let mut report = PruneReport::default();

    for record in list_files(dir)? {
        if record.len() < threshold {
            tracing::debug!(
                "File {} too small: {} bytes (< {})",
                record.path().display(),
                record.len(),
                threshold
            );
            report.delete(record.path());
        }
    }

    Ok(report)
}

/// Deletes files whose content duplicates an earlier file in the directory
///
/// Within each group of identical digests the first file in enumeration
/// order is kept. Running the pass twice removes nothing the second time.
pub fn prune_duplicates(dir: &Path) -> io::Result<PruneReport> {
    Ok(dedup_records(list_files(dir)?))
}

/// Deletes every record whose digest matches an earlier record
///
/// A record that cannot be hashed is reported and left on disk.
pub fn dedup_records(records: Vec<FileRecord>) -> PruneReport {
    let mut report = PruneReport::default();
    let mut seen: HashSet<String> = HashSet::new();

    for record in records {
        let digest = match record.digest() {
            Ok(d) => d.to_string(),
            Err(e) => {
                tracing::warn!("Cannot hash {}: {}", record.path().display(), e);
                report.fail(record.path(), e);
                continue;
            }
        };

        if !seen.insert(digest) {
            tracing::debug!("Duplicate content: {}", record.path().display());
            report.delete(record.path());
        }
    }

    report
}

/// Runs size pruning then duplicate pruning over `dir`
///
/// A pass that cannot enumerate the directory is reported as a failure
/// against the directory itself instead of an error.
pub fn prune_directory(dir: &Path, size_kb: u64) -> (PruneReport, PruneReport) {
    let small = or_failure(dir, prune_small_files(dir, size_kb));
    let duplicates = or_failure(dir, prune_duplicates(dir));
    (small, duplicates)
}

fn or_failure(dir: &Path, result: io::Result<PruneReport>) -> PruneReport {
    result.unwrap_or_else(|e| {
        tracing::warn!("Cannot read {}: {}", dir.display(), e);
        let mut report = PruneReport::default();
        report.fail(dir, e);
        report
    })
}
