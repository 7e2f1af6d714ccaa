//! Download outcome classification
//!
//! Every link handed to the downloader ends in exactly one [`DownloadOutcome`].
//! A page's outcomes are collected into a [`BatchReport`].

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// A discovered link and its resolved media extension
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateLink {
    pub url: String,
    /// Lower-case extension with leading dot, or empty if unresolved
    pub extension: String,
}

impl CandidateLink {
    pub fn new(url: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extension: extension.into(),
        }
    }

    pub fn has_extension(&self) -> bool {
        !self.extension.is_empty()
    }
}

/// Outcome category, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    Failed,
    InvalidUrl,
    NoExtension,
}

/// Result of attempting one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Body streamed to `path`
    Success { url: String, path: PathBuf },

    /// Transport or I/O failure while downloading
    Failed { url: String, reason: String },

    /// Link is not an absolute URL with scheme and host
    InvalidUrl { url: String },

    /// No known media extension; candidate for nested crawling
    NoExtension { url: String },
}

impl DownloadOutcome {
    pub fn url(&self) -> &str {
        match self {
            Self::Success { url, .. }
            | Self::Failed { url, .. }
            | Self::InvalidUrl { url }
            | Self::NoExtension { url } => url,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success { .. } => OutcomeKind::Success,
            Self::Failed { .. } => OutcomeKind::Failed,
            Self::InvalidUrl { .. } => OutcomeKind::InvalidUrl,
            Self::NoExtension { .. } => OutcomeKind::NoExtension,
        }
    }
}

/// All outcomes of one download batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DownloadOutcome>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn new(outcomes: Vec<DownloadOutcome>, elapsed: Duration) -> Self {
        Self { outcomes, elapsed }
    }

    /// Number of links attempted; always the sum of the four category counts
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.outcomes.iter().filter(|o| o.kind() == kind).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(OutcomeKind::Success)
    }

    pub fn failed(&self) -> usize {
        self.count(OutcomeKind::Failed)
    }

    pub fn invalid(&self) -> usize {
        self.count(OutcomeKind::InvalidUrl)
    }

    pub fn no_extension(&self) -> usize {
        self.count(OutcomeKind::NoExtension)
    }

    /// URLs of every outcome in `kind`, in batch order
    pub fn urls(&self, kind: OutcomeKind) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| o.kind() == kind)
            .map(|o| o.url().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_batch() -> BatchReport {
        BatchReport::new(
            vec![
                DownloadOutcome::Success {
                    url: "https://x.com/a.png".to_string(),
                    path: PathBuf::from("/tmp/a.png"),
                },
                DownloadOutcome::Failed {
                    url: "https://x.com/b.png".to_string(),
                    reason: "HTTP 404".to_string(),
                },
                DownloadOutcome::InvalidUrl {
                    url: "invalid-url".to_string(),
                },
                DownloadOutcome::NoExtension {
                    url: "https://x.com/page".to_string(),
                },
                DownloadOutcome::NoExtension {
                    url: "https://x.com/other".to_string(),
                },
            ],
            Duration::from_millis(12),
        )
    }

    #[test]
    fn test_counts_partition_processed() {
        let batch = sample_batch();
        assert_eq!(batch.processed(), 5);
        assert_eq!(batch.succeeded(), 1);
        assert_eq!(batch.failed(), 1);
        assert_eq!(batch.invalid(), 1);
        assert_eq!(batch.no_extension(), 2);
        assert_eq!(
            batch.processed(),
            batch.succeeded() + batch.failed() + batch.invalid() + batch.no_extension()
        );
    }

    #[test]
    fn test_urls_by_kind() {
        let batch = sample_batch();
        assert_eq!(
            batch.urls(OutcomeKind::NoExtension),
            vec!["https://x.com/page", "https://x.com/other"]
        );
        assert_eq!(batch.urls(OutcomeKind::InvalidUrl), vec!["invalid-url"]);
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = DownloadOutcome::Failed {
            url: "https://x.com/b.png".to_string(),
            reason: "timeout".to_string(),
        };
        assert_eq!(outcome.url(), "https://x.com/b.png");
        assert_eq!(outcome.kind(), OutcomeKind::Failed);
    }

    #[test]
    fn test_empty_batch() {
        let batch = BatchReport::default();
        assert_eq!(batch.processed(), 0);
        assert!(batch.urls(OutcomeKind::Success).is_empty());
    }

    #[test]
    fn test_candidate_link() {
        assert!(CandidateLink::new("https://x.com/a.mp4", ".mp4").has_extension());
        assert!(!CandidateLink::new("https://x.com/page", "").has_extension());
    }
}
