//! Concurrent media downloader
//!
//! Every candidate link in a batch is classified into exactly one
//! [`DownloadOutcome`]. Links with a known extension are streamed into the
//! save directory with at most `max-concurrent-downloads` transfers in flight;
//! the batch returns only after every link has been settled.

use crate::config::DownloadConfig;
use crate::crawler::PageFetcher;
use crate::state::{BatchReport, CandidateLink, DownloadOutcome};
use crate::url::{file_name_from_url, is_valid_url, random_file_name};
use crate::DownloadError;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs::File;

/// Downloads batches of candidate links into a directory
#[derive(Debug, Clone)]
pub struct Downloader {
    fetcher: PageFetcher,
    config: DownloadConfig,
}

impl Downloader {
    pub fn new(fetcher: PageFetcher, config: DownloadConfig) -> Self {
        Self { fetcher, config }
    }

    /// Attempts every link in `links`, writing successful bodies into `dir`
    ///
    /// Outcomes are reported in completion order. A failure of one link never
    /// affects the others.
    ///
    /// # Arguments
    ///
    /// * `links` - Candidates with their resolved extensions
    /// * `dir` - Existing save directory
    ///
    /// # Returns
    ///
    /// A [`BatchReport`] holding one outcome per link and the batch wall time
    pub async fn download_batch(&self, links: &[CandidateLink], dir: &Path) -> BatchReport {
        let started = Instant::now();
        let concurrency = self.config.concurrency();

        tracing::debug!(
            "Downloading batch of {} links ({} concurrent)",
            links.len(),
            concurrency
        );

        let outcomes: Vec<DownloadOutcome> = stream::iter(links.iter())
            .map(|link| self.download_one(link, dir))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let report = BatchReport::new(outcomes, started.elapsed());
        tracing::info!(
            "Batch done: {} processed, {} downloaded, {} failed, {} invalid, {} without extension in {:?}",
            report.processed(),
            report.succeeded(),
            report.failed(),
            report.invalid(),
            report.no_extension(),
            report.elapsed
        );
        report
    }

    async fn download_one(&self, link: &CandidateLink, dir: &Path) -> DownloadOutcome {
        if !is_valid_url(&link.url) {
            tracing::debug!("Invalid URL: {}", link.url);
            return DownloadOutcome::InvalidUrl {
                url: link.url.clone(),
            };
        }

        if !link.has_extension() {
            tracing::debug!("No media extension: {}", link.url);
            return DownloadOutcome::NoExtension {
                url: link.url.clone(),
            };
        }

        let path = self.destination(link, dir);

        match self.save(&link.url, &path).await {
            Ok(bytes) => {
                tracing::debug!("Saved {} -> {} ({} bytes)", link.url, path.display(), bytes);
                DownloadOutcome::Success {
                    url: link.url.clone(),
                    path,
                }
            }
            Err(e) => {
                tracing::warn!("Download failed for {}: {}", link.url, e);
                DownloadOutcome::Failed {
                    url: link.url.clone(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Chooses the target file for `link` inside `dir`
    pub fn destination(&self, link: &CandidateLink, dir: &Path) -> PathBuf {
        let stem = if self.config.use_url_as_filename {
            file_name_from_url(&link.url, &link.extension, self.config.max_filename_length)
        } else {
            None
        };

        let stem = stem.unwrap_or_else(|| random_file_name(self.config.random_name_length));
        dir.join(format!("{}{}", stem, link.extension))
    }

    async fn save(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        let mut response = self.fetcher.open(url).await?;
        let mut file = File::create(path).await?;

        match self.fetcher.copy_body(url, &mut response, &mut file).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                drop(file);
                if let Err(remove_err) = tokio::fs::remove_file(path).await {
                    tracing::debug!(
                        "Could not remove partial file {}: {}",
                        path.display(),
                        remove_err
                    );
                }
                Err(e)
            }
        }
    }
}
