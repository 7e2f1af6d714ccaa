//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one crawl from start to finish:
//! - Fetching the root page and extracting candidate links
//! - Downloading the root batch
//! - Following same-origin extension-less links breadth-first
//! - Pruning the save directory by size and duplicate content
//! - Aggregating every batch into a [`CrawlAggregate`]
//!
//! Only a failure to fetch the root page ends the crawl with an error.
//! Nested page failures and per-file pruning failures are recorded in the
//! aggregate and the crawl carries on.

use crate::config::Config;
use crate::crawler::extractor::to_candidates;
use crate::crawler::{Downloader, LinkExtractor, PageFetcher, Worklist};
use crate::output::CrawlAggregate;
use crate::prune::prune_directory;
use crate::state::{BatchReport, CrawlPhase, DownloadOutcome};
use crate::url::{clean_origin, is_same_origin, parse_root_url};
use crate::{HarvestError, TransportResult};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// One crawl's inputs
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// Page to start from
    pub url: String,

    /// Directory media is saved into; created if missing
    pub save_path: PathBuf,

    /// Files smaller than `min_size_kb * 1000` bytes are deleted after the crawl
    pub min_size_kb: u64,

    /// Follow same-origin links that lack a media extension
    pub check_nested: bool,

    pub requested_at: DateTime<Utc>,
}

impl CrawlRequest {
    pub fn new(url: impl Into<String>, save_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            save_path: save_path.into(),
            min_size_kb: 0,
            check_nested: false,
            requested_at: Utc::now(),
        }
    }

    pub fn with_min_size_kb(mut self, min_size_kb: u64) -> Self {
        self.min_size_kb = min_size_kb;
        self
    }

    pub fn with_nested(mut self, check_nested: bool) -> Self {
        self.check_nested = check_nested;
        self
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: PageFetcher,
    extractor: LinkExtractor,
    downloader: Downloader,
    known_extensions: Vec<String>,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - A pattern failed to compile or the HTTP client failed to build
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = PageFetcher::new(&config.fetch)?;
        let extractor = LinkExtractor::from_config(&config.extraction)?;
        let downloader = Downloader::new(fetcher.clone(), config.download.clone());

        Ok(Self {
            fetcher,
            extractor,
            downloader,
            known_extensions: config.download.known_extensions.clone(),
            phase: CrawlPhase::Start,
        })
    }

    /// Current phase of the most recent crawl
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), HarvestError> {
        if !self.phase.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        tracing::debug!("Phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Runs one complete crawl
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlAggregate)` - The crawl finished; individual failures are inside
    /// * `Err(HarvestError)` - The request was invalid or the root page could not be fetched
    pub async fn run(&mut self, request: &CrawlRequest) -> Result<CrawlAggregate, HarvestError> {
        let started = Instant::now();
        self.phase = CrawlPhase::Start;

        let root = parse_root_url(&request.url).map_err(HarvestError::InvalidRequest)?;
        let origin = clean_origin(&root).ok_or_else(|| {
            HarvestError::InvalidRequest(format!("URL has no origin: {}", request.url))
        })?;

        tokio::fs::create_dir_all(&request.save_path).await?;

        tracing::info!(
            "Starting crawl of {} into {}",
            request.url,
            request.save_path.display()
        );

        let mut aggregate = CrawlAggregate::new(&request.url, &request.save_path);
        let mut worklist = Worklist::new();

        self.transition(CrawlPhase::FetchingRoot)?;
        worklist.mark_visited(root.as_str());

        let page = match self.fetcher.fetch_page(root.as_str()).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!("Failed to fetch {}: {}", request.url, e);
                self.transition(CrawlPhase::Failed)?;
                return Err(e.into());
            }
        };

        self.transition(CrawlPhase::ExtractingLinks)?;
        let links = self.extractor.extract(&page, &origin);
        tracing::info!("Found {} links on {}", links.len(), request.url);
        aggregate.record_page(links.len());

        self.transition(CrawlPhase::DownloadingRoot)?;
        let candidates = to_candidates(links, &self.known_extensions);
        let batch = self
            .downloader
            .download_batch(&candidates, &request.save_path)
            .await;
        aggregate.absorb(&batch);

        if request.check_nested {
            worklist.extend(nested_links(&batch, &origin));

            while let Some(url) = worklist.next_unvisited() {
                self.transition(CrawlPhase::NestedRound)?;
                tracing::info!("Nested page {} ({} queued)", url, worklist.len());

                match self
                    .crawl_nested_page(&url, &origin, &request.save_path)
                    .await
                {
                    Ok((links_found, batch)) => {
                        aggregate.record_page(links_found);
                        aggregate.absorb(&batch);
                        worklist.extend(nested_links(&batch, &origin));
                    }
                    Err(e) => {
                        tracing::warn!("Skipping nested page {}: {}", url, e);
                        aggregate.record_page_failure(&url, e);
                    }
                }
            }
        }

        self.transition(CrawlPhase::Pruning)?;
        let dir = request.save_path.clone();
        let min_size_kb = request.min_size_kb;
        let (small, duplicates) =
            tokio::task::spawn_blocking(move || prune_directory(&dir, min_size_kb)).await?;
        tracing::info!(
            "Pruned {} small files and {} duplicates",
            small.removed,
            duplicates.removed
        );

        self.transition(CrawlPhase::Aggregating)?;
        aggregate.record_pruning(small, duplicates);
        aggregate.finish(started.elapsed());
        debug_assert!(aggregate.is_consistent());

        self.transition(CrawlPhase::Done)?;
        tracing::info!(
            "Crawl of {} done: {} pages, {} downloaded, {} failed in {} ms",
            request.url,
            aggregate.pages_visited,
            aggregate.succeeded,
            aggregate.failed,
            aggregate.elapsed_ms
        );

        Ok(aggregate)
    }

    /// Fetches one nested page and downloads its batch
    async fn crawl_nested_page(
        &self,
        url: &str,
        origin: &str,
        dir: &Path,
    ) -> TransportResult<(usize, BatchReport)> {
        let page = self.fetcher.fetch_page(url).await?;
        let links = self.extractor.extract(&page, origin);
        let links_found = links.len();

        let candidates = to_candidates(links, &self.known_extensions);
        let batch = self.downloader.download_batch(&candidates, dir).await;

        Ok((links_found, batch))
    }
}

/// Extension-less outcomes that share `origin`, in batch order
fn nested_links(batch: &BatchReport, origin: &str) -> Vec<String> {
    batch
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            DownloadOutcome::NoExtension { url } if is_same_origin(url, origin) => {
                Some(url.clone())
            }
            _ => None,
        })
        .collect()
}

/// Runs a complete crawl with a fresh coordinator
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `request` - What to crawl and where to save it
///
/// # Example
///
/// ```no_run
/// use media_harvest::{run_crawl, Config, CrawlRequest};
///
/// # async fn example() -> media_harvest::Result<()> {
/// let request = CrawlRequest::new("https://example.com/gallery", "./media/gallery");
/// let aggregate = run_crawl(&Config::default(), &request).await?;
/// println!("{} files downloaded", aggregate.succeeded);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    request: &CrawlRequest,
) -> Result<CrawlAggregate, HarvestError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_crawl_request_builder() {
        let request = CrawlRequest::new("https://x.com/", "/tmp/x")
            .with_min_size_kb(5)
            .with_nested(true);

        assert_eq!(request.url, "https://x.com/");
        assert_eq!(request.save_path, PathBuf::from("/tmp/x"));
        assert_eq!(request.min_size_kb, 5);
        assert!(request.check_nested);
    }

    #[test]
    fn test_nested_links_same_origin_only() {
        let batch = BatchReport::new(
            vec![
                DownloadOutcome::NoExtension {
                    url: "https://x.com/page".to_string(),
                },
                DownloadOutcome::NoExtension {
                    url: "https://other.com/page".to_string(),
                },
                DownloadOutcome::InvalidUrl {
                    url: "https://x.com".to_string(),
                },
                DownloadOutcome::Failed {
                    url: "https://x.com/a.png".to_string(),
                    reason: "HTTP 500".to_string(),
                },
            ],
            Duration::ZERO,
        );

        assert_eq!(
            nested_links(&batch, "https://x.com"),
            vec!["https://x.com/page"]
        );
    }

    #[tokio::test]
    async fn test_invalid_request_url() {
        let request = CrawlRequest::new("not a url", "/tmp/unused");
        let result = run_crawl(&Config::default(), &request).await;
        assert!(matches!(result, Err(HarvestError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_non_http_request_url() {
        let request = CrawlRequest::new("ftp://x.com/", "/tmp/unused");
        let result = run_crawl(&Config::default(), &request).await;
        assert!(matches!(result, Err(HarvestError::InvalidRequest(_))));
    }

    #[test]
    fn test_phase_starts_at_start() {
        let coordinator = Coordinator::new(&Config::default()).unwrap();
        assert_eq!(coordinator.phase(), CrawlPhase::Start);
    }
}
