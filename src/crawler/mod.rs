//! Crawler module for page fetching and media downloading
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with connect and read deadlines
//! - Regex link extraction
//! - Concurrent media downloads with outcome classification
//! - The nested-page worklist
//! - Overall crawl coordination

mod coordinator;
mod downloader;
mod extractor;
mod fetcher;
mod worklist;

pub use coordinator::{run_crawl, Coordinator, CrawlRequest};
pub use downloader::Downloader;
pub use extractor::{to_candidates, LinkExtractor};
pub use fetcher::{build_http_client, PageFetcher};
pub use worklist::{VisitedSet, Worklist};
