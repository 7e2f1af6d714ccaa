//! Crawl phase definitions for the orchestrator state machine
//!
//! A crawl walks `Start → FetchingRoot → ExtractingLinks → DownloadingRoot →
//! NestedRound* → Pruning → Aggregating → Done`. `Failed` is reachable only
//! while the root page is being fetched or its links extracted.

use std::fmt;

/// Represents the current phase of one crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Request accepted, nothing fetched yet
    Start,

    /// Fetching the root page
    FetchingRoot,

    /// Extracting candidate links from the root page
    ExtractingLinks,

    /// Downloading the root page's media batch
    DownloadingRoot,

    /// Processing one page from the nested worklist
    NestedRound,

    /// Size and duplicate pruning of the save directory
    Pruning,

    /// Folding batch results into the final aggregate
    Aggregating,

    /// Crawl finished
    Done,

    /// Root page could not be retrieved
    Failed,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        matches!(
            (self, next),
            (Start, FetchingRoot)
                | (FetchingRoot, ExtractingLinks)
                | (FetchingRoot, Failed)
                | (ExtractingLinks, DownloadingRoot)
                | (ExtractingLinks, Failed)
                | (DownloadingRoot, NestedRound)
                | (DownloadingRoot, Pruning)
                | (NestedRound, NestedRound)
                | (NestedRound, Pruning)
                | (Pruning, Aggregating)
                | (Aggregating, Done)
        )
    }

    /// Short lowercase name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::FetchingRoot => "fetching_root",
            Self::ExtractingLinks => "extracting_links",
            Self::DownloadingRoot => "downloading_root",
            Self::NestedRound => "nested_round",
            Self::Pruning => "pruning",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
