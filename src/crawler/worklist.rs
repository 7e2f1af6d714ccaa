//! FIFO worklist for nested page crawling
//!
//! Pages are processed breadth-first. A URL is entered into the
//! [`VisitedSet`] when it is taken off the queue, so the same page is never
//! fetched twice in one crawl even if several pages link to it.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// URLs already fetched during the current crawl
///
/// Keys are compared after parsing, with any fragment removed, so
/// `https://h/p` and `https://h/p#top` count as the same page.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` visited; returns false if it already was
    pub fn insert(&mut self, url: &str) -> bool {
        self.urls.insert(visit_key(url))
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(&visit_key(url))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

fn visit_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Queue of pages still to crawl, plus the pages already crawled
#[derive(Debug, Clone, Default)]
pub struct Worklist {
    queue: VecDeque<String>,
    visited: VisitedSet,
}

impl Worklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` as visited without queueing it
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url)
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Appends `url` unless it has already been visited
    pub fn push(&mut self, url: String) {
        if !self.visited.contains(&url) {
            self.queue.push_back(url);
        }
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, urls: I) {
        for url in urls {
            self.push(url);
        }
    }

    /// Pops the next URL that has not been visited yet and marks it visited
    pub fn next_unvisited(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            if self.visited.insert(&url) {
                return Some(url);
            }
            tracing::trace!("Skipping already visited {}", url);
        }
        None
    }

    /// Number of queued entries, including ones that will be skipped
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut worklist = Worklist::new();
        worklist.push("https://a.com/1".to_string());
        worklist.push("https://a.com/2".to_string());

        assert_eq!(worklist.next_unvisited().as_deref(), Some("https://a.com/1"));
        assert_eq!(worklist.next_unvisited().as_deref(), Some("https://a.com/2"));
        assert_eq!(worklist.next_unvisited(), None);
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let mut worklist = Worklist::new();
        worklist.extend(vec![
            "https://a.com/p".to_string(),
            "https://a.com/p".to_string(),
            "https://a.com/p#section".to_string(),
        ]);

        assert_eq!(worklist.next_unvisited().as_deref(), Some("https://a.com/p"));
        assert_eq!(worklist.next_unvisited(), None);
        assert_eq!(worklist.visited_count(), 1);
    }

    #[test]
    fn test_marked_root_is_never_queued() {
        let mut worklist = Worklist::new();
        assert!(worklist.mark_visited("https://a.com/"));
        assert!(!worklist.mark_visited("https://a.com/"));

        worklist.push("https://a.com/".to_string());
        assert!(worklist.is_empty());
    }

    #[test]
    fn test_mutual_links_terminate() {
        // Two pages that link to each other
        let links = |url: &str| -> Vec<String> {
            match url {
                "https://a.com/x" => vec!["https://a.com/y".to_string()],
                _ => vec!["https://a.com/x".to_string()],
            }
        };

        let mut worklist = Worklist::new();
        worklist.mark_visited("https://a.com/");
        worklist.push("https://a.com/x".to_string());

        let mut fetched = Vec::new();
        while let Some(url) = worklist.next_unvisited() {
            worklist.extend(links(&url));
            fetched.push(url);
        }

        assert_eq!(fetched, vec!["https://a.com/x", "https://a.com/y"]);
    }

    #[test]
    fn test_visited_set_unparsable_keys() {
        let mut visited = VisitedSet::new();
        assert!(visited.insert("not a url"));
        assert!(visited.contains("not a url"));
        assert_eq!(visited.len(), 1);
    }
}
