//! Regex-driven link extraction
//!
//! Pages are scanned as plain text rather than parsed as HTML. Each
//! configured pattern is applied over the whole text in order, and every
//! match is turned into an absolute URL by prepending either the pattern's
//! prefix or the page's clean origin.

use crate::config::{ExtractionConfig, LinkPattern};
use crate::state::CandidateLink;
use crate::url::file_extension_in;
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct CompiledPattern {
    regex: Regex,
    prefix: Option<String>,
}

/// Applies the configured extraction patterns to page text
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    patterns: Vec<CompiledPattern>,
}

impl LinkExtractor {
    /// Compiles `patterns` in order
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` for the first regex that fails to compile.
    pub fn new(patterns: &[LinkPattern]) -> ConfigResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let regex = Regex::new(&p.regex).map_err(|e| ConfigError::InvalidPattern {
                    pattern: p.regex.clone(),
                    reason: e.to_string(),
                })?;
                Ok(CompiledPattern {
                    regex,
                    prefix: p.prefix.clone(),
                })
            })
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    pub fn from_config(config: &ExtractionConfig) -> ConfigResult<Self> {
        Self::new(&config.patterns)
    }

    /// Extracts candidate link strings from `text`
    ///
    /// Results are ordered by pattern, then by position within the text.
    /// Duplicates are kept; see [`to_candidates`] for de-duplication.
    ///
    /// # Arguments
    ///
    /// * `text` - The raw page body
    /// * `origin` - Clean origin of the page, e.g. `https://host:8080`
    ///
    /// # Example
    ///
    /// ```
    /// use media_harvest::config::ExtractionConfig;
    /// use media_harvest::crawler::LinkExtractor;
    ///
    /// let extractor = LinkExtractor::from_config(&ExtractionConfig::default()).unwrap();
    /// let links = extractor.extract("<img src=\"/file/abc123.mp4\">", "https://cdn.example.com");
    /// assert_eq!(links, vec!["https://cdn.example.com/file/abc123.mp4"]);
    /// ```
    pub fn extract(&self, text: &str, origin: &str) -> Vec<String> {
        let mut links = Vec::new();

        for pattern in &self.patterns {
            let prefix = pattern.prefix.as_deref().unwrap_or(origin);
            links.extend(
                pattern
                    .regex
                    .find_iter(text)
                    .map(|m| format!("{}{}", prefix, m.as_str())),
            );
        }

        tracing::trace!("Extracted {} raw links", links.len());
        links
    }
}

/// Resolves extensions for extracted links, keeping the first occurrence of each URL
pub fn to_candidates<S: AsRef<str>>(links: Vec<String>, known_extensions: &[S]) -> Vec<CandidateLink> {
    let mut seen = HashSet::new();

    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .map(|url| {
            let extension = file_extension_in(&url, known_extensions);
            CandidateLink { url, extension }
        })
        .collect()
}
