//! URL handling module for Media-Harvest
//!
//! This module provides media extension resolution, clean-origin extraction,
//! same-origin checks, URL validation, and file-name derivation.

mod extension;
mod filename;
mod origin;

// Re-export main functions
pub use extension::{file_extension, file_extension_in};
pub use filename::{file_name_from_url, random_file_name, sanitize_component};
pub use origin::{clean_origin, is_same_origin};

use url::Url;

/// Checks that a link string is an absolute URL with a scheme and a host
///
/// Links that fail this check are classified as invalid and never fetched.
///
/// # Examples
///
/// ```
/// use media_harvest::url::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/image.jpg"));
/// assert!(!is_valid_url("not-a-url"));
/// assert!(!is_valid_url(""));
/// ```
pub fn is_valid_url(candidate: &str) -> bool {
    if candidate.trim().is_empty() {
        return false;
    }

    match Url::parse(candidate) {
        Ok(url) => url.host_str().map(|h| !h.is_empty()).unwrap_or(false),
        Err(_) => false,
    }
}

/// Parses a crawl's root URL, requiring an http(s) scheme and a host
pub fn parse_root_url(candidate: &str) -> Result<Url, String> {
    let url = Url::parse(candidate.trim()).map_err(|e| format!("'{}': {}", candidate, e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!(
            "'{}': only http and https are supported, got {}",
            candidate,
            url.scheme()
        ));
    }

    if url.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(format!("'{}': missing host", candidate));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(is_valid_url("https://example.com/image.jpg"));
        assert!(is_valid_url("http://example.com/image.png"));
        assert!(is_valid_url("https://cdn.example.com:8443/file/abc.mp4"));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("   "));
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("/file/abc.mp4"));
    }

    #[test]
    fn test_parse_root_url() {
        let url = parse_root_url("https://example.com/gallery").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));

        assert!(parse_root_url("ftp://example.com/").is_err());
        assert!(parse_root_url("example.com/gallery").is_err());
        assert!(parse_root_url("").is_err());
    }
}
