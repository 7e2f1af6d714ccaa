use url::{Origin, Url};

/// Returns the clean origin of a URL: scheme, host and non-default port
///
/// Returns `None` for URLs with an opaque origin (`data:`, `file:`, ...).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use media_harvest::url::clean_origin;
///
/// let url = Url::parse("https://CDN.example.com/gallery/page?id=3").unwrap();
/// assert_eq!(clean_origin(&url).as_deref(), Some("https://cdn.example.com"));
/// ```
pub fn clean_origin(url: &Url) -> Option<String> {
    match url.origin() {
        origin @ Origin::Tuple(..) => Some(origin.ascii_serialization()),
        Origin::Opaque(_) => None,
    }
}

/// Checks whether `candidate` parses to a URL with exactly the given clean origin
pub fn is_same_origin(candidate: &str, origin: &str) -> bool {
    Url::parse(candidate)
        .ok()
        .and_then(|url| clean_origin(&url))
        .map(|candidate_origin| candidate_origin == origin)
        .unwrap_or(false)
}
