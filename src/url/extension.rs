use crate::config::DEFAULT_EXTENSIONS;

/// Resolves the media extension of a URL against the default extension list
///
/// See [`file_extension_in`] for the rules.
///
/// # Examples
///
/// ```
/// use media_harvest::url::file_extension;
///
/// assert_eq!(file_extension("https://x.com/img.png?x=1"), ".png");
/// assert_eq!(file_extension("https://x.com/page"), "");
/// ```
pub fn file_extension(url: &str) -> String {
    file_extension_in(url, DEFAULT_EXTENSIONS)
}

/// Resolves the media extension of a URL against `known`
///
/// The extension is taken from the final path segment after the query and
/// fragment are cut off, compared case-insensitively, and returned in lower
/// case. Anything not in `known` resolves to the empty string. `known` is
/// expected to hold lower-case extensions with a leading dot.
///
/// The input does not have to be a valid URL; malformed link strings still
/// resolve so they can be classified later.
pub fn file_extension_in<S: AsRef<str>>(url: &str, known: &[S]) -> String {
    let without_suffix = url.split(['?', '#']).next().unwrap_or_default();
    let segment = without_suffix.rsplit('/').next().unwrap_or_default();

    let Some(dot) = segment.rfind('.') else {
        return String::new();
    };

    // `&` sometimes leaks into the segment when query strings are malformed
    let candidate = segment[dot..]
        .split('&')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if known.iter().any(|k| k.as_ref() == candidate) {
        candidate
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(file_extension("https://example.com/image.jpg"), ".jpg");
        assert_eq!(file_extension("https://example.com/a/b/clip.mp4"), ".mp4");
        assert_eq!(file_extension("https://example.com/song.mp3"), ".mp3");
    }

    #[test]
    fn test_query_and_fragment_are_stripped() {
        assert_eq!(file_extension("https://x.com/img.png?x=1"), ".png");
        assert_eq!(
            file_extension("https://example.com/image.png?param=value"),
            ".png"
        );
        assert_eq!(
            file_extension("https://example.com/video.mp4#fragment"),
            ".mp4"
        );
        assert_eq!(file_extension("https://example.com/pic.gif&size=2"), ".gif");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(file_extension("https://example.com/IMAGE.JPG"), ".jpg");
        assert_eq!(file_extension("https://example.com/photo.JpEg"), ".jpeg");
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(file_extension("https://x.com/page"), "");
        assert_eq!(file_extension("https://example.com/image.txt"), "");
        assert_eq!(file_extension("https://example.com/"), "");
        assert_eq!(file_extension("https://example.com"), "");
        assert_eq!(file_extension(""), "");
    }

    #[test]
    fn test_dot_outside_last_segment_is_ignored() {
        assert_eq!(file_extension("https://example.com/img.png/view"), "");
        assert_eq!(file_extension("https://cdn.example.com/gallery"), "");
    }

    #[test]
    fn test_malformed_input_still_resolves() {
        assert_eq!(file_extension("not a url.png"), ".png");
        assert_eq!(file_extension("invalid-url"), "");
    }

    #[test]
    fn test_idempotent() {
        for url in [
            "https://x.com/img.png?x=1",
            "https://x.com/page",
            "https://example.com/IMAGE.JPG",
            "https://example.com/video.mp4#t=3",
        ] {
            let once = file_extension(url);
            assert_eq!(file_extension(&once), once, "not idempotent for {}", url);
        }
    }

    #[test]
    fn test_custom_extension_list() {
        let known = vec![".webm".to_string()];
        assert_eq!(file_extension_in("https://x.com/v.webm", &known), ".webm");
        assert_eq!(file_extension_in("https://x.com/v.mp4", &known), "");
    }
}
