use rand::distributions::Alphanumeric;
use rand::Rng;
use url::Url;

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`
pub fn sanitize_component(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Derives a file-system safe base name (without extension) from a URL
///
/// # Rules
///
/// 1. Take the last path segment, with query string and fragment removed
/// 2. Drop a trailing copy of `extension` (compared case-insensitively)
/// 3. Replace characters outside `[A-Za-z0-9._-]` with `_`
/// 4. Truncate to `max_len` characters
///
/// Returns `None` when nothing usable remains; callers fall back to a
/// random name.
///
/// # Examples
///
/// ```
/// use media_harvest::url::file_name_from_url;
///
/// let name = file_name_from_url("https://x.com/media/My+Clip.mp4?dl=1", ".mp4", 100);
/// assert_eq!(name.as_deref(), Some("My_Clip"));
/// ```
pub fn file_name_from_url(url: &str, extension: &str, max_len: usize) -> Option<String> {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string(),
        Err(_) => {
            let without_suffix = url.split(['?', '#']).next().unwrap_or_default();
            without_suffix
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string()
        }
    };

    let stem = if !extension.is_empty()
        && segment.len() >= extension.len()
        && segment.is_char_boundary(segment.len() - extension.len())
        && segment[segment.len() - extension.len()..].eq_ignore_ascii_case(extension)
    {
        &segment[..segment.len() - extension.len()]
    } else {
        segment.as_str()
    };

    let sanitized: String = sanitize_component(stem).chars().take(max_len).collect();

    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// Generates a random alphanumeric file name of `len` characters
pub fn random_file_name(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
