use serde::Deserialize;
use std::path::PathBuf;

/// Default User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Default Accept header
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Default Accept-Language header
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";

/// Media extensions downloaded when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".gif", ".mp4", ".mp3", ".png"];

/// Matches `/file/<alphanumeric>.<ext>` fragments; resolved against the clean origin
pub const ORIGIN_RELATIVE_PATTERN: &str = r"/file/[a-zA-Z0-9]*\.\w+";

/// Matches protocol-relative `//host/path` fragments
pub const PROTOCOL_RELATIVE_PATTERN: &str =
    r"//([\w_-]+(?:(?:\.[\w_-]+)+))([\w.,@?^=%&:/~+#-]*[\w@?^=%&/~+#-])";

/// Main configuration structure for Media-Harvest
///
/// Every section is optional; a missing file or section falls back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub download: DownloadConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

/// Connection behavior shared by page fetches and media downloads
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Upper bound on each wait for response headers or a body chunk (milliseconds)
    pub read_timeout_ms: u64,

    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,

    /// Accept any certificate for any host.
    ///
    /// Some target sites present self-signed or mismatched certificates.
    /// Turning this on removes all protection against interception.
    pub skip_certificate_verification: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            read_timeout_ms: 10_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            skip_certificate_verification: false,
        }
    }
}

/// Download naming and fan-out configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DownloadConfig {
    /// Name files after the sanitized last URL segment instead of a random token
    pub use_url_as_filename: bool,

    /// Maximum length of a URL-derived file name (without extension)
    pub max_filename_length: usize,

    /// Length of random alphanumeric file names
    pub random_name_length: usize,

    /// Concurrent downloads per batch; 0 uses the available parallelism
    pub max_concurrent_downloads: usize,

    /// Extensions (with leading dot) that are downloaded
    pub known_extensions: Vec<String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            use_url_as_filename: false,
            max_filename_length: 100,
            random_name_length: 15,
            max_concurrent_downloads: 0,
            known_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl DownloadConfig {
    /// Effective number of concurrent downloads in a batch
    pub fn concurrency(&self) -> usize {
        if self.max_concurrent_downloads > 0 {
            return self.max_concurrent_downloads;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }
}

/// Link extraction pattern set
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub patterns: Vec<LinkPattern>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            patterns: vec![
                LinkPattern {
                    regex: ORIGIN_RELATIVE_PATTERN.to_string(),
                    prefix: None,
                },
                LinkPattern {
                    regex: PROTOCOL_RELATIVE_PATTERN.to_string(),
                    prefix: Some("https:".to_string()),
                },
            ],
        }
    }
}

/// One extraction pass
#[derive(Debug, Clone, Deserialize)]
pub struct LinkPattern {
    /// Regular expression; every match becomes a candidate
    pub regex: String,

    /// Literal prepended to each match; `None` prepends the crawl's clean origin
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Parent directory for crawls that do not name a save path
    pub default_save_path: PathBuf,

    /// SQLite crawl history; history is not recorded when unset
    pub database_path: Option<PathBuf>,

    /// Default minimum file size to keep (KB)
    pub min_size_kb: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_save_path: PathBuf::from("./media"),
            database_path: None,
            min_size_kb: 0,
        }
    }
}

impl OutputConfig {
    /// Derives a save directory for a crawl of `url`
    ///
    /// Uses the URL's last path segment as the directory name, falling back
    /// to the host when the path ends in `/`.
    pub fn save_path_for(&self, url: &str) -> PathBuf {
        let name = ::url::Url::parse(url)
            .ok()
            .and_then(|parsed| {
                let segment = parsed
                    .path_segments()
                    .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                    .map(str::to_string);
                segment.or_else(|| parsed.host_str().map(str::to_string))
            })
            .map(|name| crate::url::sanitize_component(&name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "download".to_string());

        self.default_save_path.join(name)
    }
}
