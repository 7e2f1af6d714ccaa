//! HTTP fetcher shared by page retrieval and media downloads
//!
//! This module handles all outbound requests, including:
//! - Building the HTTP client with browser-like identification headers
//! - Opening a response with connect and read deadlines
//! - Reading page bodies as text
//! - Streaming bodies into an async writer for downloads
//! - Error classification into [`TransportError`]

use crate::config::FetchConfig;
use crate::{DownloadError, TransportError, TransportResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// The client identifies itself with the configured user agent, sends the
/// configured `Accept` and `Accept-Language` headers on every request, and
/// transparently decodes gzip, deflate and brotli bodies.
///
/// # Arguments
///
/// * `config` - The fetch configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(TransportError)` - A header value was rejected or the client failed to build
///
/// # Example
///
/// ```no_run
/// use media_harvest::config::FetchConfig;
/// use media_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> TransportResult<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value(&config.accept)?);
    headers.insert(ACCEPT_LANGUAGE, header_value(&config.accept_language)?);

    if config.skip_certificate_verification {
        tracing::warn!("TLS certificate verification is disabled");
    }

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .danger_accept_invalid_certs(config.skip_certificate_verification)
        .build()?;

    Ok(client)
}

fn header_value(value: &str) -> TransportResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Issues GET requests with connect and read deadlines
///
/// `reqwest` only bounds connection setup, so the wait for response headers
/// and every individual body chunk are bounded here with the read timeout.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl PageFetcher {
    /// Creates a fetcher with a freshly built client
    pub fn new(config: &FetchConfig) -> TransportResult<Self> {
        Ok(Self::with_client(build_http_client(config)?, config))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &FetchConfig) -> Self {
        Self {
            client,
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            read_timeout: Duration::from_millis(config.read_timeout_ms),
        }
    }

    /// Opens a GET request to `url` and returns the response once headers arrive
    ///
    /// # Errors
    ///
    /// * `InvalidUrl` / `UnsupportedScheme` - `url` is not an http(s) URL
    /// * `Timeout` - no response headers within connect + read timeout
    /// * `Connect` - the connection could not be established
    /// * `Status` - the server answered with a non-2xx status
    pub async fn open(&self, url: &str) -> TransportResult<Response> {
        let parsed = Url::parse(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(TransportError::UnsupportedScheme {
                    url: url.to_string(),
                    scheme: other.to_string(),
                })
            }
        }

        tracing::debug!("GET {}", url);

        let deadline = self.connect_timeout + self.read_timeout;
        let response = tokio::time::timeout(deadline, self.client.get(parsed).send())
            .await
            .map_err(|_| TransportError::Timeout {
                url: url.to_string(),
            })?
            .map_err(|e| classify_send_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Fetches `url` and returns its body as text
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    pub async fn fetch_page(&self, url: &str) -> TransportResult<String> {
        let mut response = self.open(url).await?;
        let mut body = Vec::new();

        loop {
            let chunk = tokio::time::timeout(self.read_timeout, response.chunk())
                .await
                .map_err(|_| TransportError::Timeout {
                    url: url.to_string(),
                })?
                .map_err(|source| TransportError::Body {
                    url: url.to_string(),
                    source,
                })?;

            match chunk {
                Some(chunk) => body.extend_from_slice(&chunk),
                None => break,
            }
        }

        tracing::debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Streams the remaining body of `response` into `writer`
    ///
    /// # Returns
    ///
    /// The number of bytes written
    pub async fn copy_body<W>(
        &self,
        url: &str,
        response: &mut Response,
        writer: &mut W,
    ) -> Result<u64, DownloadError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written: u64 = 0;

        loop {
            let chunk = tokio::time::timeout(self.read_timeout, response.chunk())
                .await
                .map_err(|_| TransportError::Timeout {
                    url: url.to_string(),
                })?
                .map_err(|source| TransportError::Body {
                    url: url.to_string(),
                    source,
                })?;

            match chunk {
                Some(chunk) => {
                    writer.write_all(&chunk).await?;
                    written += chunk.len() as u64;
                }
                None => break,
            }
        }

        writer.flush().await?;
        Ok(written)
    }
}

/// Maps a `reqwest` send failure onto the transport error taxonomy
fn classify_send_error(url: &str, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Connect {
            url: url.to_string(),
            source: error,
        }
    }
}
