//! ImageFetcher - downloads image bytes over HTTP(S).

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Url;

use crate::config::FetchConfig;

/// Default timeout for a whole request (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on downloaded bodies (32 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 32 * 1024 * 1024;

/// User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("pixcast/", env!("CARGO_PKG_VERSION"));

/// URL schemes the fetcher will follow.
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Parse and vet a request line as a fetchable URL.
///
/// Only absolute `http` and `https` URLs are accepted.
pub fn parse_image_url(raw: &str) -> Result<Url, FetchError> {
    let url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
    }

    Ok(url)
}

/// HTTP client used by sessions to retrieve images.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    http_client: reqwest::Client,
    max_bytes: u64,
}

impl ImageFetcher {
    /// Create a fetcher with the built-in timeouts and size cap.
    pub fn new() -> Result<Self, FetchError> {
        Self::from_config(&FetchConfig::default())
    }

    /// Create a fetcher from the `[fetch]` configuration section.
    pub fn from_config(config: &FetchConfig) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http_client,
            max_bytes: config.max_image_bytes,
        })
    }

    /// Largest body this fetcher will accept.
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Download the resource at `url` and return its body.
    ///
    /// The body is streamed and abandoned as soon as it grows past
    /// [`max_bytes`](Self::max_bytes).
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` / `FetchError::UnsupportedScheme` before
    /// touching the network, `FetchError::Status` for any non-2xx response,
    /// `FetchError::TooLarge` when the body exceeds the cap, or
    /// `FetchError::Http` if the request itself fails.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = parse_image_url(url)?;

        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("Fetch returned status {}", status);
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result?;
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(FetchError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}

/// Errors that can occur while fetching an image.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected input
        url: String,
        /// Parser message
        reason: String,
    },

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    #[error("image exceeds {limit} bytes")]
    TooLarge {
        /// Configured byte cap
        limit: u64,
    },
}
