//! Release archive retrieval.
//!
//! Provides a trait-based abstraction for fetching archive bytes so that the
//! install pipeline can be exercised without network access.

use log::debug;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for a whole archive download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Upper bound on the archive size accepted from the server (512 MiB).
pub const MAX_ARCHIVE_BYTES: u64 = 512 * 1024 * 1024;

/// Trait for fetching release archives.
///
/// Abstractions allow tests to mock HTTP behaviour without network access.
///
/// # Examples
///
/// ```
/// use azguard_installer::artefact::download::HttpFetcher;
///
/// let fetcher = HttpFetcher;
/// // Use fetcher.fetch("https://...") in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactFetcher {
    /// Fetch the body at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or a non-success status.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Errors arising from archive download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested artefact was not found (HTTP 404).
    #[error("artefact not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The URL does not use HTTPS.
    #[error("refusing to download over an insecure scheme: {url}")]
    InsecureUrl {
        /// The rejected URL.
        url: String,
    },

    /// The response body exceeded [`MAX_ARCHIVE_BYTES`].
    #[error("download from {url} exceeds the {limit}-byte limit")]
    TooLarge {
        /// The URL being read.
        url: String,
        /// The byte limit that was exceeded.
        limit: u64,
    },

    /// I/O error while reading the response body.
    #[error("I/O error reading download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based fetcher using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl ArtefactFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        if !is_https(url) {
            return Err(DownloadError::InsecureUrl {
                url: url.to_owned(),
            });
        }
        debug!("fetching {url}");
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut body = response.into_body();
        read_limited(&mut body, url)
    }
}

/// Return whether `url` uses the `https` scheme.
#[must_use]
pub fn is_https(url: &str) -> bool {
    url.get(..8)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("https://"))
}

/// Read the whole body, failing once it exceeds [`MAX_ARCHIVE_BYTES`].
fn read_limited(body: &mut ureq::Body, url: &str) -> Result<Vec<u8>, DownloadError> {
    let bytes = body
        .with_config()
        .limit(MAX_ARCHIVE_BYTES)
        .read_to_vec()
        .map_err(|e| map_ureq_error(url, &e))?;
    debug!("fetched {} bytes from {url}", bytes.len());
    Ok(bytes)
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        ureq::Error::BodyExceedsLimit(limit) => DownloadError::TooLarge {
            url: url.to_owned(),
            limit: *limit,
        },
        ureq::Error::Io(e) => DownloadError::Io(std::io::Error::new(e.kind(), e.to_string())),
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
