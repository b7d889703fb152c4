/// Profile page fetching. All HTTP traffic goes through `ProfileClient`.
///
/// Transient failures (transport errors, 429, 5xx) are retried a fixed number of
/// times with a fixed delay between attempts. Anything still failing after that
/// is reported to the caller, which treats it as "no profile available".
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod debug_log;

pub use debug_log::DebugLog;

/// Only profile pages on the community site are fetched.
const SUPPORTED_PROFILE_PATH: &str = "libecity.com/user_profile/";
const USER_AGENT: &str = concat!("skillzero/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Unsupported profile URL: {0}")]
    UnsupportedUrl(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

impl FetchError {
    /// Whether another attempt could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::UnsupportedUrl(_) | FetchError::RetriesExhausted { .. } => false,
        }
    }
}

/// A fetched document plus the response metadata the debug log records.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub requested_url: String,
    pub final_url: String,
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

/// Source of profile pages. `ProfileClient` is the network implementation;
/// tests substitute canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Whether `url` is an http(s) link to a community profile page.
pub fn is_supported_profile_url(url: &str) -> bool {
    let url = url.trim();
    (url.starts_with("http://") || url.starts_with("https://")) && url.contains(SUPPORTED_PROFILE_PATH)
}

/// HTTP client for profile pages with bounded, fixed-delay retry.
#[derive(Clone)]
pub struct ProfileClient {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl ProfileClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let body = response.text().await?;

        Ok(FetchedPage {
            requested_url: url.to_string(),
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for ProfileClient {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        if !is_supported_profile_url(url) {
            return Err(FetchError::UnsupportedUrl(url.to_string()));
        }
        let page = retry_fixed(self.max_retries, self.retry_delay, move |_| self.fetch_once(url)).await?;
        debug!(
            "Fetched {} ({} bytes, {})",
            page.final_url,
            page.body.len(),
            page.content_type
        );
        Ok(page)
    }
}

/// Runs `op` up to `attempts` times (at least once), sleeping `delay` between
/// attempts. Only transient errors are retried; the first permanent error is
/// returned as-is.
pub async fn retry_fixed<T, F, Fut>(attempts: u32, delay: Duration, mut op: F) -> Result<T, FetchError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let attempts = attempts.max(1);
    let mut last_error: Option<FetchError> = None;

    for attempt in 0..attempts {
        if let Some(err) = &last_error {
            warn!(
                "Attempt {}/{} failed ({err}), retrying after {}ms...",
                attempt,
                attempts,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() => last_error = Some(err),
            Err(err) => return Err(err),
        }
    }

    Err(FetchError::RetriesExhausted {
        attempts,
        last: last_error.map(|e| e.to_string()).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn server_error() -> FetchError {
        FetchError::Status {
            status: 503,
            url: "https://libecity.com/user_profile/x".to_string(),
        }
    }

    #[test]
    fn test_supported_urls() {
        assert!(is_supported_profile_url("https://libecity.com/user_profile/abc"));
        assert!(is_supported_profile_url(" http://libecity.com/user_profile/abc "));
        assert!(!is_supported_profile_url("https://example.com/user_profile/abc"));
        assert!(!is_supported_profile_url("libecity.com/user_profile/abc"));
        assert!(!is_supported_profile_url(""));
    }

    #[test]
    fn test_transient_classification() {
        assert!(server_error().is_transient());
        assert!(FetchError::Status { status: 429, url: String::new() }.is_transient());
        assert!(!FetchError::Status { status: 404, url: String::new() }.is_transient());
        assert!(!FetchError::UnsupportedUrl(String::new()).is_transient());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = retry_fixed(3, Duration::from_secs(2), |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(server_error())
                } else {
                    Ok("page")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "page");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // two fixed delays, no backoff
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_bound() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_fixed(3, Duration::from_millis(10), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(server_error()) }
        })
        .await;

        assert!(matches!(result, Err(FetchError::RetriesExhausted { attempts: 3, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_fixed(3, Duration::from_millis(10), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(FetchError::Status {
                    status: 404,
                    url: String::new(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(FetchError::Status { status: 404, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_client_rejects_unsupported_url_without_network() {
        let config = Config::from_lookup(|_| None).unwrap();
        let client = ProfileClient::new(&config).unwrap();
        let err = client.fetch("https://example.com/me").await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedUrl(_)));
    }
}
