//! HTTP fetcher implementation
//!
//! This module handles all page requests for the scraper, including:
//! - Building HTTP clients (direct, or routed through a pooled proxy)
//! - Retry logic for transient failures
//! - Evicting proxies that fail mid-request
//! - Error classification

use crate::config::HttpConfig;
use crate::proxy::{ProxyEndpoint, ProxyPool};
use reqwest::{Client, StatusCode};
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("proxy {proxy} failed: {message}")]
    Proxy { proxy: String, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl AttemptError {
    /// Whether the failure was the proxy's fault rather than the target's
    pub fn is_proxy(&self) -> bool {
        matches!(self, AttemptError::Proxy { .. })
    }
}

/// A URL that could not be fetched within its attempt budget
#[derive(Debug, Clone, Error)]
#[error("failed to fetch {url} after {attempts} attempt(s): {last}")]
pub struct FetchError {
    pub url: String,
    pub attempts: u32,
    #[source]
    pub last: AttemptError,
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct Document {
    pub url: String,
    pub body: String,
}

impl Document {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }

    /// Parses the body and runs `extract` over it
    ///
    /// The parsed tree is not `Send`, so it is built and dropped here rather
    /// than held across an await point.
    pub fn extract<T>(&self, extract: impl FnOnce(&Html) -> T) -> T {
        let html = Html::parse_document(&self.body);
        extract(&html)
    }
}

/// Fetches pages through the proxy pool with bounded retries
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Return the page |
/// | Proxy unreachable / HTTP 407 | Evict proxy, retry at once |
/// | Timeout | Wait `retry_delay`, retry |
/// | Connection error (direct) | Wait `retry_delay`, retry |
/// | Any other non-2xx | Wait `retry_delay`, retry |
///
/// Every attempt draws a fresh proxy from the pool. Once the pool is empty,
/// attempts go direct.
pub struct Fetcher {
    pool: Arc<ProxyPool>,
    direct: Client,
    user_agent: String,
    timeout: Duration,
    retry_delay: Duration,
    max_attempts: u32,
}

impl Fetcher {
    /// Builds a fetcher drawing proxies from `pool`
    ///
    /// # Returns
    ///
    /// * `Ok(Fetcher)` - Ready to fetch
    /// * `Err(reqwest::Error)` - The direct client could not be built
    pub fn new(pool: Arc<ProxyPool>, config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let direct = client_builder(&config.user_agent, config.request_timeout())
            .no_proxy()
            .build()?;

        Ok(Self {
            pool,
            direct,
            user_agent: config.user_agent.clone(),
            timeout: config.request_timeout(),
            retry_delay: config.retry_delay(),
            max_attempts: config.max_attempts,
        })
    }

    /// The pool this fetcher draws from
    pub fn pool(&self) -> &Arc<ProxyPool> {
        &self.pool
    }

    /// Fetches `url` with the configured attempt budget
    pub async fn fetch_default(&self, url: &str) -> Result<Document, FetchError> {
        self.fetch(url, self.max_attempts).await
    }

    /// Fetches `url`, trying at most `max_attempts` times
    ///
    /// A budget of zero is treated as one attempt.
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - The first 2xx response
    /// * `Err(FetchError)` - Every attempt failed; carries the last failure
    pub async fn fetch(&self, url: &str, max_attempts: u32) -> Result<Document, FetchError> {
        let max_attempts = max_attempts.max(1);
        let mut last = AttemptError::Request("no attempt made".to_string());

        for attempt in 1..=max_attempts {
            let proxy = self.pool.acquire().await;
            let route = proxy
                .as_ref()
                .map(|p| format!("via {}", p))
                .unwrap_or_else(|| "direct".to_string());

            tracing::debug!("Attempt {}/{} for {} {}", attempt, max_attempts, url, route);

            match self.attempt(url, proxy.as_ref()).await {
                Ok(body) => return Ok(Document::new(url, body)),
                Err(error) => {
                    tracing::warn!(
                        "Attempt {}/{} for {} {} failed: {}",
                        attempt,
                        max_attempts,
                        url,
                        route,
                        error
                    );

                    let is_proxy = error.is_proxy();
                    if is_proxy {
                        if let Some(proxy) = &proxy {
                            self.pool.evict(proxy);
                        }
                    }
                    last = error;

                    if !is_proxy && attempt < max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(FetchError {
            url: url.to_string(),
            attempts: max_attempts,
            last,
        })
    }

    /// Makes one request and classifies its failure
    async fn attempt(&self, url: &str, proxy: Option<&ProxyEndpoint>) -> Result<String, AttemptError> {
        let client = match proxy {
            Some(endpoint) => self.proxied_client(endpoint)?,
            None => self.direct.clone(),
        };

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(&e, proxy))?;

        let status = response.status();
        if status == StatusCode::PROXY_AUTHENTICATION_REQUIRED {
            if let Some(endpoint) = proxy {
                return Err(AttemptError::Proxy {
                    proxy: endpoint.to_string(),
                    message: "proxy authentication rejected".to_string(),
                });
            }
        }

        if !status.is_success() {
            return Err(AttemptError::Status(status.as_u16()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                AttemptError::Timeout
            } else {
                AttemptError::Body(e.to_string())
            }
        })
    }

    fn proxied_client(&self, endpoint: &ProxyEndpoint) -> Result<Client, AttemptError> {
        let as_proxy_error = |e: reqwest::Error| AttemptError::Proxy {
            proxy: endpoint.to_string(),
            message: e.to_string(),
        };

        let proxy = endpoint.to_reqwest().map_err(as_proxy_error)?;
        client_builder(&self.user_agent, self.timeout)
            .proxy(proxy)
            .build()
            .map_err(as_proxy_error)
    }
}

fn client_builder(user_agent: &str, timeout: Duration) -> reqwest::ClientBuilder {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
}

/// Maps a transport error to an attempt failure
///
/// With a proxy in play, failing to connect means the proxy itself is
/// unreachable.
fn classify_error(error: &reqwest::Error, proxy: Option<&ProxyEndpoint>) -> AttemptError {
    if error.is_timeout() {
        return AttemptError::Timeout;
    }

    if error.is_connect() {
        return match proxy {
            Some(endpoint) => AttemptError::Proxy {
                proxy: endpoint.to_string(),
                message: error.to_string(),
            },
            None => AttemptError::Connect(error.to_string()),
        };
    }

    AttemptError::Request(error.to_string())
}
