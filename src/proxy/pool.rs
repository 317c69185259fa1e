//! Shared pool of outbound proxies
//!
//! Endpoints are validated right before use and evicted for good the first
//! time a probe or a request through them fails. Once the pool is empty,
//! callers go direct.

use crate::config::Config;
use crate::proxy::endpoint::{load_proxy_list, ProxyEndpoint};
use crate::ConfigError;
use rand::Rng;
use reqwest::Client;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How candidates are checked before being handed out
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// URL requested with HEAD through the candidate
    pub url: String,

    /// Upper bound on the probe round trip
    pub timeout: Duration,

    pub user_agent: String,
}

impl ProbeSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.probe_url().to_string(),
            timeout: config.http.probe_timeout(),
            user_agent: config.http.user_agent.clone(),
        }
    }
}

/// Pool of live proxy endpoints
///
/// The pool only ever shrinks. All mutation goes through one mutex that is
/// never held across an await, so concurrent acquire/evict calls see a
/// consistent list.
pub struct ProxyPool {
    endpoints: Mutex<Vec<ProxyEndpoint>>,
    probe: ProbeSettings,
    direct_announced: AtomicBool,
}

impl ProxyPool {
    /// Creates a pool over the given endpoints
    pub fn new(endpoints: Vec<ProxyEndpoint>, probe: ProbeSettings) -> Self {
        Self {
            endpoints: Mutex::new(endpoints),
            probe,
            direct_announced: AtomicBool::new(false),
        }
    }

    /// A pool with no proxies; every request goes direct
    pub fn direct(probe: ProbeSettings) -> Self {
        Self::new(Vec::new(), probe)
    }

    /// Loads the configured proxy list and builds the pool
    ///
    /// Fails with `ConfigError::ProxyFileMissing` when the list does not exist.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let endpoints = load_proxy_list(Path::new(&config.proxy.file))?;
        Ok(Self::new(endpoints, ProbeSettings::from_config(config)))
    }

    /// Hands out a validated proxy, or `None` when none is left
    ///
    /// Candidates are drawn uniformly at random. Each one is probed first;
    /// a candidate that fails the probe is evicted and another is drawn.
    pub async fn acquire(&self) -> Option<ProxyEndpoint> {
        while let Some(candidate) = self.pick() {
            match self.probe(&candidate).await {
                Ok(()) => {
                    tracing::trace!("Proxy {} passed probe", candidate);
                    return Some(candidate);
                }
                Err(reason) => {
                    tracing::warn!("Proxy {} failed probe ({}), evicting", candidate, reason);
                    self.evict(&candidate);
                }
            }
        }

        if !self.direct_announced.swap(true, Ordering::Relaxed) {
            tracing::warn!("No valid proxy left, continuing with direct requests");
        }
        None
    }

    /// Removes an endpoint from the pool
    ///
    /// Returns whether the endpoint was still present. Evicting an endpoint
    /// that is already gone is a no-op.
    pub fn evict(&self, endpoint: &ProxyEndpoint) -> bool {
        let mut endpoints = self.lock();
        let before = endpoints.len();
        endpoints.retain(|e| e != endpoint);
        let removed = endpoints.len() != before;

        if removed {
            tracing::debug!("Evicted proxy {}, {} left", endpoint, endpoints.len());
        }
        removed
    }

    /// Number of endpoints still in the pool
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the endpoints still in the pool
    pub fn endpoints(&self) -> Vec<ProxyEndpoint> {
        self.lock().clone()
    }

    fn pick(&self) -> Option<ProxyEndpoint> {
        let endpoints = self.lock();
        if endpoints.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..endpoints.len());
        Some(endpoints[index].clone())
    }

    async fn probe(&self, endpoint: &ProxyEndpoint) -> Result<(), String> {
        let proxy = endpoint.to_reqwest().map_err(|e| e.to_string())?;
        let client = Client::builder()
            .proxy(proxy)
            .timeout(self.probe.timeout)
            .user_agent(self.probe.user_agent.as_str())
            .build()
            .map_err(|e| e.to_string())?;

        let response = client
            .head(&self.probe.url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        response
            .error_for_status()
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProxyEndpoint>> {
        // A panic elsewhere cannot leave the list half-updated
        self.endpoints.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
