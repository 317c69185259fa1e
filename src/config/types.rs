use serde::Deserialize;
use std::time::Duration;

/// Default site root
pub const DEFAULT_BASE_URL: &str = "https://olympics-statistics.com";

/// Main configuration structure for Podium
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// values the scraper has always used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub proxy: ProxyConfig,
    pub output: OutputConfig,
}

/// Target site layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root URL every page path is joined onto
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Letter pages of the athlete directory (`/olympic-athletes/{letter}`)
    pub letters: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut letters: Vec<String> = ('a'..='z').map(|c| c.to_string()).collect();
        letters.push("special".to_string());

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            letters,
        }
    }
}

impl SiteConfig {
    /// URL of one athlete directory page
    pub fn letter_url(&self, letter: &str) -> String {
        format!("{}/olympic-athletes/{}", self.base_url.trim_end_matches('/'), letter)
    }

    /// URL of the nation directory
    pub fn nations_url(&self) -> String {
        format!("{}/nations", self.base_url.trim_end_matches('/'))
    }

    /// URL of the sport directory
    pub fn sports_url(&self) -> String {
        format!("{}/olympic-sports", self.base_url.trim_end_matches('/'))
    }
}

/// HTTP behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout for a single page request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Timeout for the proxy liveness probe (seconds)
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,

    /// Attempts per URL before giving up on it
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Fixed pause between failed attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Size of the concurrent worker set
    pub workers: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("podium/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 10,
            probe_timeout_secs: 5,
            max_attempts: 3,
            retry_delay_ms: 1000,
            workers: 10,
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Proxy list configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Path to the proxy list (`host,port,username,password` per line)
    pub file: String,

    /// URL probed through a proxy before it is used; defaults to the base URL
    #[serde(rename = "probe-url")]
    pub probe_url: Option<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            file: "proxies.txt".to_string(),
            probe_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON written by the athletes mode
    #[serde(rename = "athletes-path")]
    pub athletes_path: String,

    /// JSON written by the nations mode
    #[serde(rename = "nations-path")]
    pub nations_path: String,

    /// JSON written by the sports mode
    #[serde(rename = "sports-path")]
    pub sports_path: String,

    /// Local copy of the nation directory, read instead of fetching when present
    #[serde(rename = "nations-cache")]
    pub nations_cache: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            athletes_path: "full_stats.json".to_string(),
            nations_path: "fullStat_nation.json".to_string(),
            sports_path: "full_sport_by_country.json".to_string(),
            nations_cache: "nations.html".to_string(),
        }
    }
}

impl Config {
    /// The URL the proxy pool probes, falling back to the site root
    pub fn probe_url(&self) -> &str {
        self.proxy.probe_url.as_deref().unwrap_or(&self.site.base_url)
    }
}
