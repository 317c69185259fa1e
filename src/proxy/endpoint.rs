//! Proxy endpoint records and the proxy list loader

use crate::ConfigError;
use std::fmt;
use std::path::Path;

/// One outbound proxy with its credentials
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ProxyEndpoint {
    /// Parses a `host,port,username,password` record
    pub fn parse_record(record: &str) -> Result<Self, String> {
        let fields: Vec<&str> = record.trim().split(',').map(str::trim).collect();

        let [host, port, username, password] = fields.as_slice() else {
            return Err(format!(
                "expected 4 comma-separated fields, got {}",
                fields.len()
            ));
        };

        if host.is_empty() {
            return Err("host cannot be empty".to_string());
        }

        let port = port
            .parse::<u16>()
            .map_err(|e| format!("invalid port '{}': {}", port, e))?;

        Ok(Self {
            host: host.to_string(),
            port,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Proxy URL without credentials
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Builds the reqwest proxy routing all schemes through this endpoint
    pub fn to_reqwest(&self) -> Result<reqwest::Proxy, reqwest::Error> {
        let proxy = reqwest::Proxy::all(self.url())?;
        if self.username.is_empty() {
            Ok(proxy)
        } else {
            Ok(proxy.basic_auth(&self.username, &self.password))
        }
    }
}

// Credentials stay out of logs
impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyEndpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Parses a whole proxy list, one record per line
///
/// Blank lines are skipped. A malformed record fails the whole list with its
/// 1-based line number.
pub fn parse_proxy_list(content: &str) -> Result<Vec<ProxyEndpoint>, ConfigError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            ProxyEndpoint::parse_record(line).map_err(|message| ConfigError::InvalidProxy {
                line: index + 1,
                message,
            })
        })
        .collect()
}

/// Loads the proxy list from disk
///
/// # Returns
///
/// * `Ok(Vec<ProxyEndpoint>)` - The endpoints, possibly empty
/// * `Err(ConfigError::ProxyFileMissing)` - The file does not exist
/// * `Err(ConfigError)` - The file could not be read or a record is malformed
pub fn load_proxy_list(path: &Path) -> Result<Vec<ProxyEndpoint>, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ProxyFileMissing {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let endpoints = parse_proxy_list(&content)?;
    tracing::info!(
        "Loaded {} proxies from {}",
        endpoints.len(),
        path.display()
    );
    Ok(endpoints)
}
