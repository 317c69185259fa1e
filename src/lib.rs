//! Podium: an Olympic medal scraper
//!
//! This crate collects athlete and medal data from olympics-statistics.com,
//! routing requests through a rotating proxy pool, and folds the results into
//! per-country and per-country-per-sport medal tallies.

pub mod aggregate;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod proxy;

use thiserror::Error;

pub use crawler::{AttemptError, FetchError};

/// Main error type for Podium operations
#[derive(Debug, Error)]
pub enum PodiumError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Could not enumerate {what}: {reason}")]
    DirectoryUnavailable { what: String, reason: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Proxy file not found: {path}")]
    ProxyFileMissing { path: String },

    #[error("Invalid proxy record on line {line}: {message}")]
    InvalidProxy { line: usize, message: String },
}

/// Result type alias for Podium operations
pub type Result<T> = std::result::Result<T, PodiumError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use aggregate::{AggregateOutput, AthleteRecord, MedalEntry, MedalTally, MedalType, Tallies};
pub use config::Config;
pub use crawler::{Coordinator, Mode};
pub use output::RunReport;
pub use proxy::{ProxyEndpoint, ProxyPool};
