//! Configuration module for Podium
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so running without a file
//! scrapes the live site with the stock settings.
//!
//! # Example
//!
//! ```no_run
//! use podium::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("podium.toml")).unwrap();
//! println!("Scraping {} with {} workers", config.site.base_url, config.http.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig, ProxyConfig, SiteConfig, DEFAULT_BASE_URL};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
pub use validation::validate;
