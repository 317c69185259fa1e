//! Outbound proxy handling
//!
//! This module contains:
//! - Proxy endpoint records and the proxy list loader
//! - The shared pool that validates, hands out, and evicts endpoints

mod endpoint;
mod pool;

pub use endpoint::{load_proxy_list, parse_proxy_list, ProxyEndpoint};
pub use pool::{ProbeSettings, ProxyPool};
