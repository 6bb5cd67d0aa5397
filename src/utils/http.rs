//! HTTP client utilities
//!
//! Provides centralized HTTP client creation with consistent configuration.

use crate::config;
use reqwest::Client;
use std::time::Duration;

/// Create an HTTP client for reachability probes
///
/// Per-request timeouts are applied by the caller; the connect timeout here
/// matches the probe budget so a blackholed host cannot stall a probe.
pub fn create_probe_client() -> Result<Client, String> {
    Client::builder()
        .user_agent(config::app::USER_AGENT)
        .connect_timeout(Duration::from_secs(config::http::PROBE_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::limited(config::http::MAX_REDIRECTS))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {}", e))
}

/// Create an HTTP client for downloading game documents and images
pub fn create_fetch_client() -> Result<Client, String> {
    Client::builder()
        .user_agent(config::app::USER_AGENT)
        .timeout(Duration::from_secs(config::http::REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(config::http::CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::limited(config::http::MAX_REDIRECTS))
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {}", e))
}
