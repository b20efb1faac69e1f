//! Discovery configuration.
//!
//! All fields use `#[serde(default)]` so the embedding application's config
//! layer can deserialize any subset of keys; missing keys fall back to
//! `Default::default()`. This crate never reads config files itself — the
//! caller owns file I/O and hands a [`DiscoveryConfig`] to the registry.

use serde::Deserialize;
use std::time::Duration;

/// Tuning knobs for discovery network behavior and adversarial-input bounds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Per-request timeout in seconds for every network call a strategy or
    /// the validator makes.
    pub request_timeout_secs: u64,

    /// Maximum response body size in bytes. Bodies are read as a stream and
    /// abandoned once this cap is exceeded.
    pub max_body_bytes: usize,

    /// `User-Agent` header sent with every discovery request.
    pub user_agent: String,

    /// Maximum number of `<link rel="alternate">` candidates taken from a
    /// single HTML page. Bounds the fetch fan-out on adversarial pages.
    pub max_link_candidates: usize,

    /// Permit discovery against localhost and private-network hosts.
    ///
    /// Off by default (SSRF protection). Self-hosted deployments that
    /// subscribe to LAN feeds can opt in.
    pub allow_private_networks: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_body_bytes: 5 * 1024 * 1024, // 5MB
            user_agent: format!("feedscout/{}", env!("CARGO_PKG_VERSION")),
            max_link_candidates: 8,
            allow_private_networks: false,
        }
    }
}

impl DiscoveryConfig {
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
