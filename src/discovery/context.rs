use std::collections::HashSet;

use crate::config::DiscoveryConfig;

/// Per-request shared state handed to every strategy within one discovery
/// call.
///
/// Created fresh by the registry at the start of each `discover` call and
/// discarded at the end; never shared across concurrent requests, so the
/// dedup sets need no locking.
pub struct DiscoveryContext<'a> {
    pub(crate) client: &'a reqwest::Client,
    pub(crate) config: &'a DiscoveryConfig,
    /// Normalized post-redirect URLs already accepted in this request.
    pub(crate) seen_urls: HashSet<String>,
    /// Content-level feed identifiers already accepted (Atom `<id>`),
    /// catching the same feed mirrored under a different URL.
    pub(crate) seen_feed_ids: HashSet<String>,
}

impl<'a> DiscoveryContext<'a> {
    pub(crate) fn new(client: &'a reqwest::Client, config: &'a DiscoveryConfig) -> Self {
        Self {
            client,
            config,
            seen_urls: HashSet::new(),
            seen_feed_ids: HashSet::new(),
        }
    }

    /// HTTP client for strategy-owned requests (lookup APIs, icon metadata).
    pub fn client(&self) -> &reqwest::Client {
        self.client
    }

    /// Discovery configuration (timeouts, body caps, user agent).
    pub fn config(&self) -> &DiscoveryConfig {
        self.config
    }
}
