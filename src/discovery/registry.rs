use reqwest::Client;

use super::apple::ApplePodcastsStrategy;
use super::context::DiscoveryContext;
use super::reddit::RedditStrategy;
use super::standard::StandardStrategy;
use super::strategy::DiscoveryStrategy;
use super::types::{DiscoveredFeed, DiscoveryError};
use crate::config::DiscoveryConfig;
use crate::util::validate_url;

/// Priority-ordered collection of discovery strategies.
///
/// The strategy list is fixed after startup registration; `discover` holds no
/// cross-call state, so concurrent calls for different URLs are fully
/// independent.
pub struct DiscoveryRegistry {
    strategies: Vec<Box<dyn DiscoveryStrategy>>,
    config: DiscoveryConfig,
}

impl DiscoveryRegistry {
    /// An empty registry. Useful when composing a custom strategy set.
    pub fn empty(config: DiscoveryConfig) -> Self {
        Self {
            strategies: Vec::new(),
            config,
        }
    }

    /// A registry with the built-in strategies: Apple Podcasts lookup,
    /// Reddit community feeds, and the generic website fallback.
    pub fn new(config: DiscoveryConfig) -> Self {
        let mut registry = Self::empty(config);
        registry.register(Box::new(ApplePodcastsStrategy::new()));
        registry.register(Box::new(RedditStrategy::new()));
        registry.register(Box::new(StandardStrategy::new()));
        registry
    }

    /// Adds a strategy, keeping the list sorted ascending by priority.
    ///
    /// The sort is stable: strategies with equal priority run in
    /// registration order.
    pub fn register(&mut self, strategy: Box<dyn DiscoveryStrategy>) {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(|s| s.priority());
    }

    /// Discovers feeds for a user-supplied URL.
    ///
    /// Strategies run sequentially in priority order — first-match-wins is a
    /// correctness property, so eligible strategies are never raced. A
    /// strategy fault is logged with its identity and treated as a miss for
    /// that strategy only.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::InvalidUrl`] when the input fails URL validation
    ///   (unparseable, non-HTTP scheme, or a private/localhost target unless
    ///   [`DiscoveryConfig::allow_private_networks`] is set).
    /// - [`DiscoveryError::NotFound`] when every eligible strategy came up
    ///   empty.
    pub async fn discover(
        &self,
        client: &Client,
        url: &str,
    ) -> Result<Vec<DiscoveredFeed>, DiscoveryError> {
        let parsed = if self.config.allow_private_networks {
            url::Url::parse(url).map_err(|e| DiscoveryError::InvalidUrl(e.to_string()))?
        } else {
            validate_url(url).map_err(|e| DiscoveryError::InvalidUrl(e.to_string()))?
        };

        let mut ctx = DiscoveryContext::new(client, &self.config);

        for strategy in &self.strategies {
            if !strategy.can_handle(&parsed) {
                continue;
            }

            match strategy.discover(&parsed, &mut ctx).await {
                Ok(feeds) if !feeds.is_empty() => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        url = url,
                        count = feeds.len(),
                        "discovery succeeded"
                    );
                    return Ok(feeds);
                }
                Ok(_) => {
                    tracing::debug!(strategy = strategy.name(), url = url, "strategy found nothing");
                }
                Err(e) => {
                    // One strategy's fault must not abort discovery for a URL
                    // another strategy might still resolve
                    tracing::warn!(
                        strategy = strategy.name(),
                        url = url,
                        error = %e,
                        "strategy failed"
                    );
                }
            }
        }

        Err(DiscoveryError::NotFound)
    }
}

impl Default for DiscoveryRegistry {
    fn default() -> Self {
        Self::new(DiscoveryConfig::default())
    }
}
