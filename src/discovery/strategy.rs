use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use super::context::DiscoveryContext;
use super::types::DiscoveredFeed;

/// A pluggable discovery handler specialized for one class of input URL.
///
/// Strategies are registered with a
/// [`DiscoveryRegistry`](super::registry::DiscoveryRegistry) and dispatched
/// in ascending [`priority`](DiscoveryStrategy::priority) order; the first
/// strategy returning a non-empty result wins and later strategies never run.
///
/// # Contract
///
/// - [`can_handle`](DiscoveryStrategy::can_handle) is a pure predicate: no
///   I/O, no side effects.
/// - [`discover`](DiscoveryStrategy::discover) is fail-soft for ordinary
///   misses (inapplicable URL shape, upstream said no, candidate failed
///   validation): return `Ok(Vec::new())`. Reserve `Err` for genuine faults;
///   the registry logs those and moves on to the next strategy.
/// - Every candidate feed URL goes through
///   [`DiscoveryContext::validate_feed`] so per-request dedup holds across
///   strategies.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    /// Identity used in fault logs.
    fn name(&self) -> &'static str;

    /// Dispatch order; lower runs earlier. Ties keep registration order.
    fn priority(&self) -> u32;

    /// Whether this strategy applies to the URL. Must not perform I/O.
    fn can_handle(&self, url: &Url) -> bool;

    /// Attempts discovery, returning zero or more validated feeds.
    async fn discover(
        &self,
        url: &Url,
        ctx: &mut DiscoveryContext<'_>,
    ) -> Result<Vec<DiscoveredFeed>>;
}
