//! feedscout — resolve arbitrary URLs to the feeds they expose.
//!
//! Given a website, an Apple Podcasts page, a Reddit community, or a raw
//! feed URL, discovery determines the machine-readable RSS/Atom/RDF/JSON
//! feed(s) behind it, validates and deduplicates them, and extracts title,
//! description, and (when a strategy has better metadata than the feed
//! itself) an icon URL.
//!
//! Discovery is strategy-based: handlers specialized for one class of URL
//! run in priority order, and the first non-empty result wins. All network
//! calls are bounded by timeouts and body-size caps; upstream responses are
//! treated as adversarial input throughout.
//!
//! # Example
//!
//! ```no_run
//! use feedscout::discover_feeds;
//!
//! # async fn run() -> Result<(), feedscout::DiscoveryError> {
//! let client = reqwest::Client::new();
//! let feeds = discover_feeds(&client, "https://example.com/").await?;
//! for feed in feeds {
//!     println!("{} ({:?}): {}", feed.title, feed.feed_type, feed.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Callers needing custom strategies, tuned timeouts, or LAN access build a
//! [`DiscoveryRegistry`] directly instead.

mod config;
mod discovery;
pub mod util;

pub use config::DiscoveryConfig;
pub use discovery::{
    ApplePodcastsStrategy, DiscoveredFeed, DiscoveryContext, DiscoveryError, DiscoveryRegistry,
    DiscoveryStrategy, FeedType, RedditStrategy, StandardStrategy,
};

/// Discovers feeds for a URL using the built-in strategy set and default
/// configuration.
///
/// # Errors
///
/// - [`DiscoveryError::InvalidUrl`] for unparseable input or URLs rejected
///   by SSRF validation.
/// - [`DiscoveryError::NotFound`] when no strategy finds a feed.
pub async fn discover_feeds(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<DiscoveredFeed>, DiscoveryError> {
    DiscoveryRegistry::default().discover(client, url).await
}
