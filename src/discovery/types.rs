use serde::Serialize;
use thiserror::Error;

/// Syndication format of a discovered feed, derived from the parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    /// RSS 0.9x / 2.0
    Rss,
    /// Atom 1.0
    Atom,
    /// RSS 1.0 (RDF-based)
    Rdf,
    /// JSON Feed
    Json,
}

impl From<feed_rs::model::FeedType> for FeedType {
    fn from(ft: feed_rs::model::FeedType) -> Self {
        match ft {
            feed_rs::model::FeedType::Atom => FeedType::Atom,
            feed_rs::model::FeedType::JSON => FeedType::Json,
            // RSS 1.0 is the RDF branch of the format family
            feed_rs::model::FeedType::RSS1 => FeedType::Rdf,
            feed_rs::model::FeedType::RSS0 | feed_rs::model::FeedType::RSS2 => FeedType::Rss,
        }
    }
}

/// A feed discovered from a URL, with metadata extracted during validation.
///
/// `url` is always the URL the candidate was validated under — the original,
/// pre-redirect address. Feeds are frequently served from CDN or
/// tracking-redirect URLs distinct from the canonical address a user would
/// recognize or resubscribe to; preserving the original while deduplicating
/// on the resolved URL avoids both spurious "not found" outcomes and
/// duplicate-subscription bugs.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredFeed {
    /// The feed URL as given to the validator (pre-redirect).
    pub url: String,
    /// Feed title; `"Untitled Feed"` when the document declares none.
    pub title: String,
    /// Detected syndication format.
    #[serde(rename = "type")]
    pub feed_type: FeedType,
    /// Feed description, HTML-stripped, if available.
    pub description: Option<String>,
    /// Icon/artwork URL supplied by strategies with higher-fidelity metadata
    /// than the feed document itself (e.g., podcast artwork).
    pub icon_url: Option<String>,
}

/// Errors surfaced to callers of feed discovery.
///
/// Everything recoverable is handled inside the validator and strategies
/// (soft misses); only the input-rejection and exhaustion outcomes cross the
/// subsystem boundary.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The input URL failed validation (unparseable, bad scheme, SSRF).
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// Every eligible strategy came up empty.
    #[error("No RSS or Atom feeds found on this website")]
    NotFound,
}
