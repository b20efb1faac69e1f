//! Shared feed validation: fetch, parse, dedup, extract.
//!
//! Every strategy funnels its candidate URLs through
//! [`DiscoveryContext::validate_feed`], which owns the per-request dedup
//! state. Failures of any kind are soft — the validator logs at debug level
//! and returns `None`, never an error.

use feed_rs::model::FeedType as ParsedFeedType;
use futures::StreamExt;
use reqwest::header;
use thiserror::Error;

use super::context::DiscoveryContext;
use super::types::{DiscoveredFeed, FeedType};
use crate::util::{normalize_url, strip_control_chars, strip_html};

/// `Accept` header requesting feed MIME types ahead of generic content.
const FEED_ACCEPT: &str = "application/rss+xml, application/atom+xml, \
     application/feed+json, application/xml;q=0.9, text/xml;q=0.8, */*;q=0.5";

/// Placeholder title when a feed declares none.
const UNTITLED: &str = "Untitled Feed";

#[derive(Debug, Error)]
pub(crate) enum BodyError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("response exceeded {0} bytes")]
    TooLarge(usize),
}

/// A fetched candidate body, paired with the redirect-resolved URL it was
/// served from.
pub(crate) struct FetchedCandidate {
    pub(crate) final_url: String,
    pub(crate) bytes: Vec<u8>,
}

impl DiscoveryContext<'_> {
    /// Validates a candidate feed URL into a [`DiscoveredFeed`].
    ///
    /// Fetches the URL (bounded timeout, redirects followed), deduplicates on
    /// the normalized final URL and on the feed's content-level id, parses
    /// the body as a syndication document, and extracts metadata.
    ///
    /// Returns `None` on any network failure, non-2xx status, timeout,
    /// oversized body, parse failure, or duplicate — all indistinguishable
    /// soft misses from the caller's perspective.
    ///
    /// The returned record carries the *original* `feed_url`, not the
    /// post-redirect one; normalization is for dedup comparison only.
    pub async fn validate_feed(&mut self, feed_url: &str) -> Option<DiscoveredFeed> {
        let fetched = self.fetch_candidate(feed_url).await?;
        self.validate_feed_bytes(feed_url, &fetched.final_url, &fetched.bytes)
    }

    /// Fetches a candidate URL with the feed `Accept` header, returning the
    /// body and the redirect-resolved URL. Soft-misses on network failure,
    /// timeout, non-2xx status, or an oversized body.
    ///
    /// Split from [`validate_feed`](Self::validate_feed) so a strategy that
    /// needs the raw body for its own purposes (the fallback's HTML scan)
    /// can fetch once and still run byte-level validation on the same
    /// response.
    pub(crate) async fn fetch_candidate(&self, url: &str) -> Option<FetchedCandidate> {
        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, FEED_ACCEPT)
            .header(header::USER_AGENT, self.config.user_agent.as_str())
            .send();

        let response = match tokio::time::timeout(self.config.request_timeout(), request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::debug!(url = url, error = %e, "discovery fetch failed");
                return None;
            }
            Err(_) => {
                tracing::debug!(url = url, "discovery fetch timed out");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                url = url,
                status = %response.status(),
                "discovery fetch returned non-success status"
            );
            return None;
        }

        let final_url = response.url().to_string();
        let bytes = match read_limited_body(response, self.config.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(url = url, error = %e, "discovery body read failed");
                return None;
            }
        };

        Some(FetchedCandidate { final_url, bytes })
    }

    /// Runs the dedup/parse/extract half of validation on an already-fetched
    /// body.
    pub(crate) fn validate_feed_bytes(
        &mut self,
        feed_url: &str,
        final_url: &str,
        bytes: &[u8],
    ) -> Option<DiscoveredFeed> {
        // Dedup key is the redirect-resolved URL. Insert *before* parsing:
        // two candidates resolving to the same final URL must not both
        // validate, and the insert is what closes that window.
        if !self.seen_urls.insert(normalize_url(final_url)) {
            tracing::debug!(url = feed_url, "duplicate feed URL after redirect resolution");
            return None;
        }

        let feed = match feed_rs::parser::parse(bytes) {
            Ok(feed) => feed,
            Err(e) => {
                tracing::debug!(url = feed_url, error = %e, "feed parse failed");
                return None;
            }
        };

        // Content-level dedup: an Atom feed served from two URLs still
        // carries the same declared <id>.
        if feed.feed_type == ParsedFeedType::Atom && !feed.id.is_empty() {
            if !self.seen_feed_ids.insert(feed.id.clone()) {
                tracing::debug!(url = feed_url, feed_id = %feed.id, "duplicate feed id");
                return None;
            }
        }

        let title = feed
            .title
            .map(|t| clean_text(&t.content))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_owned());

        // feed-rs maps Atom <subtitle> into `description`, covering the
        // description-then-subtitle preference in one field
        let description = feed
            .description
            .map(|d| clean_text(&d.content))
            .filter(|d| !d.is_empty());

        Some(DiscoveredFeed {
            url: feed_url.to_owned(),
            title,
            feed_type: FeedType::from(feed.feed_type),
            description,
            icon_url: None,
        })
    }
}

/// HTML-strips and sanitizes attacker-controlled feed metadata.
fn clean_text(raw: &str) -> String {
    let stripped = strip_html(raw);
    strip_control_chars(&stripped).trim().to_owned()
}

/// Reads a response body with a size cap using stream-based reading.
pub(crate) async fn read_limited_body(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, BodyError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(BodyError::TooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(BodyError::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
