//! Apple Podcasts discovery.
//!
//! Apple Podcasts pages don't expose the underlying feed in their HTML, but
//! the iTunes lookup API resolves a numeric podcast id to its `feedUrl` along
//! with richer metadata (collection name, artwork) than the raw feed
//! declares.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use url::Url;

use super::context::DiscoveryContext;
use super::strategy::DiscoveryStrategy;
use super::types::DiscoveredFeed;
use super::validator::read_limited_body;
use crate::util::strip_html;

const ITUNES_LOOKUP_BASE: &str = "https://itunes.apple.com/lookup";

/// Resolves `podcasts.apple.com` / `itunes.apple.com` URLs through the iTunes
/// lookup API. Runs before the generic fallback.
pub struct ApplePodcastsStrategy {
    lookup_base: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResult {
    feed_url: Option<String>,
    collection_name: Option<String>,
    description: Option<String>,
    short_description: Option<String>,
    artwork_url_600: Option<String>,
    artwork_url_100: Option<String>,
    artwork_url_60: Option<String>,
}

impl ApplePodcastsStrategy {
    pub fn new() -> Self {
        Self {
            lookup_base: ITUNES_LOOKUP_BASE.to_owned(),
        }
    }

    /// Overrides the lookup endpoint (tests, proxied deployments).
    pub fn with_lookup_base(lookup_base: impl Into<String>) -> Self {
        Self {
            lookup_base: lookup_base.into(),
        }
    }

    /// Calls the iTunes lookup API for a podcast id.
    ///
    /// Any failure along the way — timeout, non-2xx, malformed JSON — is a
    /// soft miss.
    async fn lookup(&self, id: &str, ctx: &DiscoveryContext<'_>) -> Option<LookupResult> {
        let lookup_url = format!("{}?id={}&entity=podcast", self.lookup_base, id);
        let request = ctx
            .client()
            .get(&lookup_url)
            .header(header::USER_AGENT, ctx.config().user_agent.as_str())
            .send();

        let response = match tokio::time::timeout(ctx.config().request_timeout(), request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::debug!(podcast_id = id, error = %e, "iTunes lookup failed");
                return None;
            }
            Err(_) => {
                tracing::debug!(podcast_id = id, "iTunes lookup timed out");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                podcast_id = id,
                status = %response.status(),
                "iTunes lookup returned non-success status"
            );
            return None;
        }

        let bytes = match read_limited_body(response, ctx.config().max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(podcast_id = id, error = %e, "iTunes lookup body read failed");
                return None;
            }
        };

        let body: LookupResponse = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(podcast_id = id, error = %e, "iTunes lookup response malformed");
                return None;
            }
        };

        body.results.into_iter().next()
    }
}

impl Default for ApplePodcastsStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiscoveryStrategy for ApplePodcastsStrategy {
    fn name(&self) -> &'static str {
        "apple-podcasts"
    }

    fn priority(&self) -> u32 {
        10
    }

    fn can_handle(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => host == "apple.com" || host.ends_with(".apple.com"),
            None => false,
        }
    }

    async fn discover(
        &self,
        url: &Url,
        ctx: &mut DiscoveryContext<'_>,
    ) -> Result<Vec<DiscoveredFeed>> {
        // No podcast id in the path: defer to the fallback strategy
        let Some(id) = extract_podcast_id(url) else {
            return Ok(Vec::new());
        };

        let Some(result) = self.lookup(&id, ctx).await else {
            return Ok(Vec::new());
        };
        let Some(feed_url) = result.feed_url else {
            tracing::debug!(podcast_id = %id, "iTunes result carries no feed URL");
            return Ok(Vec::new());
        };

        let Some(mut feed) = ctx.validate_feed(&feed_url).await else {
            return Ok(Vec::new());
        };

        // iTunes metadata is higher-fidelity than the raw feed's own fields
        if let Some(name) = result.collection_name.filter(|n| !n.trim().is_empty()) {
            feed.title = name;
        }
        if let Some(desc) = result
            .description
            .or(result.short_description)
            .map(|d| strip_html(&d).trim().to_owned())
            .filter(|d| !d.is_empty())
        {
            feed.description = Some(desc);
        }
        feed.icon_url = result
            .artwork_url_600
            .or(result.artwork_url_100)
            .or(result.artwork_url_60)
            .or(feed.icon_url);

        Ok(vec![feed])
    }
}

/// Extracts the numeric podcast id from a path segment shaped `id<digits>`.
fn extract_podcast_id(url: &Url) -> Option<String> {
    url.path_segments()?.find_map(|segment| {
        let digits = segment.strip_prefix("id")?;
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(digits.to_owned())
        } else {
            None
        }
    })
}
