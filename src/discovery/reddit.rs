//! Reddit community discovery.
//!
//! Every subreddit exposes a syndication feed at a deterministic path, so no
//! lookup API is needed — the strategy derives `/r/<subreddit>/.rss` from the
//! input path and validates it. The community's public `about.json` endpoint
//! supplies an icon when available.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use url::Url;

use super::context::DiscoveryContext;
use super::strategy::DiscoveryStrategy;
use super::types::DiscoveredFeed;
use super::validator::read_limited_body;

const REDDIT_BASE: &str = "https://www.reddit.com";

/// Resolves `reddit.com/r/<subreddit>` URLs to the community's feed.
pub struct RedditStrategy {
    base: String,
}

#[derive(Debug, Deserialize)]
struct AboutResponse {
    #[serde(default)]
    data: AboutData,
}

#[derive(Debug, Default, Deserialize)]
struct AboutData {
    #[serde(default)]
    community_icon: String,
    #[serde(default)]
    icon_img: String,
}

impl RedditStrategy {
    pub fn new() -> Self {
        Self {
            base: REDDIT_BASE.to_owned(),
        }
    }

    /// Overrides the Reddit origin (tests, proxied deployments).
    pub fn with_base(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Fetches the community icon from the subreddit's about endpoint.
    ///
    /// Icon enrichment is best-effort: any failure leaves the feed without
    /// an icon rather than failing discovery.
    async fn fetch_icon(&self, subreddit: &str, ctx: &DiscoveryContext<'_>) -> Option<String> {
        let about_url = format!("{}/r/{}/about.json", self.base, subreddit);
        let request = ctx
            .client()
            .get(&about_url)
            .header(header::USER_AGENT, ctx.config().user_agent.as_str())
            .send();

        let response = match tokio::time::timeout(ctx.config().request_timeout(), request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::debug!(subreddit = subreddit, error = %e, "subreddit about fetch failed");
                return None;
            }
            Err(_) => {
                tracing::debug!(subreddit = subreddit, "subreddit about fetch timed out");
                return None;
            }
        };

        if !response.status().is_success() {
            return None;
        }

        let bytes = read_limited_body(response, ctx.config().max_body_bytes)
            .await
            .ok()?;
        let about: AboutResponse = serde_json::from_slice(&bytes).ok()?;

        let icon = if !about.data.community_icon.is_empty() {
            about.data.community_icon
        } else {
            about.data.icon_img
        };
        if icon.is_empty() {
            return None;
        }
        // Icon URLs arrive HTML-entity-escaped in the JSON payload
        Some(icon.replace("&amp;", "&"))
    }
}

impl Default for RedditStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiscoveryStrategy for RedditStrategy {
    fn name(&self) -> &'static str {
        "reddit"
    }

    fn priority(&self) -> u32 {
        20
    }

    fn can_handle(&self, url: &Url) -> bool {
        let is_reddit = match url.host_str() {
            Some(host) => host == "reddit.com" || host.ends_with(".reddit.com"),
            None => false,
        };
        is_reddit && extract_subreddit(url).is_some()
    }

    async fn discover(
        &self,
        url: &Url,
        ctx: &mut DiscoveryContext<'_>,
    ) -> Result<Vec<DiscoveredFeed>> {
        let Some(subreddit) = extract_subreddit(url) else {
            return Ok(Vec::new());
        };

        let feed_url = format!("{}/r/{}/.rss", self.base, subreddit);
        let Some(mut feed) = ctx.validate_feed(&feed_url).await else {
            return Ok(Vec::new());
        };

        if let Some(icon) = self.fetch_icon(&subreddit, ctx).await {
            feed.icon_url = Some(icon);
        }

        Ok(vec![feed])
    }
}

/// Extracts the subreddit name from a `/r/<subreddit>` path.
fn extract_subreddit(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    loop {
        match segments.next() {
            Some("r") => break,
            Some(_) => continue,
            None => return None,
        }
    }
    let name = segments.next()?;
    if !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
    {
        Some(name.to_owned())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscoveryConfig;
    use crate::discovery::types::FeedType;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parse(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    // --- URL shape handling (no network) ---

    #[test]
    fn test_can_handle_reddit_community_urls() {
        let strategy = RedditStrategy::new();
        assert!(strategy.can_handle(&parse("https://www.reddit.com/r/programming")));
        assert!(strategy.can_handle(&parse("https://old.reddit.com/r/rust/")));
        assert!(strategy.can_handle(&parse("https://reddit.com/r/rust/top")));
    }

    #[test]
    fn test_can_handle_rejects_non_community_urls() {
        let strategy = RedditStrategy::new();
        assert!(!strategy.can_handle(&parse("https://www.reddit.com/user/someone")));
        assert!(!strategy.can_handle(&parse("https://www.reddit.com/")));
        assert!(!strategy.can_handle(&parse("https://example.com/r/rust")));
        assert!(!strategy.can_handle(&parse("https://notreddit.com/r/rust")));
    }

    #[test]
    fn test_extract_subreddit() {
        assert_eq!(
            extract_subreddit(&parse("https://old.reddit.com/r/programming")),
            Some("programming".to_owned())
        );
        assert_eq!(
            extract_subreddit(&parse("https://www.reddit.com/r/rust/comments/abc/post")),
            Some("rust".to_owned())
        );
        assert_eq!(
            extract_subreddit(&parse("https://www.reddit.com/user/r")),
            None
        );
        // Invalid characters in the name
        assert_eq!(
            extract_subreddit(&parse("https://www.reddit.com/r/bad%20name")),
            None
        );
    }

    // --- Discovery flow with wiremock ---

    const SUBREDDIT_ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>/r/programming/.rss</id>
  <title>programming</title>
  <entry>
    <id>t3_abc</id>
    <title>A post</title>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    fn test_config() -> DiscoveryConfig {
        DiscoveryConfig {
            allow_private_networks: true,
            ..DiscoveryConfig::default()
        }
    }

    #[tokio::test]
    async fn test_discovers_subreddit_feed_with_icon() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/r/programming/.rss"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(SUBREDDIT_ATOM)
                    .insert_header("Content-Type", "application/atom+xml"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/r/programming/about.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {
                    "community_icon": "https://styles.example.com/icon.png?width=256&amp;s=sig",
                    "icon_img": ""
                }
            })))
            .mount(&server)
            .await;

        let strategy = RedditStrategy::with_base(server.uri());
        let client = reqwest::Client::new();
        let config = test_config();
        let mut ctx = DiscoveryContext::new(&client, &config);

        let url = parse("https://old.reddit.com/r/programming");
        let feeds = strategy.discover(&url, &mut ctx).await.unwrap();

        assert_eq!(feeds.len(), 1);
        let feed = &feeds[0];
        assert_eq!(feed.url, format!("{}/r/programming/.rss", server.uri()));
        assert_eq!(feed.title, "programming");
        assert_eq!(feed.feed_type, FeedType::Atom);
        // Entity-escaped ampersand is decoded
        assert_eq!(
            feed.icon_url.as_deref(),
            Some("https://styles.example.com/icon.png?width=256&s=sig")
        );
    }

    #[tokio::test]
    async fn test_missing_about_endpoint_still_discovers_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/r/rust/.rss"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(SUBREDDIT_ATOM)
                    .insert_header("Content-Type", "application/atom+xml"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/r/rust/about.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let strategy = RedditStrategy::with_base(server.uri());
        let client = reqwest::Client::new();
        let config = test_config();
        let mut ctx = DiscoveryContext::new(&client, &config);

        let url = parse("https://www.reddit.com/r/rust");
        let feeds = strategy.discover(&url, &mut ctx).await.unwrap();

        assert_eq!(feeds.len(), 1);
        assert!(feeds[0].icon_url.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_soft_miss() {
        let strategy = RedditStrategy::with_base("http://127.0.0.1:9");
        let client = reqwest::Client::new();
        let config = test_config();
        let mut ctx = DiscoveryContext::new(&client, &config);

        let url = parse("https://www.reddit.com/r/rust");
        let feeds = strategy.discover(&url, &mut ctx).await.unwrap();
        assert!(feeds.is_empty());
    }
}
