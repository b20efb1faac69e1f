//! Generic website discovery — the fallback strategy.
//!
//! Handles any URL: first tries the URL itself as a feed (many "website"
//! inputs are already feed URLs), then scans the page's HTML for
//! `<link rel="alternate">` feed references, then probes common feed path
//! conventions.

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

use super::context::DiscoveryContext;
use super::strategy::DiscoveryStrategy;
use super::types::DiscoveredFeed;
use crate::util::validate_url;

/// Paths worth probing when a page exposes no feed `<link>` tags.
const COMMON_FEED_PATHS: [&str; 6] = [
    "/feed",
    "/rss",
    "/atom.xml",
    "/feed.xml",
    "/rss.xml",
    "/index.xml",
];

/// Fallback discovery over arbitrary websites. Runs last.
pub struct StandardStrategy;

impl StandardStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StandardStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiscoveryStrategy for StandardStrategy {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn priority(&self) -> u32 {
        100
    }

    fn can_handle(&self, _url: &Url) -> bool {
        true
    }

    async fn discover(
        &self,
        url: &Url,
        ctx: &mut DiscoveryContext<'_>,
    ) -> Result<Vec<DiscoveredFeed>> {
        // One fetch serves both outcomes: the input may already be a feed
        // URL (validate its body directly), otherwise the same body is the
        // HTML page to scan for alternate links.
        let Some(page) = ctx.fetch_candidate(url.as_str()).await else {
            return Ok(Vec::new());
        };
        if let Some(feed) = ctx.validate_feed_bytes(url.as_str(), &page.final_url, &page.bytes) {
            return Ok(vec![feed]);
        }

        let html = String::from_utf8_lossy(&page.bytes);
        let mut candidates =
            find_feed_links_in_html(&html, url, ctx.config().max_link_candidates);
        if candidates.is_empty() {
            candidates = common_path_candidates(url);
        }

        let mut feeds = Vec::new();
        for candidate in candidates {
            // Links on the page are as untrusted as the page itself
            if !ctx.config().allow_private_networks && validate_url(&candidate).is_err() {
                tracing::debug!(url = %candidate, "discovered link rejected by URL validation");
                continue;
            }
            if let Some(feed) = ctx.validate_feed(&candidate).await {
                feeds.push(feed);
            }
        }

        Ok(feeds)
    }
}

/// Scans HTML for `<link rel="alternate">` tags with feed MIME types and
/// resolves each href against the base URL.
///
/// Uses simple string scanning (no HTML parser dependency). Handles attribute
/// ordering variations and both quote styles. Collects up to `max` distinct
/// candidates in document order.
fn find_feed_links_in_html(html: &str, base_url: &Url, max: usize) -> Vec<String> {
    // ASCII-only lowering: tag and attribute names are ASCII, and Unicode
    // lowercasing can change byte lengths, which would misalign the offsets
    // used to slice the original `html` below.
    let html_lower = html.to_ascii_lowercase();
    let mut candidates: Vec<String> = Vec::new();
    let mut search_from = 0;

    while candidates.len() < max {
        let Some(link_start) = html_lower[search_from..].find("<link") else {
            break;
        };
        let abs_start = search_from + link_start;
        let remaining = &html_lower[abs_start..];

        // Find the end of this <link> tag
        let Some(tag_end) = remaining.find('>') else {
            break;
        };
        let tag = &remaining[..=tag_end];

        if contains_attr(tag, "rel", "alternate") && is_feed_type(tag) {
            // Extract href from the original (non-lowered) HTML to preserve URL case
            let original_tag = &html[abs_start..abs_start + tag_end + 1];
            if let Some(href) = extract_attr_value(original_tag, "href") {
                let resolved = resolve_url(href, base_url);
                if !candidates.contains(&resolved) {
                    candidates.push(resolved);
                }
            }
        }

        search_from = abs_start + tag_end + 1;
    }

    candidates
}

/// Conventional feed paths resolved against the site root.
fn common_path_candidates(base_url: &Url) -> Vec<String> {
    COMMON_FEED_PATHS
        .iter()
        .filter_map(|path| base_url.join(path).ok())
        .map(|u| u.to_string())
        .collect()
}

/// Checks if a lowercased tag contains an attribute with the given value.
fn contains_attr(tag: &str, attr_name: &str, attr_value: &str) -> bool {
    let pattern_double = format!("{attr_name}=\"{attr_value}\"");
    let pattern_single = format!("{attr_name}='{attr_value}'");
    tag.contains(&pattern_double) || tag.contains(&pattern_single)
}

/// Checks if a lowercased `<link>` tag declares a syndication MIME type.
fn is_feed_type(tag: &str) -> bool {
    tag.contains("application/rss+xml")
        || tag.contains("application/atom+xml")
        || tag.contains("application/feed+json")
        || tag.contains("application/json")
}

/// Extracts the value of an attribute from a tag string (case-preserving).
fn extract_attr_value<'a>(tag: &'a str, attr_name: &str) -> Option<&'a str> {
    // ASCII-only for the same offset-alignment reason as the tag scan
    let tag_lower = tag.to_ascii_lowercase();
    let attr_prefix = format!("{attr_name}=");

    let attr_start = tag_lower.find(&attr_prefix)?;
    let value_start = attr_start + attr_prefix.len();

    if value_start >= tag.len() {
        return None;
    }

    let rest = &tag[value_start..];
    let quote = rest.as_bytes().first()?;

    if *quote != b'"' && *quote != b'\'' {
        return None;
    }

    let quote_char = *quote as char;
    let inner = &rest[1..];
    let end = inner.find(quote_char)?;

    Some(&inner[..end])
}

/// Resolves a potentially relative URL against the page URL.
fn resolve_url(href: &str, base_url: &Url) -> String {
    // Already absolute
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_owned();
    }

    // Protocol-relative — run through the URL parser to normalize
    if let Some(rest) = href.strip_prefix("//") {
        let with_scheme = format!("https://{rest}");
        if let Ok(parsed) = Url::parse(&with_scheme) {
            return parsed.to_string();
        }
    }

    // Relative URL: resolve against base
    if let Ok(resolved) = base_url.join(href) {
        return resolved.to_string();
    }

    // Fallback: return as-is
    href.to_owned()
}
