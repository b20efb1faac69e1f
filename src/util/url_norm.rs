use url::Url;

/// Produces a canonical dedup key for a redirect-resolved URL.
///
/// Two candidate URLs that resolve to the same feed frequently differ only in
/// cosmetic ways: scheme/host case, an explicit default port, a trailing
/// slash, an empty query, or a fragment. Normalizing collapses those variants
/// so the per-request dedup set catches them.
///
/// This key is used **only** for comparison — the original URL a caller
/// supplied is what ends up in discovery results.
///
/// Unparseable input falls back to the trimmed input string, so it still
/// participates in exact-match dedup.
///
/// # Examples
///
/// ```
/// use feedscout::util::normalize_url;
///
/// assert_eq!(
///     normalize_url("HTTPS://Example.COM:443/feed/"),
///     normalize_url("https://example.com/feed"),
/// );
/// assert_eq!(
///     normalize_url("https://example.com/feed?#section"),
///     normalize_url("https://example.com/feed"),
/// );
/// ```
pub fn normalize_url(url_str: &str) -> String {
    let trimmed = url_str.trim();
    let Ok(mut url) = Url::parse(trimmed) else {
        return trimmed.to_owned();
    };

    // The parser already lowercases scheme/host and drops default ports
    url.set_fragment(None);
    if url.query() == Some("") {
        url.set_query(None);
    }

    let mut out = url.to_string();
    // Trailing slash is cosmetic for both the root path and nested paths
    if url.query().is_none() && out.ends_with('/') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_case_and_default_port_collapse() {
        assert_eq!(
            normalize_url("HTTPS://Example.COM:443/feed"),
            "https://example.com/feed"
        );
        assert_eq!(
            normalize_url("http://example.com:80/feed"),
            "http://example.com/feed"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(
            normalize_url("https://example.com/feed/"),
            normalize_url("https://example.com/feed")
        );
        assert_eq!(
            normalize_url("https://example.com/"),
            normalize_url("https://example.com")
        );
    }

    #[test]
    fn test_fragment_and_empty_query_dropped() {
        assert_eq!(
            normalize_url("https://example.com/feed#latest"),
            "https://example.com/feed"
        );
        assert_eq!(
            normalize_url("https://example.com/feed?"),
            "https://example.com/feed"
        );
    }

    #[test]
    fn test_meaningful_query_preserved() {
        assert_eq!(
            normalize_url("https://example.com/feed?format=rss"),
            "https://example.com/feed?format=rss"
        );
    }

    #[test]
    fn test_non_default_port_preserved() {
        assert_eq!(
            normalize_url("https://example.com:8443/feed"),
            "https://example.com:8443/feed"
        );
    }

    #[test]
    fn test_unparseable_input_falls_back_to_trimmed() {
        assert_eq!(normalize_url("  not a url  "), "not a url");
    }
}
