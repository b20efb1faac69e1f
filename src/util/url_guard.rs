use std::net::{Ipv4Addr, Ipv6Addr};

use thiserror::Error;
use url::{Host, Url};

/// Why a user-supplied URL was refused before any fetch.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(String),
    #[error("Localhost not allowed")]
    Localhost,
}

/// Validates a user-supplied URL before any discovery fetch touches it.
///
/// Discovery fetches whatever the caller hands it, so the input has to be
/// screened against requests into the local network: only `http`/`https`
/// schemes pass, and hosts that name localhost, RFC 1918 ranges, link-local
/// or unique-local addresses, or the unspecified address are refused. The
/// `url` crate's typed [`Host`] carries IP literals pre-parsed (brackets and
/// all), so the range checks work on real addresses rather than host strings.
///
/// # Errors
///
/// Returns [`UrlValidationError`] if the URL cannot be parsed, uses a
/// non-HTTP(S) scheme, or resolves to a localhost or private address.
///
/// # Examples
///
/// ```
/// use feedscout::util::validate_url;
///
/// let url = validate_url("https://example.com/feed.xml").unwrap();
/// assert_eq!(url.host_str(), Some("example.com"));
///
/// assert!(validate_url("http://localhost/feed").is_err());
/// assert!(validate_url("http://192.168.1.1/feed").is_err());
/// assert!(validate_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host() {
        // The url crate lowercases domains during parsing
        Some(Host::Domain(domain)) if domain == "localhost" => {
            return Err(UrlValidationError::Localhost);
        }
        Some(Host::Ipv4(ip)) => screen_ipv4(ip)?,
        Some(Host::Ipv6(ip)) => screen_ipv6(ip)?,
        _ => {}
    }

    Ok(url)
}

fn screen_ipv4(ip: Ipv4Addr) -> Result<(), UrlValidationError> {
    if ip.is_loopback() {
        return Err(UrlValidationError::Localhost);
    }
    if ip.is_private() || ip.is_link_local() || ip.is_unspecified() {
        return Err(UrlValidationError::PrivateIp(ip.to_string()));
    }
    Ok(())
}

fn screen_ipv6(ip: Ipv6Addr) -> Result<(), UrlValidationError> {
    if ip.is_loopback() {
        return Err(UrlValidationError::Localhost);
    }
    let head = ip.segments()[0];
    let unique_local = (head & 0xfe00) == 0xfc00; // fc00::/7
    let link_local = (head & 0xffc0) == 0xfe80; // fe80::/10
    if ip.is_unspecified() || unique_local || link_local {
        return Err(UrlValidationError::PrivateIp(ip.to_string()));
    }
    Ok(())
}
