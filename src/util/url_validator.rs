use std::net::IpAddr;
use thiserror::Error;
use url::{Host, Url};

/// Why a link may not be probed.
///
/// Post text is untrusted, so a probe must never be steered at the local
/// machine or an internal network (SSRF).
#[derive(Error, Debug)]
pub enum UrlValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(IpAddr),
    #[error("Localhost not allowed")]
    Localhost,
    #[error("URL has no host")]
    MissingHost,
}

/// Parses `url_str` and checks that it is safe to probe.
///
/// Only `http`/`https` URLs with a host are accepted. Hosts that are
/// `localhost`, a loopback address, or a private, link-local, unique-local or
/// unspecified address are rejected. Domain names are not resolved here; see
/// [`is_public_ip`] for checking looked-up addresses.
///
/// # Examples
///
/// ```
/// use tweetfeed::util::validate_url;
///
/// let url = validate_url("https://bit.ly/abc").unwrap();
/// assert_eq!(url.host_str(), Some("bit.ly"));
///
/// assert!(validate_url("http://localhost/admin").is_err());
/// assert!(validate_url("http://192.168.1.1/").is_err());
/// assert!(validate_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlValidationError::UnsupportedScheme(url.scheme().to_owned()));
    }

    let ip = match url.host().ok_or(UrlValidationError::MissingHost)? {
        Host::Domain(domain) if domain.eq_ignore_ascii_case("localhost") => {
            return Err(UrlValidationError::Localhost)
        }
        Host::Domain(_) => return Ok(url),
        Host::Ipv4(v4) => IpAddr::V4(v4),
        Host::Ipv6(v6) => IpAddr::V6(v6),
    };

    if ip.is_loopback() {
        Err(UrlValidationError::Localhost)
    } else if is_internal(ip) {
        Err(UrlValidationError::PrivateIp(ip))
    } else {
        Ok(url)
    }
}

/// True when `ip` may be probed: neither loopback nor any internal range
/// that [`validate_url`] rejects.
pub fn is_public_ip(ip: IpAddr) -> bool {
    !ip.is_loopback() && !is_internal(ip)
}

fn is_internal(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_link_local() || v4.is_unspecified(),
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return mapped.is_loopback() || is_internal(IpAddr::V4(mapped));
            }
            let first = v6.segments()[0];
            // fc00::/7 unique local, fe80::/10 link local
            v6.is_unspecified() || (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
        }
    }
}

/// Returns the normalized host component of a URL, if it has one.
///
/// Normalization is whatever the `url` crate applies while parsing:
/// lowercasing, IDNA to punycode, IPv4 canonicalization.
pub fn host_of(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
}

/// Normalizes a bare hostname the same way [`host_of`] normalizes URL hosts.
///
/// Falls back to a trimmed, lowercased copy when the host cannot be parsed
/// on its own (it will then simply never match a parsed URL host).
pub fn normalize_host(host: &str) -> String {
    let trimmed = host.trim();
    Url::parse(&format!("http://{trimmed}/"))
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .unwrap_or_else(|| trimmed.to_lowercase())
}
