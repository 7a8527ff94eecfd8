//! URL validation and SSRF protection.
//!
//! Every URL the analyzer is about to touch passes through [`validate_url`]:
//! once when a [`crate::service::SeoService`] is built, and again before every
//! request and every redirect hop. Only literal IP hosts are range-checked here;
//! hostnames that resolve to private addresses are handled by
//! [`crate::safe_resolver::SafeResolver`] at connect time.

use std::net::{Ipv4Addr, Ipv6Addr};
use thiserror::Error;
use url::{Host, Url};

/// Hostname suffixes reserved for local or internal networks.
const BLOCKED_SUFFIXES: &[&str] = &[".local", ".internal", ".localhost"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL '{url}': {reason}")]
    Malformed { url: String, reason: String },

    #[error("Invalid URL scheme '{scheme}': only http and https are allowed")]
    UnsupportedScheme { scheme: String },

    #[error("URL has no host component: {url}")]
    MissingHost { url: String },

    #[error("Access to localhost is not allowed")]
    Localhost,

    #[error("Access to loopback address {host} is not allowed")]
    Loopback { host: String },

    #[error("Access to private IP range {range} is not allowed")]
    PrivateRange { range: &'static str },

    #[error("Access to internal hostname '{host}' is not allowed")]
    InternalHostname { host: String },
}

/// Parses `url_str` and rejects anything that could reach an internal target.
///
/// ```
/// use seo_health::url_validator::validate_url;
///
/// assert!(validate_url("https://example.com").is_ok());
/// assert!(validate_url("http://192.168.1.1").is_err());
/// assert!(validate_url("file:///etc/passwd").is_err());
/// ```
pub fn validate_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str).map_err(|e| UrlValidationError::Malformed {
        url: url_str.to_string(),
        reason: e.to_string(),
    })?;

    check_url(&url)?;
    Ok(url)
}

/// Same checks as [`validate_url`] for an already-parsed URL.
pub fn check_url(url: &Url) -> Result<(), UrlValidationError> {
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(UrlValidationError::UnsupportedScheme {
                scheme: scheme.to_string(),
            });
        }
    }

    match url.host() {
        Some(Host::Domain(domain)) => check_domain(domain),
        Some(Host::Ipv4(ip)) => check_ipv4(ip),
        Some(Host::Ipv6(ip)) => check_ipv6(ip),
        None => Err(UrlValidationError::MissingHost {
            url: url.to_string(),
        }),
    }
}

fn check_domain(domain: &str) -> Result<(), UrlValidationError> {
    let domain = domain.trim_end_matches('.').to_lowercase();

    if domain == "localhost" {
        return Err(UrlValidationError::Localhost);
    }

    // Names like 127.0.0.1.nip.io are not IP literals but still point home
    if domain.starts_with("127.") {
        return Err(UrlValidationError::Loopback { host: domain });
    }

    if BLOCKED_SUFFIXES
        .iter()
        .any(|suffix| domain.ends_with(suffix))
    {
        return Err(UrlValidationError::InternalHostname { host: domain });
    }

    Ok(())
}

pub(crate) fn check_ipv4(ip: Ipv4Addr) -> Result<(), UrlValidationError> {
    let octets = ip.octets();

    if ip.is_unspecified() {
        return Err(UrlValidationError::Localhost);
    }

    if octets[0] == 127 {
        return Err(UrlValidationError::Loopback {
            host: ip.to_string(),
        });
    }

    let range = match (octets[0], octets[1]) {
        (10, _) => Some("10.0.0.0/8"),
        (172, 16..=31) => Some("172.16.0.0/12"),
        (192, 168) => Some("192.168.0.0/16"),
        (169, 254) => Some("169.254.0.0/16"),
        _ => None,
    };

    match range {
        Some(range) => Err(UrlValidationError::PrivateRange { range }),
        None => Ok(()),
    }
}

pub(crate) fn check_ipv6(ip: Ipv6Addr) -> Result<(), UrlValidationError> {
    if ip.is_loopback() {
        return Err(UrlValidationError::Loopback {
            host: format!("[{}]", ip),
        });
    }

    if ip.is_unspecified() {
        return Err(UrlValidationError::Localhost);
    }

    if let Some(v4) = ip.to_ipv4_mapped() {
        return check_ipv4(v4);
    }

    let segments = ip.segments();

    // fc00::/7 (unique local)
    if (segments[0] & 0xfe00) == 0xfc00 {
        return Err(UrlValidationError::PrivateRange { range: "fc00::/7" });
    }

    // fe80::/10 (link-local)
    if (segments[0] & 0xffc0) == 0xfe80 {
        return Err(UrlValidationError::PrivateRange { range: "fe80::/10" });
    }

    Ok(())
}
