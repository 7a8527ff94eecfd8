use crate::safe_resolver::SafeResolver;
use anyhow::Result;
use reqwest::{Client, ClientBuilder, header};
use std::sync::Arc;
use std::time::Duration;

/// User agent sent with every page fetch
pub const USER_AGENT: &str = "SEO-Health-Checker/1.0 (+https://github.com/nelsonlaidev/seo-health)";
const ACCEPT: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Per-request settings for page fetching
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Reject hostnames that resolve to private addresses
    pub block_private_dns: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 5,
            user_agent: USER_AGENT.to_string(),
            block_private_dns: true,
        }
    }
}

/// Creates a reqwest client that never follows redirects on its own.
///
/// Redirects are chased by [`crate::fetcher::HttpFetcher`] so every hop can be
/// validated before it is requested.
pub fn build_http_client(config: &FetchConfig) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static(ACCEPT_LANGUAGE),
    );

    let mut builder = ClientBuilder::new()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.timeout)
        .redirect(reqwest::redirect::Policy::none())
        .gzip(true)
        .brotli(true)
        .deflate(true);

    if config.block_private_dns {
        builder = builder.dns_resolver(Arc::new(SafeResolver));
    }

    Ok(builder.build()?)
}
