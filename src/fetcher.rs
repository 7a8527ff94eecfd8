//! Page fetching with manual, validated redirect handling.

use crate::http_client::{FetchConfig, build_http_client};
use crate::url_validator::{UrlValidationError, check_url};
use reqwest::{Client, header};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Blocked(#[from] UrlValidationError),

    #[error("Host '{host}' resolves only to private addresses")]
    PrivateAddress { host: String },

    #[error("Stopped after {limit} redirects")]
    TooManyRedirects { limit: usize },

    #[error("Redirect to unusable location '{location}'")]
    InvalidRedirect { location: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),
}

impl FetchError {
    /// Network hiccups that should degrade to an empty page instead of failing the analysis.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Request(_))
    }

    fn from_request(error: reqwest::Error, url: &Url) -> Self {
        if error.is_timeout() {
            return FetchError::Timeout {
                url: url.to_string(),
            };
        }

        if blocked_by_resolver(&error) {
            return FetchError::PrivateAddress {
                host: url.host_str().unwrap_or_default().to_string(),
            };
        }

        FetchError::Request(error)
    }
}

/// Walks the source chain looking for the refusal raised by [`crate::safe_resolver::SafeResolver`].
fn blocked_by_resolver(error: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(error);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>()
            && io.kind() == std::io::ErrorKind::PermissionDenied
        {
            return true;
        }
        source = err.source();
    }
    false
}

/// Retrieves the raw markup of a page.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}

pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    max_redirects: usize,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        Ok(Self::with_client(build_http_client(config)?, config))
    }

    /// Uses a caller-supplied client. It must not follow redirects itself,
    /// otherwise hops would bypass validation.
    pub fn with_client(client: Client, config: &FetchConfig) -> Self {
        Self {
            client,
            timeout: config.timeout,
            max_redirects: config.max_redirects,
        }
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let mut current = url.clone();

        for _ in 0..=self.max_redirects {
            check_url(&current)?;

            let response = self
                .client
                .get(current.clone())
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| FetchError::from_request(e, &current))?;

            let status = response.status();
            if status.is_redirection()
                && let Some(location) = response.headers().get(header::LOCATION)
            {
                let location = String::from_utf8_lossy(location.as_bytes()).into_owned();
                let next = current
                    .join(&location)
                    .map_err(|_| FetchError::InvalidRedirect {
                        location: location.clone(),
                    })?;

                check_url(&next)?;

                tracing::debug!(from = %current, to = %next, status = %status, "Following redirect");
                current = next;
                continue;
            }

            if !status.is_success() {
                tracing::debug!(url = %current, status = %status, "Non-success status, scoring body anyway");
            }

            return response
                .text()
                .await
                .map_err(|e| FetchError::from_request(e, &current));
        }

        Err(FetchError::TooManyRedirects {
            limit: self.max_redirects,
        })
    }
}
