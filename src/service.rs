//! Fetch → extract → score pipeline for a single site.

use crate::extractor::extract_page;
use crate::fetcher::{FetchError, HttpFetcher, PageFetcher};
use crate::http_client::FetchConfig;
use crate::models::{HealthCheck, PageAnalysis, SeoScore};
use crate::seo_analyzer::SeoAnalyzer;
use crate::url_validator::{UrlValidationError, check_url, validate_url};
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// The only error callers of [`SeoService`] ever see. Details go to the
/// [`ErrorReporter`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to analyze SEO. Please check the website URL is accessible.")]
pub struct AnalysisError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub operation: &'static str,
    pub url: String,
}

/// Sink for errors that are swallowed or replaced before reaching the caller.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &(dyn StdError + 'static), context: &ErrorContext);
}

/// Reports errors as structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &(dyn StdError + 'static), context: &ErrorContext) {
        tracing::error!(
            context = context.operation,
            url = %context.url,
            error = %error_chain(error),
            "SEO analysis error"
        );
    }
}

/// Renders an error and its sources as `outer: inner: root`.
pub fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(err) = source {
        message.push_str(": ");
        message.push_str(&err.to_string());
        source = err.source();
    }
    message
}

pub struct SeoService<F = HttpFetcher> {
    site_url: Url,
    fetcher: F,
    reporter: Arc<dyn ErrorReporter>,
}

impl SeoService<HttpFetcher> {
    /// Builds a service backed by a real HTTP client.
    pub fn from_config(site_url: &str, config: &FetchConfig) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::new(site_url, fetcher)?)
    }
}

impl<F: PageFetcher> SeoService<F> {
    /// Fails fast if `site_url` is not a safe public http(s) URL.
    pub fn new(site_url: &str, fetcher: F) -> Result<Self, UrlValidationError> {
        Ok(Self {
            site_url: validate_url(site_url)?,
            fetcher,
            reporter: Arc::new(TracingReporter),
        })
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn site_url(&self) -> &Url {
        &self.site_url
    }

    /// Runs one full fetch-and-score cycle.
    pub async fn analyze(&self) -> Result<SeoScore, AnalysisError> {
        Ok(self.analyze_page().await?.score)
    }

    /// Like [`Self::analyze`], but also returns the extracted metadata and structure.
    pub async fn analyze_page(&self) -> Result<PageAnalysis, AnalysisError> {
        self.run().await.map_err(|e| {
            self.report(&e, "analyzeSEO");
            AnalysisError
        })
    }

    /// Runs [`Self::analyze`] and reduces the result to a status label.
    pub async fn health_check(&self) -> Result<HealthCheck, AnalysisError> {
        let score = self.analyze().await?;
        Ok(HealthCheck::from(&score))
    }

    async fn run(&self) -> Result<PageAnalysis, FetchError> {
        let html = self.fetch_page().await?;
        let page = extract_page(&html);
        let score = SeoAnalyzer::analyze(&self.site_url, &page);

        Ok(PageAnalysis {
            metadata: page.metadata,
            structure: page.structure,
            score,
        })
    }

    /// Transient failures degrade to an empty document so the site still gets a score.
    async fn fetch_page(&self) -> Result<String, FetchError> {
        check_url(&self.site_url)?;

        match self.fetcher.fetch(&self.site_url).await {
            Ok(html) => Ok(html),
            Err(e) if e.is_transient() => {
                tracing::warn!(url = %self.site_url, error = %e, "Fetch failed, scoring empty page");
                self.report(&e, "fetchPage");
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }

    fn report(&self, error: &FetchError, operation: &'static str) {
        let context = ErrorContext {
            operation,
            url: self.site_url.to_string(),
        };
        self.reporter.report(error, &context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_includes_sources() {
        #[derive(Debug, Error)]
        #[error("outer")]
        struct Outer(#[source] std::io::Error);

        let err = Outer(std::io::Error::other("inner"));
        assert_eq!(error_chain(&err), "outer: inner");
    }

    #[test]
    fn test_generic_error_message() {
        assert_eq!(
            AnalysisError.to_string(),
            "Failed to analyze SEO. Please check the website URL is accessible."
        );
    }

    #[test]
    fn test_construction_validates_url() {
        let config = FetchConfig::default();
        assert!(SeoService::from_config("https://example.com", &config).is_ok());
        assert!(SeoService::from_config("http://localhost:8080", &config).is_err());
        assert!(SeoService::from_config("example.com", &config).is_err());
    }
}
