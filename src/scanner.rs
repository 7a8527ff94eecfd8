use crate::fetcher::HttpFetcher;
use crate::http_client::{FetchConfig, build_http_client};
use crate::models::{HealthCheck, SiteReport};
use crate::service::SeoService;
use anyhow::{Result, bail};
use futures::stream::{self, StreamExt};
use governor::{
    Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::num::NonZeroU32;

/// Configuration for a multi-site scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub fetch: FetchConfig,
    pub concurrency: usize,
    pub requests_per_second: Option<f64>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            concurrency: 4,
            requests_per_second: None,
        }
    }
}

/// Analyzes several sites, each with its own independent [`SeoService`].
pub struct Scanner {
    client: reqwest::Client,
    config: ScanConfig,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    progress_bar: Option<ProgressBar>,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Result<Self> {
        Self::with_client(build_http_client(&config.fetch)?, config)
    }

    /// Shares `client` across all sites. It must have redirects disabled.
    pub fn with_client(client: reqwest::Client, config: ScanConfig) -> Result<Self> {
        if config.concurrency == 0 {
            bail!("Concurrency must be at least 1");
        }

        let rate_limiter = match config.requests_per_second {
            Some(rps) if !rps.is_finite() || rps <= 0.0 => {
                bail!("Rate limit must be a positive number, got {}", rps);
            }
            Some(rps) => {
                let per_second = NonZeroU32::new(rps.ceil() as u32).unwrap_or(NonZeroU32::MIN);
                Some(RateLimiter::direct(Quota::per_second(per_second)))
            }
            None => None,
        };

        Ok(Self {
            client,
            config,
            rate_limiter,
            progress_bar: None,
        })
    }

    /// Enable progress bar for scanning
    pub fn enable_progress_bar(&mut self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} sites")
                .expect("Progress bar template should be valid"),
        );
        self.progress_bar = Some(pb);
    }

    /// Returns one report per input URL, in input order.
    pub async fn scan(&self, urls: &[String]) -> Vec<SiteReport> {
        let reports = stream::iter(urls)
            .map(|url| self.scan_site(url))
            .buffered(self.config.concurrency)
            .collect::<Vec<_>>()
            .await;

        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(format!("Analyzed {} sites", reports.len()));
        }

        reports
    }

    async fn scan_site(&self, url: &str) -> SiteReport {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let fetcher = HttpFetcher::with_client(self.client.clone(), &self.config.fetch);
        let report = match SeoService::new(url, fetcher) {
            Ok(service) => match service.analyze_page().await {
                Ok(page) => SiteReport {
                    url: url.to_string(),
                    metadata: Some(page.metadata),
                    structure: Some(page.structure),
                    health: Some(HealthCheck::from(&page.score)),
                    score: Some(page.score),
                    error: None,
                },
                Err(e) => Self::failed(url, e.to_string()),
            },
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Rejected URL");
                Self::failed(url, e.to_string())
            }
        };

        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }

        report
    }

    fn failed(url: &str, error: String) -> SiteReport {
        SiteReport {
            url: url.to_string(),
            metadata: None,
            structure: None,
            score: None,
            health: None,
            error: Some(error),
        }
    }
}
