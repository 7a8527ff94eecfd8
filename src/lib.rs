pub mod cli;
pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod http_client;
pub mod models;
pub mod reporter;
pub mod safe_resolver;
pub mod scanner;
pub mod seo_analyzer;
pub mod service;
pub mod url_validator;

use anyhow::{Result, bail};
use cli::Cli;
use colored::*;
use config::Config;
use http_client::FetchConfig;
use reporter::Reporter;
use scanner::{ScanConfig, Scanner};
use std::path::Path;
use std::time::Duration;

pub async fn run(args: Cli) -> Result<()> {
    // Config file values fill in whatever the command line left at its default
    let file_config = match &args.config {
        Some(path) => Some(Config::from_file(Path::new(path))?),
        None => Config::from_default_paths()?,
    };
    let args = match file_config {
        Some(config) => config.merge_with_cli(&args),
        None => args,
    };

    if args.urls.is_empty() {
        bail!("No URL given. Pass one or more URLs or set `urls` in the config file");
    }

    if args.output != "text" && args.output != "json" {
        bail!("Unsupported output format '{}': use text or json", args.output);
    }

    let text_output = args.output == "text";

    if text_output {
        println!(
            "{}",
            "SEO Health - Website SEO Analyzer".bright_cyan().bold()
        );
        println!("{}", "=".repeat(50).bright_blue());
        println!();
        println!(
            "{} {}",
            "Analyzing:".bright_white().bold(),
            args.urls.join(", ")
        );
        println!();
    }

    let scan_config = ScanConfig {
        fetch: FetchConfig {
            timeout: Duration::from_secs(args.timeout),
            max_redirects: args.max_redirects,
            block_private_dns: !args.allow_private_dns,
            ..Default::default()
        },
        concurrency: args.concurrency,
        requests_per_second: args.rate_limit,
    };

    let mut scanner = Scanner::new(scan_config)?;
    if text_output && args.urls.len() > 1 {
        scanner.enable_progress_bar(args.urls.len());
    }

    tracing::debug!(sites = args.urls.len(), "Starting analysis");
    let sites = scanner.scan(&args.urls).await;
    let report = Reporter::generate_report(sites);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        _ => {
            Reporter::print_text_report(&report, args.health);
        }
    }

    if let Some(filename) = args.save {
        Reporter::save_json_report(&report, &filename)?;
    }

    Ok(())
}
