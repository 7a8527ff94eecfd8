use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "seo-health")]
#[command(about = "An SSRF-safe website SEO health checker", long_about = None)]
pub struct Cli {
    /// One or more site URLs to analyze (falls back to `urls` in the config file)
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Save report to file (JSON)
    #[arg(short, long)]
    pub save: Option<String>,

    /// Only print the health summary (score, status, critical issues)
    #[arg(long)]
    pub health: bool,

    /// Request timeout in seconds (default: 10)
    #[arg(short, long, default_value_t = 10)]
    pub timeout: u64,

    /// Maximum number of redirects to follow (default: 5)
    #[arg(long, default_value_t = 5)]
    pub max_redirects: usize,

    /// Number of sites analyzed concurrently (default: 4)
    #[arg(short = 'c', long, default_value_t = 4)]
    pub concurrency: usize,

    /// Rate limit for requests per second (optional, e.g., 1.0 for 1 req/s)
    #[arg(short = 'r', long)]
    pub rate_limit: Option<f64>,

    /// Allow hostnames that resolve to private addresses
    #[arg(long)]
    pub allow_private_dns: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,
}
