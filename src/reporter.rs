use crate::models::{HealthStatus, IssueSeverity, ScanReport, ScanSummary, SiteReport};
use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::Write;

pub struct Reporter;

impl Reporter {
    pub fn generate_report(sites: Vec<SiteReport>) -> ScanReport {
        let summary = Self::calculate_summary(&sites);
        let timestamp = chrono::Utc::now().to_rfc3339();

        ScanReport {
            sites,
            summary,
            timestamp,
        }
    }

    fn calculate_summary(sites: &[SiteReport]) -> ScanSummary {
        let mut summary = ScanSummary {
            total_sites: sites.len(),
            ..Default::default()
        };
        let mut score_total = 0u32;
        let mut scored = 0u32;

        for site in sites {
            let Some(score) = &site.score else {
                summary.failed_sites += 1;
                continue;
            };

            score_total += u32::from(score.overall);
            scored += 1;

            for issue in &score.issues {
                match issue.severity {
                    IssueSeverity::Critical => summary.critical += 1,
                    IssueSeverity::Warning => summary.warnings += 1,
                    IssueSeverity::Info => summary.infos += 1,
                }
            }
        }

        if scored > 0 {
            summary.average_score = Some((f64::from(score_total) / f64::from(scored)).round() as u8);
        }

        summary
    }

    pub fn print_text_report(report: &ScanReport, health_only: bool) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "SEO Health Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!(
            "{}: {}",
            "Timestamp".bright_white().bold(),
            report.timestamp
        );
        println!(
            "{}: {}",
            "Sites".bright_white().bold(),
            report.summary.total_sites
        );
        if let Some(average) = report.summary.average_score {
            println!(
                "{}: {}",
                "Average score".bright_white().bold(),
                Self::colorize_score(average)
            );
        }

        for site in &report.sites {
            println!();
            println!("{} {}", "URL:".bright_white().bold(), site.url);

            if let Some(error) = &site.error {
                println!("  {} {}", "Error:".bright_red().bold(), error);
                continue;
            }

            if let Some(health) = &site.health {
                println!(
                    "  Score:  {} ({})",
                    Self::colorize_score(health.score),
                    Self::colorize_status(health.status)
                );
                println!(
                    "  Critical issues: {}",
                    if health.critical_issues > 0 {
                        health.critical_issues.to_string().bright_red()
                    } else {
                        health.critical_issues.to_string().bright_green()
                    }
                );
            }

            if health_only {
                continue;
            }

            if let Some(metadata) = &site.metadata {
                if let Some(title) = &metadata.title {
                    println!("  Title:  {}", title.bright_white());
                }
                if let Some(lang) = &metadata.lang {
                    println!("  Lang:   {}", lang);
                }
            }

            if let Some(structure) = &site.structure {
                println!(
                    "  Responsive CSS: {}",
                    if structure.has_responsive_css {
                        "yes".bright_green()
                    } else {
                        "not detected".dimmed()
                    }
                );
            }

            let Some(score) = &site.score else {
                continue;
            };

            println!("  {}", "Breakdown".bright_yellow().bold().underline());
            let breakdown = &score.breakdown;
            for (label, value) in [
                ("Meta tags", breakdown.meta_tags),
                ("Headings", breakdown.headings),
                ("Images", breakdown.images),
                ("SSL", breakdown.ssl),
                ("Mobile", breakdown.mobile),
                ("Performance", breakdown.performance),
            ] {
                println!("    {:<12} {}", label, Self::colorize_score(value));
            }

            if !score.issues.is_empty() {
                println!("  {}", "Issues".bright_yellow().bold().underline());
                for issue in &score.issues {
                    let severity_str = match issue.severity {
                        IssueSeverity::Critical => "CRIT ".bright_red(),
                        IssueSeverity::Warning => "WARN ".yellow(),
                        IssueSeverity::Info => "INFO ".bright_cyan(),
                    };
                    println!(
                        "    [{}] {}: {}",
                        severity_str, issue.category, issue.message
                    );
                }
            }

            if !score.recommendations.is_empty() {
                println!("  {}", "Recommendations".bright_yellow().bold().underline());
                for recommendation in &score.recommendations {
                    println!("    - {}", recommendation);
                }
            }
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    fn colorize_score(score: u8) -> ColoredString {
        score
            .to_string()
            .color(Self::status_color(HealthStatus::from_score(score)))
    }

    fn colorize_status(status: HealthStatus) -> ColoredString {
        status.as_str().color(Self::status_color(status))
    }

    fn status_color(status: HealthStatus) -> Color {
        match status {
            HealthStatus::Excellent => Color::BrightGreen,
            HealthStatus::Good => Color::Green,
            HealthStatus::Fair => Color::Yellow,
            HealthStatus::Poor => Color::BrightRed,
        }
    }

    pub fn save_json_report(report: &ScanReport, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}
