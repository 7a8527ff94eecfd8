use crate::extractor::{ExtractedPage, extract_page};
use crate::models::{
    IssueSeverity, PageMetadata, PageStructure, ScoreBreakdown, SeoIssue, SeoScore,
};
use url::Url;

const META_TAGS: &str = "Meta Tags";
const HEADINGS: &str = "Headings";
const IMAGES: &str = "Images";
const SECURITY: &str = "Security";
const MOBILE: &str = "Mobile";
const PERFORMANCE: &str = "Performance";

/// Issues and recommendations in the order the checks produced them.
#[derive(Debug, Default)]
struct Findings {
    issues: Vec<SeoIssue>,
    recommendations: Vec<String>,
}

impl Findings {
    fn issue(&mut self, issue: SeoIssue) {
        self.issues.push(issue);
    }

    fn recommend(&mut self, recommendation: &str) {
        self.recommendations.push(recommendation.to_string());
    }
}

fn penalize(score: &mut u8, points: u8) {
    *score = score.saturating_sub(points);
}

pub struct SeoAnalyzer;

impl SeoAnalyzer {
    /// Extracts and scores `html` as served from `url`.
    pub fn analyze_html(url: &Url, html: &str) -> SeoScore {
        Self::analyze(url, &extract_page(html))
    }

    pub fn analyze(url: &Url, page: &ExtractedPage) -> SeoScore {
        let mut findings = Findings::default();

        // Order matters: issues and recommendations are reported in check order
        let meta_tags = Self::check_meta_tags(&page.metadata, &mut findings);
        let headings = Self::check_headings(&page.structure, &mut findings);
        let images = Self::check_images(&page.structure, &mut findings);
        let ssl = Self::check_ssl(url, &mut findings);
        let mobile = Self::check_mobile(&page.structure, &mut findings);
        let performance = Self::check_performance(&page.structure, &mut findings);

        let breakdown = ScoreBreakdown {
            meta_tags,
            headings,
            images,
            performance,
            mobile,
            ssl,
        };

        SeoScore {
            overall: breakdown.overall(),
            breakdown,
            issues: findings.issues,
            recommendations: findings.recommendations,
        }
    }

    fn check_meta_tags(metadata: &PageMetadata, findings: &mut Findings) -> u8 {
        let mut score = 100;

        match non_empty(&metadata.title) {
            None => {
                penalize(&mut score, 25);
                findings.issue(
                    SeoIssue::new(IssueSeverity::Critical, META_TAGS, "Page is missing a title tag")
                        .with_element("<title>"),
                );
                findings.recommend("Add a unique, descriptive title tag of 50-60 characters");
            }
            Some(title) => {
                let len = title.chars().count();
                if !(30..=60).contains(&len) {
                    penalize(&mut score, 10);
                    findings.issue(
                        SeoIssue::new(
                            IssueSeverity::Warning,
                            META_TAGS,
                            format!("Title length is {} characters (recommended: 30-60)", len),
                        )
                        .with_element("<title>"),
                    );
                }
            }
        }

        match non_empty(&metadata.description) {
            None => {
                penalize(&mut score, 20);
                findings.issue(
                    SeoIssue::new(
                        IssueSeverity::Critical,
                        META_TAGS,
                        "Page is missing a meta description",
                    )
                    .with_element(r#"<meta name="description">"#),
                );
                findings.recommend(
                    "Add a meta description of 150-160 characters summarizing the page",
                );
            }
            Some(description) => {
                let len = description.chars().count();
                if !(120..=160).contains(&len) {
                    penalize(&mut score, 10);
                    findings.issue(
                        SeoIssue::new(
                            IssueSeverity::Warning,
                            META_TAGS,
                            format!(
                                "Meta description length is {} characters (recommended: 120-160)",
                                len
                            ),
                        )
                        .with_element(r#"<meta name="description">"#),
                    );
                }
            }
        }

        if non_empty(&metadata.og_image).is_none() {
            penalize(&mut score, 15);
            findings.issue(
                SeoIssue::new(IssueSeverity::Warning, META_TAGS, "Missing Open Graph image")
                    .with_element(r#"<meta property="og:image">"#),
            );
            findings.recommend(
                "Add Open Graph tags (og:title, og:description, og:image) for better social sharing",
            );
        }

        if non_empty(&metadata.canonical).is_none() {
            penalize(&mut score, 10);
            findings.issue(
                SeoIssue::new(IssueSeverity::Info, META_TAGS, "Missing canonical URL")
                    .with_element(r#"<link rel="canonical">"#),
            );
        }

        score
    }

    fn check_headings(structure: &PageStructure, findings: &mut Findings) -> u8 {
        let mut score = 100;

        if structure.h1_count == 0 {
            penalize(&mut score, 30);
            findings.issue(
                SeoIssue::new(IssueSeverity::Critical, HEADINGS, "Page is missing an H1 tag")
                    .with_element("<h1>"),
            );
            findings.recommend("Use exactly one H1 tag containing the page's main keyword");
        } else if structure.h1_count > 1 {
            penalize(&mut score, 20);
            findings.issue(
                SeoIssue::new(
                    IssueSeverity::Warning,
                    HEADINGS,
                    format!("Page has multiple H1 tags ({})", structure.h1_count),
                )
                .with_element("<h1>"),
            );
        }

        if structure.h2_count == 0 {
            penalize(&mut score, 10);
            findings.issue(
                SeoIssue::new(IssueSeverity::Info, HEADINGS, "Page has no H2 tags")
                    .with_element("<h2>"),
            );
            findings.recommend("Structure content with a clear H2/H3 heading hierarchy");
        }

        score
    }

    fn check_images(structure: &PageStructure, findings: &mut Findings) -> u8 {
        let mut score = 100;

        if structure.images_missing_alt > 0 {
            penalize(&mut score, 20);
            findings.issue(
                SeoIssue::new(
                    IssueSeverity::Warning,
                    IMAGES,
                    format!("{} image(s) missing alt text", structure.images_missing_alt),
                )
                .with_element("<img>"),
            );
            findings.recommend("Add descriptive alt text to all images");
        }

        score
    }

    fn check_ssl(url: &Url, findings: &mut Findings) -> u8 {
        if url.scheme() == "https" {
            return 100;
        }

        findings.issue(SeoIssue::new(
            IssueSeverity::Critical,
            SECURITY,
            "Website is not using HTTPS",
        ));
        findings.recommend("Enable HTTPS with a valid SSL certificate");
        0
    }

    fn check_mobile(structure: &PageStructure, findings: &mut Findings) -> u8 {
        let mut score = 100;

        // has_responsive_css is informational only and never changes the score
        if !structure.has_viewport {
            penalize(&mut score, 50);
            findings.issue(
                SeoIssue::new(IssueSeverity::Critical, MOBILE, "Missing viewport meta tag")
                    .with_element(r#"<meta name="viewport">"#),
            );
            findings.recommend(
                r#"Add <meta name="viewport" content="width=device-width, initial-scale=1"> for mobile devices"#,
            );
        }

        score
    }

    fn check_performance(structure: &PageStructure, findings: &mut Findings) -> u8 {
        let mut score = 100;

        if structure.inline_scripts > 3 {
            penalize(&mut score, 15);
            findings.issue(
                SeoIssue::new(
                    IssueSeverity::Warning,
                    PERFORMANCE,
                    format!("Too many inline scripts ({})", structure.inline_scripts),
                )
                .with_element("<script>"),
            );
            findings.recommend("Move inline scripts into external files");
        }

        if structure.style_blocks > 2 {
            penalize(&mut score, 10);
            findings.issue(
                SeoIssue::new(
                    IssueSeverity::Info,
                    PERFORMANCE,
                    format!("Too many <style> blocks ({})", structure.style_blocks),
                )
                .with_element("<style>"),
            );
        }

        if structure.external_scripts > 0 && structure.async_or_deferred_scripts == 0 {
            penalize(&mut score, 20);
            findings.issue(
                SeoIssue::new(
                    IssueSeverity::Warning,
                    PERFORMANCE,
                    "External scripts block rendering (no async or defer)",
                )
                .with_element("<script src>"),
            );
            findings.recommend("Load external scripts with async or defer");
        }

        score
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
