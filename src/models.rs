use serde::{Deserialize, Serialize};

/// Facts pulled out of a single HTML document. Every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub og_image: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub canonical: Option<String>,
    pub robots: Option<String>,
    pub lang: Option<String>,
}

/// Structural counts the scorers work from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStructure {
    pub h1_count: usize,
    pub h2_count: usize,
    pub image_count: usize,
    pub images_missing_alt: usize,
    pub inline_scripts: usize,
    pub external_scripts: usize,
    pub async_or_deferred_scripts: usize,
    pub style_blocks: usize,
    pub has_viewport: bool,
    /// `@media` or `responsive` appears somewhere in the markup.
    /// Reported, but not part of the mobile score.
    pub has_responsive_css: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoIssue {
    pub severity: IssueSeverity,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
}

impl SeoIssue {
    pub fn new(severity: IssueSeverity, category: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            category: category.to_string(),
            message: message.into(),
            element: None,
        }
    }

    pub fn with_element(mut self, element: &str) -> Self {
        self.element = Some(element.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub meta_tags: u8,
    pub headings: u8,
    pub images: u8,
    pub performance: u8,
    pub mobile: u8,
    pub ssl: u8,
}

impl ScoreBreakdown {
    /// Unweighted mean of the six categories, rounded half up.
    pub fn overall(&self) -> u8 {
        let total = u32::from(self.meta_tags)
            + u32::from(self.headings)
            + u32::from(self.images)
            + u32::from(self.performance)
            + u32::from(self.mobile)
            + u32::from(self.ssl);

        (f64::from(total) / 6.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoScore {
    pub overall: u8,
    pub breakdown: ScoreBreakdown,
    pub issues: Vec<SeoIssue>,
    pub recommendations: Vec<String>,
}

impl SeoScore {
    pub fn critical_issues(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Critical)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => HealthStatus::Excellent,
            75..=89 => HealthStatus::Good,
            60..=74 => HealthStatus::Fair,
            _ => HealthStatus::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Excellent => "excellent",
            HealthStatus::Good => "good",
            HealthStatus::Fair => "fair",
            HealthStatus::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub score: u8,
    pub status: HealthStatus,
    pub critical_issues: usize,
}

impl From<&SeoScore> for HealthCheck {
    fn from(score: &SeoScore) -> Self {
        Self {
            score: score.overall,
            status: HealthStatus::from_score(score.overall),
            critical_issues: score.critical_issues(),
        }
    }
}

/// A score together with the facts it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysis {
    pub metadata: PageMetadata,
    pub structure: PageStructure,
    pub score: SeoScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteReport {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<PageStructure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<SeoScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<HealthCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub sites: Vec<SiteReport>,
    pub summary: ScanSummary,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total_sites: usize,
    pub failed_sites: usize,
    pub average_score: Option<u8>,
    pub critical: usize,
    pub warnings: usize,
    pub infos: usize,
}
