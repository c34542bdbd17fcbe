//! Core data models for sitehealth
//!
//! These records flow through the whole engine: scorers produce
//! `DimensionResult`s, the assembler packages them into one
//! `CompositeReport`, and reporters render that report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Prefix carried by every issue that was raised because a fact was absent.
///
/// Lets consumers tell "scored poorly" apart from "could not read the input"
/// without parsing free text.
pub const MISSING_FACT_PREFIX: &str = "missing fact: ";

/// Round a score to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Clamp to `[0, 100]` and round to one decimal. NaN collapses to 0.
pub fn normalize_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    round1(value.clamp(0.0, 100.0))
}

/// One independent quality axis of a site.
///
/// Declaration order is the recommendation priority order, so `Ord`
/// (and therefore `BTreeMap<Dimension, _>` iteration) follows it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Content,
    Technical,
    Links,
    Keywords,
    Mobile,
    Performance,
    Ads,
    SearchConsole,
    Analytics,
}

impl Dimension {
    /// Every dimension, in priority order
    pub const ALL: [Dimension; 9] = [
        Dimension::Content,
        Dimension::Technical,
        Dimension::Links,
        Dimension::Keywords,
        Dimension::Mobile,
        Dimension::Performance,
        Dimension::Ads,
        Dimension::SearchConsole,
        Dimension::Analytics,
    ];

    /// Stable machine name (matches the serialized form)
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Content => "content",
            Dimension::Technical => "technical",
            Dimension::Links => "links",
            Dimension::Keywords => "keywords",
            Dimension::Mobile => "mobile",
            Dimension::Performance => "performance",
            Dimension::Ads => "ads",
            Dimension::SearchConsole => "search_console",
            Dimension::Analytics => "analytics",
        }
    }

    /// Human-readable label for reports
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Content => "Content",
            Dimension::Technical => "Technical",
            Dimension::Links => "Links",
            Dimension::Keywords => "Keywords",
            Dimension::Mobile => "Mobile",
            Dimension::Performance => "Performance",
            Dimension::Ads => "Ads",
            Dimension::SearchConsole => "Search Console",
            Dimension::Analytics => "Analytics",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "content" => Ok(Dimension::Content),
            "technical" | "tech" => Ok(Dimension::Technical),
            "links" | "link" => Ok(Dimension::Links),
            "keywords" | "keyword" => Ok(Dimension::Keywords),
            "mobile" => Ok(Dimension::Mobile),
            "performance" | "pagespeed" => Ok(Dimension::Performance),
            "ads" | "ad" => Ok(Dimension::Ads),
            "search_console" | "searchconsole" | "gsc" => Ok(Dimension::SearchConsole),
            "analytics" => Ok(Dimension::Analytics),
            _ => Err(anyhow::anyhow!(
                "Unknown dimension '{}'. Valid dimensions: content, technical, links, keywords, mobile, performance, ads, search_console, analytics",
                s
            )),
        }
    }
}

/// Outcome of scoring one dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DimensionStatus {
    /// Every fact the rubric reads was present
    #[default]
    Ok,
    /// Scored from incomplete facts; still counts toward the overall score
    Warning,
    /// Could not be scored at all (provider failure or timeout)
    Error,
}

impl std::fmt::Display for DimensionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DimensionStatus::Ok => write!(f, "ok"),
            DimensionStatus::Warning => write!(f, "warning"),
            DimensionStatus::Error => write!(f, "error"),
        }
    }
}

/// Rating bucket derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Excellent,
    Good,
    Fair,
    #[default]
    Poor,
}

impl Rating {
    /// Bucket a 0-100 score: ≥90 excellent, ≥70 good, ≥50 fair, else poor
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Rating::Excellent,
            s if s >= 70.0 => Rating::Good,
            s if s >= 50.0 => Rating::Fair,
            _ => Rating::Poor,
        }
    }

    /// Score that stands in for a bucket when a dimension rates directly
    /// from thresholds instead of summing points.
    pub fn representative_score(&self) -> f64 {
        match self {
            Rating::Excellent => 95.0,
            Rating::Good => 80.0,
            Rating::Fair => 60.0,
            Rating::Poor => 30.0,
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Excellent => write!(f, "excellent"),
            Rating::Good => write!(f, "good"),
            Rating::Fair => write!(f, "fair"),
            Rating::Poor => write!(f, "poor"),
        }
    }
}

/// Scored output of one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    #[serde(rename = "dimension_name")]
    pub dimension: Dimension,
    /// Always within `[0, 100]`, one decimal
    pub score: f64,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub status: DimensionStatus,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Measured quantities and sub-scores, keyed by name
    #[serde(default)]
    pub raw_metrics: BTreeMap<String, serde_json::Value>,
}

impl DimensionResult {
    /// Result for a dimension whose facts could not be obtained.
    ///
    /// Score is pinned to 0 and the cause becomes the sole issue.
    pub fn provider_failure(dimension: Dimension, cause: impl Into<String>) -> Self {
        Self {
            dimension,
            score: 0.0,
            rating: Rating::Poor,
            status: DimensionStatus::Error,
            issues: vec![cause.into()],
            recommendations: Vec::new(),
            raw_metrics: BTreeMap::new(),
        }
    }

    /// Whether this result counts toward the overall score
    pub fn is_scored(&self) -> bool {
        self.status != DimensionStatus::Error
    }

    /// Field paths that were missing from the facts this result was scored from
    pub fn missing_facts(&self) -> Vec<&str> {
        self.issues
            .iter()
            .filter_map(|issue| issue.strip_prefix(MISSING_FACT_PREFIX))
            .collect()
    }
}

/// Final record of one analysis run.
///
/// Built once by the assembler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeReport {
    pub subject_url: String,
    pub subject_domain: String,
    pub generated_at: DateTime<Utc>,
    pub dimension_results: BTreeMap<Dimension, DimensionResult>,
    pub overall_score: f64,
    pub overall_rating: Rating,
    pub recommendations: Vec<String>,
    pub dimension_count_used: usize,
}

impl CompositeReport {
    /// Dimensions that could not be scored
    pub fn failed_dimensions(&self) -> Vec<Dimension> {
        self.dimension_results
            .values()
            .filter(|r| !r.is_scored())
            .map(|r| r.dimension)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_buckets() {
        assert_eq!(Rating::from_score(100.0), Rating::Excellent);
        assert_eq!(Rating::from_score(90.0), Rating::Excellent);
        assert_eq!(Rating::from_score(89.9), Rating::Good);
        assert_eq!(Rating::from_score(70.0), Rating::Good);
        assert_eq!(Rating::from_score(60.5), Rating::Fair);
        assert_eq!(Rating::from_score(49.9), Rating::Poor);
        assert_eq!(Rating::from_score(0.0), Rating::Poor);
    }

    #[test]
    fn test_representative_score_matches_bucket() {
        for rating in [Rating::Excellent, Rating::Good, Rating::Fair, Rating::Poor] {
            assert_eq!(Rating::from_score(rating.representative_score()), rating);
        }
    }

    #[test]
    fn test_normalize_score() {
        assert_eq!(normalize_score(41.04), 41.0);
        assert_eq!(normalize_score(60.55), 60.6);
        assert_eq!(normalize_score(-3.0), 0.0);
        assert_eq!(normalize_score(140.0), 100.0);
        assert_eq!(normalize_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_dimension_order_is_priority_order() {
        let mut shuffled = vec![
            Dimension::Analytics,
            Dimension::Mobile,
            Dimension::Content,
            Dimension::SearchConsole,
            Dimension::Links,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                Dimension::Content,
                Dimension::Links,
                Dimension::Mobile,
                Dimension::SearchConsole,
                Dimension::Analytics,
            ]
        );
    }

    #[test]
    fn test_dimension_parsing() {
        assert_eq!(
            "search-console".parse::<Dimension>().unwrap(),
            Dimension::SearchConsole
        );
        assert_eq!("Link".parse::<Dimension>().unwrap(), Dimension::Links);
        assert_eq!(
            "pagespeed".parse::<Dimension>().unwrap(),
            Dimension::Performance
        );
        assert!("seo".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_dimension_serializes_snake_case() {
        let json = serde_json::to_string(&Dimension::SearchConsole).unwrap();
        assert_eq!(json, "\"search_console\"");
    }

    #[test]
    fn test_provider_failure_invariants() {
        let result = DimensionResult::provider_failure(Dimension::Performance, "timed out");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.status, DimensionStatus::Error);
        assert_eq!(result.issues, vec!["timed out".to_string()]);
        assert!(result.recommendations.is_empty());
        assert!(!result.is_scored());
    }

    #[test]
    fn test_missing_facts_extracts_marked_issues() {
        let mut result = DimensionResult::provider_failure(Dimension::Content, "x");
        result.issues = vec![
            "Title is too short".into(),
            format!("{MISSING_FACT_PREFIX}description"),
        ];
        assert_eq!(result.missing_facts(), vec!["description"]);
    }
}
