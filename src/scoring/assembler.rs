//! Composite report assembly

use super::aggregator::aggregate;
use super::recommendations::{merge_with, MergeOptions};
use crate::models::{CompositeReport, Dimension, DimensionResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::info;

/// Package per-dimension results into the final report, stamped now
pub fn assemble(
    subject_url: &str,
    subject_domain: &str,
    results: BTreeMap<Dimension, DimensionResult>,
    options: &MergeOptions,
) -> CompositeReport {
    assemble_at(subject_url, subject_domain, results, options, Utc::now())
}

/// Same as [`assemble`] with an explicit timestamp
pub fn assemble_at(
    subject_url: &str,
    subject_domain: &str,
    results: BTreeMap<Dimension, DimensionResult>,
    options: &MergeOptions,
    generated_at: DateTime<Utc>,
) -> CompositeReport {
    let aggregate = aggregate(&results);
    let recommendations = merge_with(&results, options);

    info!(
        "Overall {:.1} ({}) from {} of {} dimensions, {} recommendations",
        aggregate.overall_score,
        aggregate.overall_rating,
        aggregate.dimension_count_used,
        results.len(),
        recommendations.len()
    );

    CompositeReport {
        subject_url: subject_url.to_string(),
        subject_domain: subject_domain.to_string(),
        generated_at,
        dimension_results: results,
        overall_score: aggregate.overall_score,
        overall_rating: aggregate.overall_rating,
        recommendations,
        dimension_count_used: aggregate.dimension_count_used,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use crate::scoring::tests::{result, result_with};

    #[test]
    fn test_partial_failure_report() {
        let mut results = BTreeMap::new();
        results.insert(
            Dimension::Content,
            result_with(Dimension::Content, 41.0, &["Add a meta description"]),
        );
        results.insert(Dimension::Mobile, result(Dimension::Mobile, 80.0));
        results.insert(
            Dimension::Performance,
            DimensionResult::provider_failure(Dimension::Performance, "timed out after 30s"),
        );

        let report = assemble(
            "https://example.com",
            "example.com",
            results,
            &MergeOptions::default(),
        );
        assert_eq!(report.overall_score, 60.5);
        assert_eq!(report.overall_rating, Rating::Fair);
        assert_eq!(report.dimension_count_used, 2);
        assert_eq!(report.dimension_results.len(), 3);
        assert_eq!(report.failed_dimensions(), vec![Dimension::Performance]);
        assert_eq!(report.recommendations, vec!["Add a meta description"]);
    }

    #[test]
    fn test_empty_report() {
        let report = assemble("https://a.test", "a.test", BTreeMap::new(), &MergeOptions::default());
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.overall_rating, Rating::Poor);
        assert_eq!(report.dimension_count_used, 0);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_report_survives_json() {
        let mut results = BTreeMap::new();
        results.insert(
            Dimension::SearchConsole,
            result_with(Dimension::SearchConsole, 80.0, &["Fix the 2 index coverage errors"]),
        );
        let report = assemble_at(
            "https://example.com/shop",
            "example.com",
            results,
            &MergeOptions::default(),
            DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json["dimension_results"]["search_console"]["dimension_name"],
            "search_console"
        );
        assert_eq!(json["overall_rating"], "good");

        let back: CompositeReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
