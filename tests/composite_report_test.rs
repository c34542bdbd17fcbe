//! End-to-end scoring scenarios through the public library API
//!
//! Covers fact scoring, the concurrent pipeline with partial failure,
//! recommendation dedup and the report invariants.

use serde_json::json;
use sitehealth::facts::{DimensionFacts, FactSnapshot, SeededProvider};
use sitehealth::scoring::{assemble, merge, MergeOptions};
use sitehealth::{scorers, Analyzer, Dimension, DimensionResult, DimensionStatus, Rating, RunContext};
use std::collections::BTreeMap;
use std::sync::Arc;

fn short_title_page() -> DimensionFacts {
    DimensionFacts::from_value(json!({
        "title": "AAAAA",
        "description": "",
        "headings": {"h1": ["X"], "h2": [], "h3": []},
        "paragraphs": ["p1"]
    }))
}

fn mobile_without_viewport() -> DimensionFacts {
    DimensionFacts::from_value(json!({
        "media_query_count": 6,
        "uses_flex_or_grid": true,
        "fixed_width_elements": 0,
        "non_responsive_images": 0,
        "clickable_elements": 30,
        "small_touch_targets": 0,
        "small_font_elements": 0,
        "overflow_elements": 0,
        "non_responsive_tables": 0
    }))
}

#[test]
fn test_content_scenario() {
    let result = scorers::score(Dimension::Content, &short_title_page());
    assert_eq!(result.score, 39.0);
    assert_eq!(result.rating, Rating::Poor);
    assert_eq!(result.status, DimensionStatus::Ok);
    assert!(result
        .recommendations
        .iter()
        .any(|r| r == "Add a meta description"));
}

#[test]
fn test_mobile_without_viewport() {
    let result = scorers::score(Dimension::Mobile, &mobile_without_viewport());
    assert_eq!(result.score, 80.0);
    assert_eq!(result.rating, Rating::Good);
}

#[test]
fn test_partial_failure_is_excluded() {
    let mut results = BTreeMap::new();
    results.insert(
        Dimension::Content,
        scorers::score(Dimension::Content, &short_title_page()),
    );
    results.insert(
        Dimension::Mobile,
        scorers::score(Dimension::Mobile, &mobile_without_viewport()),
    );
    results.insert(
        Dimension::Performance,
        DimensionResult::provider_failure(Dimension::Performance, "timed out"),
    );

    let report = assemble("https://example.com/", "example.com", results, &MergeOptions::default());
    assert_eq!(report.overall_score, 59.5);
    assert_eq!(report.overall_rating, Rating::Fair);
    assert_eq!(report.dimension_count_used, 2);
    assert_eq!(report.dimension_results.len(), 3);
    assert_eq!(report.dimension_results[&Dimension::Performance].score, 0.0);
}

#[test]
fn test_shared_recommendation_kept_at_content_position() {
    let content = scorers::score(
        Dimension::Content,
        &DimensionFacts::from_value(json!({
            "title": "AAAAA",
            "headings": {"h1": ["X"]},
            "paragraphs": ["p1"],
            "images": [{"src": "a.png"}]
        })),
    );
    let technical = scorers::score(
        Dimension::Technical,
        &DimensionFacts::from_value(json!({
            "status_code": 200,
            "https": false,
            "accessibility": {"lang": "en", "images_total": 4, "images_with_alt": 2}
        })),
    );
    let shared = "Add alt text to all images";
    assert!(content.recommendations.iter().any(|r| r == shared));
    assert!(technical.recommendations.iter().any(|r| r == shared));

    let content_recs = content.recommendations.clone();
    let mut results = BTreeMap::new();
    results.insert(Dimension::Technical, technical);
    results.insert(Dimension::Content, content);

    let merged = merge(&results, 100);
    assert_eq!(merged.iter().filter(|r| r.as_str() == shared).count(), 1);
    assert!(merged.starts_with(&content_recs));
}

#[test]
fn test_recommendation_cap_and_uniqueness() {
    let ctx = RunContext::for_url("https://example.com/");
    let analyzer = Analyzer::new(4).with_providers(SeededProvider::all(11, &Dimension::ALL));
    for cap in [0, 3, 10] {
        let report = analyzer.analyze(&ctx, &MergeOptions::with_cap(cap)).unwrap();
        assert!(report.recommendations.len() <= cap);
        let mut unique = report.recommendations.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), report.recommendations.len());
    }
}

#[test]
fn test_snapshot_pipeline_with_recorded_failure() {
    let snapshot = FactSnapshot::from_json(
        &json!({
            "url": "https://example.com/",
            "dimensions": {
                "content": {
                    "title": "AAAAA",
                    "description": "",
                    "headings": {"h1": ["X"], "h2": [], "h3": []},
                    "paragraphs": ["p1"]
                },
                "mobile": mobile_without_viewport(),
                "performance": {"provider_error": "HTTP 503 from resource collector"}
            }
        })
        .to_string(),
    )
    .unwrap();

    let dims = [Dimension::Content, Dimension::Mobile, Dimension::Performance];
    let analyzer = Analyzer::new(2).with_providers(Arc::new(snapshot).providers(&dims));
    let report = analyzer
        .analyze(&RunContext::for_url("https://example.com/"), &MergeOptions::default())
        .unwrap();

    assert_eq!(report.overall_score, 59.5);
    assert_eq!(report.dimension_count_used, 2);
    let performance = &report.dimension_results[&Dimension::Performance];
    assert_eq!(performance.status, DimensionStatus::Error);
    assert!(performance.issues[0].contains("HTTP 503"));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = |seed| {
        Analyzer::new(3)
            .with_providers(SeededProvider::all(seed, &Dimension::ALL))
            .analyze(&RunContext::for_url("https://example.com/"), &MergeOptions::default())
            .unwrap()
    };
    let a = run(21);
    let b = run(21);
    assert_eq!(a.dimension_results, b.dimension_results);
    assert_eq!(a.overall_score, b.overall_score);
    assert_eq!(a.recommendations, b.recommendations);
    assert_eq!(a.overall_rating, Rating::from_score(a.overall_score));
    assert!((0.0..=100.0).contains(&a.overall_score));
}
