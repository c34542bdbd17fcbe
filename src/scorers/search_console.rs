//! Search console standing
//!
//! Rated directly from absolute thresholds on total clicks rather than
//! summed points. Index coverage and mobile usability get their own
//! buckets in the raw metrics, and each recommendation comes from an
//! independent rule.

use super::base::{half_trend, ratio, saturating_sum, ScoreSheet, Scorer};
use crate::facts::DimensionFacts;
use crate::models::{round1, Dimension, DimensionResult, Rating};
use serde_json::{json, Value};

/// Queries kept in the raw metrics
const TOP_QUERIES: usize = 5;

pub struct SearchConsoleScorer;

/// Bucket for total clicks over the reporting window
pub fn clicks_rating(clicks: u64) -> Rating {
    match clicks {
        c if c > 1000 => Rating::Excellent,
        c if c > 500 => Rating::Good,
        c if c > 100 => Rating::Fair,
        _ => Rating::Poor,
    }
}

/// Bucket for the share of submitted URLs that are indexed
pub fn coverage_rating(valid_pct: f64) -> Rating {
    match valid_pct {
        p if p > 90.0 => Rating::Excellent,
        p if p > 80.0 => Rating::Good,
        p if p > 70.0 => Rating::Fair,
        _ => Rating::Poor,
    }
}

/// Bucket for the share of pages without mobile usability issues
pub fn usability_rating(valid_pct: f64) -> Rating {
    match valid_pct {
        p if p > 95.0 => Rating::Excellent,
        p if p > 90.0 => Rating::Good,
        p if p > 80.0 => Rating::Fair,
        _ => Rating::Poor,
    }
}

/// Aggregate search performance over the window
#[derive(Debug)]
struct Totals {
    clicks: u64,
    impressions: u64,
    ctr: f64,
    position: f64,
    clicks_trend: Option<f64>,
}

impl Scorer for SearchConsoleScorer {
    fn dimension(&self) -> Dimension {
        Dimension::SearchConsole
    }

    fn description(&self) -> &'static str {
        "Clicks, impressions, CTR, position, index coverage and mobile usability"
    }

    fn score(&self, facts: &DimensionFacts) -> DimensionResult {
        let mut sheet = ScoreSheet::new(Dimension::SearchConsole);

        let Some(totals) = totals(facts) else {
            sheet.missing("rows");
            return sheet.finish_rated(Rating::Poor);
        };

        let rating = clicks_rating(totals.clicks);
        sheet.metric("clicks", totals.clicks);
        sheet.metric("impressions", totals.impressions);
        sheet.metric("ctr", round1(totals.ctr));
        sheet.metric("average_position", round1(totals.position));
        sheet.metric("performance_rating", rating);
        if let Some(trend) = totals.clicks_trend {
            sheet.metric("clicks_trend_pct", round1(trend));
        }

        if totals.position > 10.0 {
            sheet.issue(format!("Average position is {:.1}", totals.position));
            sheet.recommend("Improve content quality and relevance to raise search rankings");
        }
        if totals.ctr < 3.0 {
            sheet.issue(format!("Click-through rate is {:.1}%", totals.ctr));
            sheet.recommend("Optimize meta titles and descriptions to lift click-through rate");
        }
        if totals.clicks_trend.is_some_and(|t| t < 0.0) {
            sheet.issue("Clicks are trending down");
            sheet.recommend("Refresh existing content or publish new content to reverse declining clicks");
        }

        index_coverage(&mut sheet, facts);
        mobile_usability(&mut sheet, facts);
        top_queries(&mut sheet, facts);

        sheet.finish_rated(rating)
    }
}

fn totals(facts: &DimensionFacts) -> Option<Totals> {
    let rows = facts.array_at("rows");
    let has_totals = facts.has("totals.clicks");
    if rows.is_none() && !has_totals {
        return None;
    }
    let rows: &[Value] = rows.map(Vec::as_slice).unwrap_or_default();

    let row_u64 = |row: &Value, key: &str| row.get(key).and_then(Value::as_u64).unwrap_or(0);
    let clicks_series: Vec<f64> = rows.iter().map(|r| row_u64(r, "clicks") as f64).collect();

    let clicks = facts
        .u64_at("totals.clicks")
        .unwrap_or_else(|| saturating_sum(rows.iter().map(|r| row_u64(r, "clicks"))));
    let impressions = facts
        .u64_at("totals.impressions")
        .unwrap_or_else(|| saturating_sum(rows.iter().map(|r| row_u64(r, "impressions"))));
    let ctr = facts
        .f64_at("totals.ctr")
        .unwrap_or_else(|| if impressions == 0 { 0.0 } else { ratio(clicks, impressions) * 100.0 });
    let position = facts.f64_at("totals.position").unwrap_or_else(|| {
        let positions: Vec<f64> = rows
            .iter()
            .filter_map(|r| r.get("position").and_then(Value::as_f64))
            .collect();
        if positions.is_empty() {
            0.0
        } else {
            positions.iter().sum::<f64>() / positions.len() as f64
        }
    });

    Some(Totals {
        clicks,
        impressions,
        ctr,
        position,
        clicks_trend: half_trend(&clicks_series),
    })
}

fn index_coverage(sheet: &mut ScoreSheet, facts: &DimensionFacts) {
    let Some(valid) = facts.u64_at("coverage.valid") else {
        sheet.missing("coverage");
        return;
    };
    let errors = facts.u64_at("coverage.errors").unwrap_or(0);
    let warnings = facts.u64_at("coverage.warnings").unwrap_or(0);
    let excluded = facts.u64_at("coverage.excluded").unwrap_or(0);
    let total = saturating_sum([valid, errors, warnings, excluded]);
    let valid_pct = if total == 0 { 0.0 } else { ratio(valid, total) * 100.0 };

    sheet.metric(
        "index_coverage",
        json!({
            "total_urls": total,
            "valid": valid,
            "errors": errors,
            "warnings": warnings,
            "excluded": excluded,
            "valid_pct": round1(valid_pct),
            "rating": coverage_rating(valid_pct),
        }),
    );
    if errors > 0 {
        sheet.issue(format!("{errors} index coverage errors"));
        sheet.recommend(format!("Fix the {errors} index coverage errors"));
    }
    if warnings > 0 {
        sheet.issue(format!("{warnings} index coverage warnings"));
        sheet.recommend(format!("Review the {warnings} index coverage warnings"));
    }
}

fn mobile_usability(sheet: &mut ScoreSheet, facts: &DimensionFacts) {
    let Some(valid) = facts.u64_at("mobile_usability.valid") else {
        sheet.missing("mobile_usability");
        return;
    };
    let issues = facts.u64_at("mobile_usability.issues").unwrap_or(0);
    let total = valid.saturating_add(issues);
    let valid_pct = if total == 0 { 0.0 } else { ratio(valid, total) * 100.0 };

    sheet.metric(
        "mobile_usability",
        json!({
            "valid": valid,
            "issues": issues,
            "valid_pct": round1(valid_pct),
            "rating": usability_rating(valid_pct),
        }),
    );
    if issues > 0 {
        sheet.issue(format!("{issues} mobile usability issues"));
        sheet.recommend(format!(
            "Resolve the {issues} mobile usability issues reported by search console"
        ));
    }
}

fn top_queries(sheet: &mut ScoreSheet, facts: &DimensionFacts) {
    let Some(queries) = facts.array_at("queries") else {
        return;
    };
    let mut ranked: Vec<(&str, u64)> = queries
        .iter()
        .filter_map(|q| {
            let query = q.get("query").and_then(Value::as_str)?;
            let clicks = q.get("clicks").and_then(Value::as_u64).unwrap_or(0);
            Some((query, clicks))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(TOP_QUERIES);
    let ranked: Vec<Value> = ranked
        .into_iter()
        .map(|(query, clicks)| json!({"query": query, "clicks": clicks}))
        .collect();
    sheet.metric("top_queries", ranked);
}
