//! Base scorer trait and rubric helpers
//!
//! This module defines the core abstractions shared by every dimension:
//! - `Scorer` trait that each dimension rubric implements
//! - `ScoreSheet` for accumulating points, issues and metrics
//! - Bracket helpers that turn a measured quantity into points

use crate::facts::DimensionFacts;
use crate::models::{
    normalize_score, round1, Dimension, DimensionResult, DimensionStatus, Rating,
    MISSING_FACT_PREFIX,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Maps one dimension's facts to a scored result.
///
/// Implementations are pure: identical facts always give an identical
/// result, and malformed or missing facts degrade the score instead of
/// failing the call.
pub trait Scorer: Send + Sync {
    /// Dimension this scorer rates
    fn dimension(&self) -> Dimension;

    /// One-line description of what the rubric measures
    fn description(&self) -> &'static str;

    /// Score the facts
    fn score(&self, facts: &DimensionFacts) -> DimensionResult;
}

/// Points for the first threshold `value` is at or above, else `fallback`.
///
/// `table` is ordered from the highest threshold down.
pub fn at_least(value: f64, table: &[(f64, f64)], fallback: f64) -> f64 {
    table
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or(fallback, |(_, points)| *points)
}

/// Points for the first threshold `value` is at or below, else `fallback`.
///
/// `table` is ordered from the lowest threshold up.
pub fn at_most(value: f64, table: &[(f64, f64)], fallback: f64) -> f64 {
    table
        .iter()
        .find(|(threshold, _)| value <= *threshold)
        .map_or(fallback, |(_, points)| *points)
}

/// `budget - penalty * count`, floored at zero
pub fn deduct(budget: f64, penalty: f64, count: u64) -> f64 {
    (budget - penalty * count as f64).max(0.0)
}

/// `part / whole`, treating an empty whole as 1
pub fn ratio(part: u64, whole: u64) -> f64 {
    part as f64 / whole.max(1) as f64
}

/// Sum of counts, pinned at `u64::MAX` instead of overflowing
pub fn saturating_sum(counts: impl IntoIterator<Item = u64>) -> u64 {
    counts.into_iter().fold(0, u64::saturating_add)
}

/// Percent change of the second half of a series over the first half.
///
/// Odd-length series put the middle point in the second half. Fewer than
/// two points yield no trend.
pub fn half_trend(series: &[f64]) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    let (first, second) = series.split_at(series.len() / 2);
    let first: f64 = first.iter().sum();
    let second: f64 = second.iter().sum();
    Some((second - first) / first.max(1.0) * 100.0)
}

/// Running tally for one scorer invocation
#[derive(Debug)]
pub struct ScoreSheet {
    dimension: Dimension,
    points: f64,
    degraded: bool,
    issues: Vec<String>,
    recommendations: Vec<String>,
    raw_metrics: BTreeMap<String, serde_json::Value>,
}

impl ScoreSheet {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            points: 0.0,
            degraded: false,
            issues: Vec::new(),
            recommendations: Vec::new(),
            raw_metrics: BTreeMap::new(),
        }
    }

    /// Add a check's points to the total and record them as `<check>_score`
    pub fn award(&mut self, check: &str, points: f64) {
        self.points += points;
        self.metric(&format!("{check}_score"), round1(points));
    }

    /// Record a raw metric. Values that fail to serialize are skipped.
    pub fn metric(&mut self, key: &str, value: impl Serialize) {
        if let Ok(value) = serde_json::to_value(value) {
            self.raw_metrics.insert(key.to_string(), value);
        }
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.issues.push(text.into());
    }

    /// Add a recommendation unless this sheet already carries it
    pub fn recommend(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !self.recommendations.contains(&text) {
            self.recommendations.push(text);
        }
    }

    /// Flag a fact the rubric needed but did not get
    pub fn missing(&mut self, field: &str) {
        self.degraded = true;
        self.issues.push(format!("{MISSING_FACT_PREFIX}{field}"));
    }

    /// Result scored from the accumulated points
    pub fn finish(self) -> DimensionResult {
        let score = normalize_score(self.points);
        self.into_result(score, Rating::from_score(score))
    }

    /// Result rated directly from thresholds; the score is the bucket's
    /// representative value so the two always agree.
    pub fn finish_rated(self, rating: Rating) -> DimensionResult {
        self.into_result(rating.representative_score(), rating)
    }

    fn into_result(self, score: f64, rating: Rating) -> DimensionResult {
        let status = if self.degraded {
            DimensionStatus::Warning
        } else {
            DimensionStatus::Ok
        };
        DimensionResult {
            dimension: self.dimension,
            score,
            rating,
            status,
            issues: self.issues,
            recommendations: self.recommendations,
            raw_metrics: self.raw_metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least_table() {
        let table = [(10.0, 30.0), (5.0, 20.0), (1.0, 10.0)];
        assert_eq!(at_least(12.0, &table, 0.0), 30.0);
        assert_eq!(at_least(5.0, &table, 0.0), 20.0);
        assert_eq!(at_least(1.0, &table, 0.0), 10.0);
        assert_eq!(at_least(0.0, &table, 0.0), 0.0);
    }

    #[test]
    fn test_at_most_table() {
        let table = [(500.0, 20.0), (1000.0, 15.0)];
        assert_eq!(at_most(0.0, &table, 0.0), 20.0);
        assert_eq!(at_most(500.0, &table, 0.0), 20.0);
        assert_eq!(at_most(500.1, &table, 0.0), 15.0);
        assert_eq!(at_most(4000.0, &table, 0.0), 0.0);
    }

    #[test]
    fn test_deduct_floors_at_zero() {
        assert_eq!(deduct(25.0, 5.0, 2), 15.0);
        assert_eq!(deduct(25.0, 5.0, 9), 0.0);
    }

    #[test]
    fn test_ratio_of_empty_whole() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(3, 0), 3.0);
        assert_eq!(ratio(1, 4), 0.25);
    }

    #[test]
    fn test_half_trend() {
        assert_eq!(half_trend(&[]), None);
        assert_eq!(half_trend(&[5.0]), None);
        assert_eq!(half_trend(&[10.0, 10.0, 15.0, 15.0]), Some(50.0));
        assert_eq!(half_trend(&[20.0, 10.0]), Some(-50.0));
        // empty first half divides by one
        assert_eq!(half_trend(&[0.0, 3.0]), Some(300.0));
    }

    #[test]
    fn test_sheet_status_follows_missing_facts() {
        let mut sheet = ScoreSheet::new(Dimension::Links);
        sheet.award("internal", 30.0);
        let clean = sheet.finish();
        assert_eq!(clean.status, DimensionStatus::Ok);
        assert_eq!(clean.score, 30.0);
        assert_eq!(clean.raw_metrics["internal_score"], 30.0);

        let mut sheet = ScoreSheet::new(Dimension::Links);
        sheet.missing("broken");
        let degraded = sheet.finish();
        assert_eq!(degraded.status, DimensionStatus::Warning);
        assert_eq!(degraded.missing_facts(), vec!["broken"]);
    }

    #[test]
    fn test_sheet_dedups_own_recommendations() {
        let mut sheet = ScoreSheet::new(Dimension::Content);
        sheet.recommend("Add a meta description");
        sheet.recommend("Add a meta description");
        assert_eq!(sheet.finish().recommendations.len(), 1);
    }

    #[test]
    fn test_finish_rated_uses_representative_score() {
        let result = ScoreSheet::new(Dimension::Analytics).finish_rated(Rating::Good);
        assert_eq!(result.score, 80.0);
        assert_eq!(result.rating, Rating::Good);
    }
}
