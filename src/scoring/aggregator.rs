//! Overall score aggregation

use crate::models::{normalize_score, CompositeReport, Dimension, DimensionResult, DimensionStatus, Rating};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Overall score and the number of dimensions it was computed from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub overall_score: f64,
    pub overall_rating: Rating,
    pub dimension_count_used: usize,
}

impl Aggregate {
    /// Result when no dimension could be scored
    pub fn empty() -> Self {
        Self {
            overall_score: 0.0,
            overall_rating: Rating::Poor,
            dimension_count_used: 0,
        }
    }
}

/// Unweighted mean over every dimension that did not error.
///
/// `warning` dimensions count at their computed score. With nothing
/// usable the overall score is 0 and the rating poor.
pub fn aggregate(results: &BTreeMap<Dimension, DimensionResult>) -> Aggregate {
    let scores: Vec<f64> = results
        .values()
        .filter(|r| r.is_scored())
        .map(|r| r.score.clamp(0.0, 100.0))
        .collect();

    if scores.is_empty() {
        debug!(
            "No usable dimensions out of {}; overall score defaults to 0",
            results.len()
        );
        return Aggregate::empty();
    }

    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let overall_score = normalize_score(mean);
    debug!(
        "Aggregated {} of {} dimensions: {:.1}",
        scores.len(),
        results.len(),
        overall_score
    );

    Aggregate {
        overall_score,
        overall_rating: Rating::from_score(overall_score),
        dimension_count_used: scores.len(),
    }
}

/// Markdown walkthrough of how a report's overall score was reached
pub fn explain(report: &CompositeReport) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "# Site Health: {:.1} ({})\n",
        report.overall_score, report.overall_rating
    ));

    lines.push("## Scoring Formula\n".to_string());
    lines.push("```".to_string());
    lines.push("Overall = mean(score of every dimension whose status is not error)".to_string());
    lines.push("Rating  = excellent ≥ 90, good ≥ 70, fair ≥ 50, else poor".to_string());
    lines.push("```\n".to_string());

    let used: Vec<String> = report
        .dimension_results
        .values()
        .filter(|r| r.is_scored())
        .map(|r| format!("{:.1}", r.score))
        .collect();
    if used.is_empty() {
        lines.push("No dimension could be scored, so the overall score is 0.\n".to_string());
    } else {
        lines.push(format!(
            "({}) / {} = {:.1}\n",
            used.join(" + "),
            used.len(),
            report.overall_score
        ));
    }

    for result in report.dimension_results.values() {
        lines.push(format!("## {}\n", result.dimension.label()));
        match result.status {
            DimensionStatus::Error => {
                lines.push("- Could not be scored; excluded from the overall score".to_string());
                for issue in &result.issues {
                    lines.push(format!("- Cause: {issue}"));
                }
            }
            status => {
                lines.push(format!(
                    "- Score: {:.1} ({}){}",
                    result.score,
                    result.rating,
                    if status == DimensionStatus::Warning {
                        ", scored from incomplete facts"
                    } else {
                        ""
                    }
                ));
                for (key, value) in &result.raw_metrics {
                    if let Some(check) = key.strip_suffix("_score") {
                        lines.push(format!("  - {check}: {value}"));
                    }
                }
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
