//! Recommendation merging
//!
//! Concatenates per-dimension recommendations in priority order, drops
//! exact duplicates keeping the first occurrence, and caps the list.

use crate::models::{Dimension, DimensionResult};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Default number of recommendations kept in a report
pub const DEFAULT_RECOMMENDATION_CAP: usize = 10;

/// How merged recommendations are ordered before the cap applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOrder {
    /// Dimension priority order, then each dimension's own order
    #[default]
    Priority,
    /// Weakest dimensions first; ties keep priority order
    Impact,
}

impl FromStr for MergeOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "priority" => Ok(MergeOrder::Priority),
            "impact" => Ok(MergeOrder::Impact),
            _ => Err(anyhow::anyhow!(
                "Unknown recommendation order '{}'. Valid orders: priority, impact",
                s
            )),
        }
    }
}

impl std::fmt::Display for MergeOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeOrder::Priority => write!(f, "priority"),
            MergeOrder::Impact => write!(f, "impact"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOptions {
    pub cap: usize,
    pub order: MergeOrder,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            cap: DEFAULT_RECOMMENDATION_CAP,
            order: MergeOrder::Priority,
        }
    }
}

impl MergeOptions {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            cap,
            ..Self::default()
        }
    }
}

/// Merge in priority order, keeping at most `cap` entries
pub fn merge(results: &BTreeMap<Dimension, DimensionResult>, cap: usize) -> Vec<String> {
    merge_with(results, &MergeOptions::with_cap(cap))
}

pub fn merge_with(
    results: &BTreeMap<Dimension, DimensionResult>,
    options: &MergeOptions,
) -> Vec<String> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    // (deficit of the dimension that first produced it, text)
    let mut merged: Vec<(f64, &str)> = Vec::new();

    for result in results.values() {
        let deficit = 100.0 - result.score;
        for recommendation in &result.recommendations {
            if seen.insert(recommendation.as_str()) {
                merged.push((deficit, recommendation.as_str()));
            }
        }
    }

    if options.order == MergeOrder::Impact {
        merged.sort_by(|a, b| b.0.total_cmp(&a.0));
    }

    merged
        .into_iter()
        .take(options.cap)
        .map(|(_, text)| text.to_string())
        .collect()
}
