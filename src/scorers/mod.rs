//! Dimension scorers
//!
//! One pure rubric per dimension, each mapping `DimensionFacts` to a
//! `DimensionResult`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Scorer Trait                           │
//! │  - dimension(): which axis this rubric rates                │
//! │  - description(): human-readable summary                    │
//! │  - score(facts): facts -> DimensionResult, never fails      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//! ┌──────────────────────────┐   ┌──────────────────────────────┐
//! │ Point rubrics            │   │ Threshold ratings            │
//! │ (Content, Technical,     │   │ (SearchConsole, Analytics)   │
//! │  Links, Keywords, Mobile,│   │  bucket from aggregate counts│
//! │  Performance, Ads)       │   │  + independent rule checks   │
//! └──────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! Missing facts never abort a scorer: the affected check falls to its
//! lowest bucket, an issue prefixed with `missing fact: ` is recorded and
//! the result status becomes `warning`.

mod ads;
mod analytics;
mod base;
mod content;
mod keywords;
mod links;
mod mobile;
mod performance;
mod search_console;
mod technical;

pub use ads::AdScorer;
pub use analytics::AnalyticsScorer;
pub use base::{ScoreSheet, Scorer};
pub use content::ContentScorer;
pub use keywords::KeywordScorer;
pub use links::LinkScorer;
pub use mobile::MobileScorer;
pub use performance::PerformanceScorer;
pub use search_console::SearchConsoleScorer;
pub use technical::TechnicalScorer;

use crate::facts::DimensionFacts;
use crate::models::{Dimension, DimensionResult};

/// Rubric for a dimension
pub fn scorer_for(dimension: Dimension) -> &'static dyn Scorer {
    match dimension {
        Dimension::Content => &ContentScorer,
        Dimension::Technical => &TechnicalScorer,
        Dimension::Links => &LinkScorer,
        Dimension::Keywords => &KeywordScorer,
        Dimension::Mobile => &MobileScorer,
        Dimension::Performance => &PerformanceScorer,
        Dimension::Ads => &AdScorer,
        Dimension::SearchConsole => &SearchConsoleScorer,
        Dimension::Analytics => &AnalyticsScorer,
    }
}

/// Score one dimension's facts
pub fn score(dimension: Dimension, facts: &DimensionFacts) -> DimensionResult {
    scorer_for(dimension).score(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::SeededProvider;

    #[test]
    fn test_registry_covers_every_dimension() {
        for dimension in Dimension::ALL {
            assert_eq!(scorer_for(dimension).dimension(), dimension);
            assert!(!scorer_for(dimension).description().is_empty());
        }
    }

    #[test]
    fn test_scores_always_in_range() {
        for seed in 0..40 {
            for dimension in Dimension::ALL {
                let facts = SeededProvider::new(dimension, seed).generate();
                let result = score(dimension, &facts);
                assert!(
                    (0.0..=100.0).contains(&result.score),
                    "{dimension} seed {seed} scored {}",
                    result.score
                );
                assert_eq!(result.dimension, dimension);
            }
        }
    }

    #[test]
    fn test_empty_facts_never_panic() {
        for dimension in Dimension::ALL {
            let result = score(dimension, &DimensionFacts::new());
            assert!(result.score <= 50.0, "{dimension} scored {}", result.score);
            assert!(!result.missing_facts().is_empty(), "{dimension} has no marker");
        }
    }

    #[test]
    fn test_scoring_is_idempotent() {
        for dimension in Dimension::ALL {
            let facts = SeededProvider::new(dimension, 99).generate();
            assert_eq!(score(dimension, &facts), score(dimension, &facts));
        }
    }
}
