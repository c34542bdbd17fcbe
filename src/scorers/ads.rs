//! Advertising exposure scorer
//!
//! Reach across ad platforms (40), campaign volume (30) and how many ads
//! actually land on the subject domain (30).

use super::base::{at_least, ratio, saturating_sum, ScoreSheet, Scorer};
use crate::facts::DimensionFacts;
use crate::models::{Dimension, DimensionResult};
use std::collections::BTreeMap;

pub struct AdScorer;

impl Scorer for AdScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Ads
    }

    fn description(&self) -> &'static str {
        "Ad platform reach, campaign volume and landing page alignment"
    }

    fn score(&self, facts: &DimensionFacts) -> DimensionResult {
        let mut sheet = ScoreSheet::new(Dimension::Ads);

        let Some(platforms) = facts.object_at("platforms") else {
            sheet.missing("platforms");
            sheet.award("platforms", 0.0);
            sheet.award("volume", 0.0);
            sheet.award("landing_pages", 0.0);
            return sheet.finish();
        };

        let counts: BTreeMap<&str, u64> = platforms
            .iter()
            .map(|(name, count)| (name.as_str(), count.as_u64().unwrap_or(0)))
            .collect();
        let active = counts.values().filter(|&&c| c > 0).count();
        let total = saturating_sum(counts.values().copied());
        sheet.metric("ads_per_platform", &counts);
        sheet.metric("active_platforms", active);
        sheet.metric("total_ads", total);
        if let Some(spend) = facts.f64_at("estimated_monthly_spend") {
            sheet.metric("estimated_monthly_spend", spend);
        }

        let reach = at_least(active as f64, &[(3.0, 40.0), (2.0, 30.0), (1.0, 20.0)], 0.0);
        if active == 0 {
            sheet.issue("No active ad campaigns found");
            sheet.recommend("Consider a search ad campaign for high-intent keywords");
        } else if active < 3 {
            sheet.issue(format!("Ads run on only {active} platform(s)"));
            sheet.recommend("Diversify advertising across more platforms");
        }
        sheet.award("platforms", reach);

        let volume = at_least(total as f64, &[(20.0, 30.0), (10.0, 20.0), (1.0, 10.0)], 0.0);
        sheet.award("volume", volume);

        let landing = if total == 0 {
            0.0
        } else {
            match facts.u64_at("landing_on_domain") {
                Some(on_domain) => {
                    let share = ratio(on_domain, total).min(1.0);
                    sheet.metric("landing_page_coverage", share);
                    if share < 0.9 {
                        sheet.issue(format!(
                            "{:.0}% of ads land outside the site",
                            (1.0 - share) * 100.0
                        ));
                        sheet.recommend("Point ad landing pages at the analysed domain");
                    }
                    at_least(share, &[(0.9, 30.0), (0.7, 20.0), (0.5, 10.0)], 0.0)
                }
                None => {
                    sheet.missing("landing_on_domain");
                    0.0
                }
            }
        };
        sheet.award("landing_pages", landing);

        sheet.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DimensionStatus;
    use serde_json::json;

    #[test]
    fn test_broad_aligned_campaigns() {
        let facts = DimensionFacts::from_value(json!({
            "platforms": {"google": 12, "facebook": 6, "linkedin": 4},
            "landing_on_domain": 21,
            "estimated_monthly_spend": 1250.5
        }));
        let result = AdScorer.score(&facts);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.raw_metrics["ads_per_platform"]["google"], 12);
    }

    #[test]
    fn test_single_platform_misaligned() {
        let facts = DimensionFacts::from_value(json!({
            "platforms": {"google": 4, "facebook": 0},
            "landing_on_domain": 2
        }));
        let result = AdScorer.score(&facts);
        // 20 + 10 + 10
        assert_eq!(result.score, 40.0);
        assert!(result
            .recommendations
            .contains(&"Diversify advertising across more platforms".to_string()));
    }

    #[test]
    fn test_no_ads() {
        let facts = DimensionFacts::from_value(json!({"platforms": {}}));
        let result = AdScorer.score(&facts);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.status, DimensionStatus::Ok);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let facts = DimensionFacts::from_value(json!({
            "platforms": {"google": u64::MAX, "facebook": 1},
            "landing_on_domain": u64::MAX
        }));
        let result = AdScorer.score(&facts);
        assert_eq!(result.raw_metrics["total_ads"], u64::MAX);
        // 30 + 30 + 30
        assert_eq!(result.score, 90.0);
    }

    #[test]
    fn test_missing_platforms() {
        let result = AdScorer.score(&DimensionFacts::new());
        assert_eq!(result.status, DimensionStatus::Warning);
        assert_eq!(result.missing_facts(), vec!["platforms"]);
    }
}
