//! Keyword usage scorer
//!
//! Placement of the primary keyword (60), its density in body text (25)
//! and the breadth of the keyword set (15).

use super::base::{at_least, ScoreSheet, Scorer};
use crate::facts::DimensionFacts;
use crate::models::{Dimension, DimensionResult};
use serde_json::Value;

/// Placement flag, points, and the advice given when the keyword is absent
const PLACEMENTS: [(&str, f64, &str); 6] = [
    ("in_title", 15.0, "Include the primary keyword in the page title"),
    ("in_meta_description", 10.0, "Include the primary keyword in the meta description"),
    ("in_headings", 10.0, "Use the primary keyword in at least one heading"),
    ("in_url", 10.0, "Include the primary keyword in the URL"),
    ("in_first_paragraph", 10.0, "Mention the primary keyword in the first paragraph"),
    ("in_image_alt", 5.0, "Use the primary keyword in relevant image alt text"),
];

pub struct KeywordScorer;

/// Points for primary keyword density, given as a percentage of all words
pub fn density_points(density: f64) -> f64 {
    if (1.0..=3.0).contains(&density) {
        25.0
    } else if (0.5..1.0).contains(&density) || (3.0..=5.0).contains(&density) {
        15.0
    } else if density > 0.0 {
        5.0
    } else {
        0.0
    }
}

impl Scorer for KeywordScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Keywords
    }

    fn description(&self) -> &'static str {
        "Primary keyword placement, density and keyword breadth"
    }

    fn score(&self, facts: &DimensionFacts) -> DimensionResult {
        let mut sheet = ScoreSheet::new(Dimension::Keywords);

        let keywords = keyword_counts(facts);
        let primary = facts
            .str_at("primary")
            .map(str::to_string)
            .or_else(|| keywords.as_ref()?.first().map(|(k, _)| k.clone()));
        if let Some(primary) = &primary {
            sheet.metric("primary_keyword", primary);
        }

        let placement = placement_points(&mut sheet, facts);
        sheet.award("placement", placement);

        let density = density_score(&mut sheet, facts, primary.as_deref(), keywords.as_deref());
        sheet.award("density", density);

        let breadth = match &keywords {
            Some(list) => {
                sheet.metric("distinct_keywords", list.len());
                if list.len() < 5 {
                    sheet.issue(format!("Narrow keyword coverage ({} keywords)", list.len()));
                    sheet.recommend("Cover related terms and synonyms of the primary keyword");
                }
                at_least(list.len() as f64, &[(10.0, 15.0), (5.0, 10.0), (1.0, 5.0)], 0.0)
            }
            None => {
                sheet.missing("keywords");
                0.0
            }
        };
        sheet.award("breadth", breadth);

        sheet.finish()
    }
}

/// `(keyword, count)` pairs from `[{ "keyword", "count" }]` entries
fn keyword_counts(facts: &DimensionFacts) -> Option<Vec<(String, u64)>> {
    Some(
        facts
            .array_at("keywords")?
            .iter()
            .filter_map(|entry| {
                let keyword = entry.get("keyword").and_then(Value::as_str)?;
                let count = entry.get("count").and_then(Value::as_u64).unwrap_or(0);
                Some((keyword.to_lowercase(), count))
            })
            .collect(),
    )
}

fn placement_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    if !facts.has("placement") {
        sheet.missing("placement");
        return 0.0;
    }
    let mut points = 0.0;
    let mut hits = 0;
    for (flag, value, advice) in PLACEMENTS {
        if facts.bool_at(&format!("placement.{flag}")) == Some(true) {
            points += value;
            hits += 1;
        } else {
            sheet.recommend(advice);
        }
    }
    sheet.metric("placement_hits", hits);
    if hits < PLACEMENTS.len() / 2 {
        sheet.issue(format!(
            "Primary keyword appears in only {hits} of {} key positions",
            PLACEMENTS.len()
        ));
    }
    points
}

fn density_score(
    sheet: &mut ScoreSheet,
    facts: &DimensionFacts,
    primary: Option<&str>,
    keywords: Option<&[(String, u64)]>,
) -> f64 {
    let Some(total_words) = facts.u64_at("total_words") else {
        sheet.missing("total_words");
        return 0.0;
    };
    let occurrences = match (primary, keywords) {
        (Some(primary), Some(list)) => list
            .iter()
            .find(|(k, _)| k == &primary.to_lowercase())
            .map_or(0, |(_, c)| *c),
        _ => 0,
    };
    let density = if total_words == 0 {
        0.0
    } else {
        occurrences as f64 / total_words as f64 * 100.0
    };
    sheet.metric("total_words", total_words);
    sheet.metric("keyword_density", (density * 100.0).round() / 100.0);

    if density > 5.0 {
        sheet.issue(format!("Keyword stuffing ({density:.1}% density)"));
        sheet.recommend("Reduce repetition of the primary keyword");
    } else if density < 0.5 {
        sheet.issue(format!("Primary keyword is rare ({density:.1}% density)"));
        sheet.recommend("Use the primary keyword naturally a few more times");
    }
    density_points(density)
}
