//! Content structure scorer
//!
//! Rates title length, meta description length, heading structure and
//! paragraph count:
//!
//! ```text
//! content = title × 0.3 + description × 0.2 + headings × 0.3 + paragraphs × 0.2
//! ```

use super::base::{at_least, ScoreSheet, Scorer};
use crate::facts::DimensionFacts;
use crate::models::{Dimension, DimensionResult};
use serde_json::Value;

const TITLE_WEIGHT: f64 = 0.3;
const DESCRIPTION_WEIGHT: f64 = 0.2;
const HEADINGS_WEIGHT: f64 = 0.3;
const PARAGRAPHS_WEIGHT: f64 = 0.2;

pub struct ContentScorer;

/// Points for a title of `len` characters
pub fn title_points(len: usize) -> f64 {
    match len {
        10..=60 => 100.0,
        61..=70 => 80.0,
        71.. => 60.0,
        5..=9 => 40.0,
        _ => 20.0,
    }
}

/// Points for a meta description of `len` characters
pub fn description_points(len: usize) -> f64 {
    match len {
        120..=155 => 100.0,
        100..=119 | 156..=170 => 80.0,
        80..=99 | 171..=200 => 60.0,
        50..=79 => 40.0,
        _ => 20.0,
    }
}

/// Points for paragraph count
pub fn paragraph_points(count: u64) -> f64 {
    at_least(
        count as f64,
        &[(5.0, 100.0), (3.0, 80.0), (2.0, 60.0), (1.0, 40.0)],
        0.0,
    )
}

impl Scorer for ContentScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Content
    }

    fn description(&self) -> &'static str {
        "Title, meta description, heading hierarchy and body length"
    }

    fn score(&self, facts: &DimensionFacts) -> DimensionResult {
        let mut sheet = ScoreSheet::new(Dimension::Content);

        let title = score_title(&mut sheet, facts);
        let description = score_description(&mut sheet, facts);
        let headings = score_headings(&mut sheet, facts);
        let paragraphs = score_paragraphs(&mut sheet, facts);

        sheet.award("title", title * TITLE_WEIGHT);
        sheet.award("description", description * DESCRIPTION_WEIGHT);
        sheet.award("headings", headings * HEADINGS_WEIGHT);
        sheet.award("paragraphs", paragraphs * PARAGRAPHS_WEIGHT);

        check_image_alts(&mut sheet, facts);

        sheet.finish()
    }
}

fn score_title(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    let Some(title) = facts.str_at("title") else {
        sheet.missing("title");
        sheet.recommend("Add a descriptive page title");
        return title_points(0);
    };

    let len = title.trim().chars().count();
    sheet.metric("title_length", len);
    let points = title_points(len);

    if len == 0 {
        sheet.issue("Page title is empty");
        sheet.recommend("Add a descriptive page title");
    } else if len < 10 {
        sheet.issue(format!("Title is too short ({len} characters)"));
        sheet.recommend("Keep the page title between 10 and 60 characters");
    } else if len > 60 {
        sheet.issue(format!("Title is too long ({len} characters)"));
        sheet.recommend("Keep the page title between 10 and 60 characters");
    }
    points
}

fn score_description(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    let Some(description) = facts.str_at("description") else {
        sheet.missing("description");
        sheet.recommend("Add a meta description");
        return description_points(0);
    };

    let len = description.trim().chars().count();
    sheet.metric("description_length", len);

    if len == 0 {
        sheet.issue("Meta description is missing");
        sheet.recommend("Add a meta description");
    } else if !(120..=155).contains(&len) {
        sheet.issue(format!(
            "Meta description length ({len} characters) is outside 120-155"
        ));
        sheet.recommend("Write a meta description of 120-155 characters");
    }
    description_points(len)
}

fn score_headings(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    if !facts.has("headings") {
        sheet.missing("headings");
        sheet.recommend("Use exactly one H1 heading");
        return 0.0;
    }

    let h1 = facts.count_at("headings.h1").unwrap_or(0);
    let h2 = facts.count_at("headings.h2").unwrap_or(0);
    let h3 = facts.count_at("headings.h3").unwrap_or(0);
    sheet.metric("h1_count", h1);
    sheet.metric("h2_count", h2);
    sheet.metric("h3_count", h3);

    let mut points: f64 = 0.0;
    match h1 {
        1 => points += 50.0,
        0 => {
            sheet.issue("No H1 heading found");
            sheet.recommend("Use exactly one H1 heading");
        }
        n => {
            sheet.issue(format!("Multiple H1 headings found ({n})"));
            sheet.recommend("Use exactly one H1 heading");
        }
    }
    if h2 > 0 {
        points += 30.0;
    } else {
        sheet.issue("No H2 headings found");
        sheet.recommend("Break content into sections with H2 subheadings");
    }
    if h3 > 0 {
        points += 20.0;
    }
    points.min(100.0)
}

fn score_paragraphs(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    let Some(count) = facts.count_at("paragraphs") else {
        sheet.missing("paragraphs");
        sheet.recommend("Expand body content to at least five paragraphs");
        return 0.0;
    };

    sheet.metric("paragraph_count", count);
    if count < 5 {
        sheet.issue(format!("Thin content ({count} paragraphs)"));
        sheet.recommend("Expand body content to at least five paragraphs");
    }
    paragraph_points(count)
}

fn check_image_alts(sheet: &mut ScoreSheet, facts: &DimensionFacts) {
    let Some(images) = facts.array_at("images") else {
        return;
    };
    let without_alt = images
        .iter()
        .filter(|img| {
            img.get("alt")
                .and_then(Value::as_str)
                .map_or(true, |alt| alt.trim().is_empty())
        })
        .count();
    sheet.metric("image_count", images.len());
    sheet.metric("images_without_alt", without_alt);
    if without_alt > 0 {
        sheet.issue(format!("{without_alt} images have no alt text"));
        sheet.recommend("Add alt text to all images");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DimensionStatus;
    use serde_json::json;

    fn score(value: serde_json::Value) -> DimensionResult {
        ContentScorer.score(&DimensionFacts::from_value(value))
    }

    #[test]
    fn test_title_brackets() {
        assert_eq!(title_points(0), 20.0);
        assert_eq!(title_points(4), 20.0);
        assert_eq!(title_points(5), 40.0);
        assert_eq!(title_points(9), 40.0);
        assert_eq!(title_points(10), 100.0);
        assert_eq!(title_points(60), 100.0);
        assert_eq!(title_points(61), 80.0);
        assert_eq!(title_points(70), 80.0);
        assert_eq!(title_points(71), 60.0);
    }

    #[test]
    fn test_description_brackets() {
        assert_eq!(description_points(0), 20.0);
        assert_eq!(description_points(49), 20.0);
        assert_eq!(description_points(50), 40.0);
        assert_eq!(description_points(80), 60.0);
        assert_eq!(description_points(100), 80.0);
        assert_eq!(description_points(120), 100.0);
        assert_eq!(description_points(155), 100.0);
        assert_eq!(description_points(160), 80.0);
        assert_eq!(description_points(200), 60.0);
        assert_eq!(description_points(201), 20.0);
    }

    #[test]
    fn test_paragraph_brackets() {
        assert_eq!(paragraph_points(0), 0.0);
        assert_eq!(paragraph_points(1), 40.0);
        assert_eq!(paragraph_points(2), 60.0);
        assert_eq!(paragraph_points(4), 80.0);
        assert_eq!(paragraph_points(12), 100.0);
    }

    #[test]
    fn test_short_title_single_h1_one_paragraph() {
        // 40×0.3 + 20×0.2 + 50×0.3 + 40×0.2
        let result = score(json!({
            "title": "AAAAA",
            "description": "",
            "headings": {"h1": ["X"], "h2": [], "h3": []},
            "paragraphs": ["p1"]
        }));
        assert_eq!(result.score, 39.0);
        assert_eq!(result.status, DimensionStatus::Ok);
        assert_eq!(result.raw_metrics["title_score"], 12.0);
        assert_eq!(result.raw_metrics["headings_score"], 15.0);
        assert!(result
            .recommendations
            .contains(&"Add a meta description".to_string()));
    }

    #[test]
    fn test_well_structured_page_scores_full() {
        let result = score(json!({
            "title": "Composite website health, explained",
            "description": "d".repeat(140),
            "headings": {"h1": ["Main"], "h2": ["A", "B"], "h3": ["a"]},
            "paragraphs": ["1", "2", "3", "4", "5", "6"],
            "images": [{"src": "a.png", "alt": "chart"}]
        }));
        assert_eq!(result.score, 100.0);
        assert!(result.issues.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_absent_input_is_low_but_defined() {
        let result = score(json!({}));
        assert_eq!(result.score, 10.0);
        assert_eq!(result.status, DimensionStatus::Warning);
        assert_eq!(
            result.missing_facts(),
            vec!["title", "description", "headings", "paragraphs"]
        );
    }

    #[test]
    fn test_multiple_h1_loses_h1_points() {
        let result = score(json!({
            "title": "A reasonable page title",
            "description": "d".repeat(130),
            "headings": {"h1": ["One", "Two"], "h2": ["x"], "h3": []},
            "paragraphs": 5
        }));
        // 30 + 20 + 30×0.3 + 20
        assert_eq!(result.score, 79.0);
        assert!(result.issues.iter().any(|i| i.contains("Multiple H1")));
    }

    #[test]
    fn test_images_without_alt_recommendation() {
        let result = score(json!({
            "images": [{"src": "a.png"}, {"src": "b.png", "alt": " "}, {"src": "c.png", "alt": "ok"}]
        }));
        assert_eq!(result.raw_metrics["images_without_alt"], 2);
        assert!(result
            .recommendations
            .contains(&"Add alt text to all images".to_string()));
    }

    #[test]
    fn test_idempotent() {
        let facts = DimensionFacts::from_value(json!({"title": "Hello there, world", "paragraphs": 3}));
        assert_eq!(ContentScorer.score(&facts), ContentScorer.score(&facts));
    }
}
