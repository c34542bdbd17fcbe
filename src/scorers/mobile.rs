//! Mobile-friendliness scorer
//!
//! Five independent checks with fixed point budgets:
//!
//! ```text
//! viewport        20   declared with width= and initial-scale=
//! responsive      30   media queries, flex/grid, no fixed widths or rigid images
//! touch targets   20   clickable elements at least 44×44
//! font size       15   body text at least 16px
//! content width   15   nothing wider than the viewport
//! ```
//!
//! Each check loses points in proportion to the violations found instead of
//! failing outright.

use super::base::{deduct, ratio, ScoreSheet, Scorer};
use crate::facts::DimensionFacts;
use crate::models::{Dimension, DimensionResult, Rating};

const VIEWPORT_BUDGET: f64 = 20.0;
const RESPONSIVE_BUDGET: f64 = 30.0;
const TOUCH_BUDGET: f64 = 20.0;
const FONT_BUDGET: f64 = 15.0;
const WIDTH_BUDGET: f64 = 15.0;

const RESPONSIVE_PENALTY: f64 = 7.0; // per responsive-design issue
const WIDTH_PENALTY: f64 = 5.0; // per content-width issue

pub struct MobileScorer;

impl Scorer for MobileScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Mobile
    }

    fn description(&self) -> &'static str {
        "Viewport, responsive layout, touch targets, font size, content width"
    }

    fn score(&self, facts: &DimensionFacts) -> DimensionResult {
        let mut sheet = ScoreSheet::new(Dimension::Mobile);

        let viewport = viewport_points(&mut sheet, facts);
        record_check(&mut sheet, "viewport", viewport, VIEWPORT_BUDGET);

        let responsive = responsive_points(&mut sheet, facts);
        record_check(&mut sheet, "responsive", responsive, RESPONSIVE_BUDGET);

        let touch = touch_points(&mut sheet, facts);
        record_check(&mut sheet, "touch_targets", touch, TOUCH_BUDGET);

        let font = match facts.count_at("small_font_elements") {
            Some(count) => {
                sheet.metric("small_font_elements", count);
                if count > 0 {
                    sheet.issue(format!("{count} elements use text smaller than 16px"));
                    sheet.recommend("Use a base font size of at least 16px");
                }
                deduct(FONT_BUDGET, 1.0, count)
            }
            None => {
                sheet.missing("small_font_elements");
                0.0
            }
        };
        record_check(&mut sheet, "font_size", font, FONT_BUDGET);

        let width = width_points(&mut sheet, facts);
        record_check(&mut sheet, "content_width", width, WIDTH_BUDGET);

        sheet.finish()
    }
}

/// Award a check and record its own rating bucket alongside the points
fn record_check(sheet: &mut ScoreSheet, check: &str, points: f64, budget: f64) {
    sheet.award(check, points);
    let rating = Rating::from_score(points / budget * 100.0);
    sheet.metric(&format!("{check}_rating"), rating);
}

fn viewport_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    // An absent or null viewport is a finding about the page, not a missing fact.
    let Some(content) = facts.str_at("viewport") else {
        sheet.issue("No viewport meta tag");
        sheet.recommend("Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
        return 0.0;
    };
    sheet.metric("viewport", content);
    let content = content.to_lowercase();
    if content.contains("width=") && content.contains("initial-scale=") {
        VIEWPORT_BUDGET
    } else {
        sheet.issue("Viewport tag is incomplete");
        sheet.recommend("Set both width=device-width and initial-scale=1 in the viewport tag");
        VIEWPORT_BUDGET / 2.0
    }
}

fn responsive_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    let media_queries = facts.count_at("media_query_count");
    let flex_grid = facts.bool_at("uses_flex_or_grid");
    let fixed = facts.count_at("fixed_width_elements");
    let rigid_images = facts.count_at("non_responsive_images");

    let mut issues = 0;
    let mut any_missing = false;
    match media_queries {
        Some(0) => {
            issues += 1;
            sheet.issue("No CSS media queries");
            sheet.recommend("Add media queries for small screens");
        }
        Some(_) => {}
        None => {
            sheet.missing("media_query_count");
            any_missing = true;
        }
    }
    match flex_grid {
        Some(false) => {
            issues += 1;
            sheet.issue("Layout uses neither flexbox nor grid");
            sheet.recommend("Use flexbox or CSS grid for fluid layouts");
        }
        Some(true) => {}
        None => {
            sheet.missing("uses_flex_or_grid");
            any_missing = true;
        }
    }
    match fixed {
        Some(n) if n > 0 => {
            issues += 1;
            sheet.issue(format!("{n} elements have fixed widths above 320px"));
            sheet.recommend("Replace fixed pixel widths with relative units");
        }
        Some(_) => {}
        None => {
            sheet.missing("fixed_width_elements");
            any_missing = true;
        }
    }
    match rigid_images {
        Some(n) if n > 0 => {
            issues += 1;
            sheet.issue(format!("{n} images do not scale with the viewport"));
            sheet.recommend("Make images responsive with max-width: 100%");
        }
        Some(_) => {}
        None => {
            sheet.missing("non_responsive_images");
            any_missing = true;
        }
    }
    sheet.metric("responsive_issues", issues);

    if any_missing {
        0.0
    } else {
        deduct(RESPONSIVE_BUDGET, RESPONSIVE_PENALTY, issues)
    }
}

fn touch_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    let (Some(clickable), Some(small)) = (
        facts.count_at("clickable_elements"),
        facts.count_at("small_touch_targets"),
    ) else {
        sheet.missing("touch_targets");
        return 0.0;
    };
    let share = ratio(small, clickable).min(1.0);
    sheet.metric("clickable_elements", clickable);
    sheet.metric("small_touch_targets", small);
    if small > 0 {
        sheet.issue(format!("{small} of {clickable} touch targets are smaller than 44×44"));
        sheet.recommend("Make buttons and links at least 44×44 pixels");
    }
    let penalty = (share * 100.0).floor();
    (TOUCH_BUDGET - penalty).max(0.0)
}

fn width_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    let (Some(overflow), Some(tables)) = (
        facts.count_at("overflow_elements"),
        facts.count_at("non_responsive_tables"),
    ) else {
        sheet.missing("content_width");
        return 0.0;
    };
    let mut issues = 0;
    if overflow > 0 {
        issues += 1;
        sheet.issue(format!("{overflow} elements overflow the viewport"));
        sheet.recommend("Keep content within the viewport width");
    }
    if tables > 0 {
        issues += 1;
        sheet.issue(format!("{tables} tables do not adapt to small screens"));
        sheet.recommend("Wrap wide tables in a horizontally scrollable container");
    }
    deduct(WIDTH_BUDGET, WIDTH_PENALTY, issues)
}
