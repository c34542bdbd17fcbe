//! Page performance scorer
//!
//! Budgets: total size 20, resource count 15, render-blocking resources 20,
//! image optimization 20, cache headers 15, inline minification 10.

use super::base::{at_most, deduct, ratio, ScoreSheet, Scorer};
use crate::facts::DimensionFacts;
use crate::models::{round1, Dimension, DimensionResult};

const IMAGE_BUDGET: f64 = 20.0;
const CACHE_BUDGET: f64 = 15.0;
const MINIFY_BUDGET: f64 = 10.0;

/// Base latency assumed before any bytes arrive, in seconds
const BASE_LOAD_SECS: f64 = 0.5;
/// Extra seconds per render-blocking resource
const BLOCKING_LOAD_SECS: f64 = 0.1;

pub struct PerformanceScorer;

/// Points for total page weight in kilobytes
pub fn size_points(kb: f64) -> f64 {
    at_most(
        kb,
        &[(500.0, 20.0), (1000.0, 15.0), (2000.0, 10.0), (3000.0, 5.0)],
        0.0,
    )
}

/// Points for the number of requested resources
pub fn resource_points(count: u64) -> f64 {
    at_most(count as f64, &[(20.0, 15.0), (40.0, 10.0), (60.0, 5.0)], 0.0)
}

/// Points for the number of render-blocking scripts and stylesheets
pub fn blocking_points(count: u64) -> f64 {
    at_most(
        count as f64,
        &[(0.0, 20.0), (2.0, 15.0), (5.0, 10.0), (10.0, 5.0)],
        0.0,
    )
}

/// Rough load time estimate from page weight and blocking resources
pub fn estimated_load_secs(kb: f64, blocking: u64) -> f64 {
    BASE_LOAD_SECS + kb / 1000.0 + BLOCKING_LOAD_SECS * blocking as f64
}

impl Scorer for PerformanceScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Performance
    }

    fn description(&self) -> &'static str {
        "Page weight, request count, render blocking, images, caching, minification"
    }

    fn score(&self, facts: &DimensionFacts) -> DimensionResult {
        let mut sheet = ScoreSheet::new(Dimension::Performance);

        let kb = facts.u64_at("total_bytes").map(|b| b as f64 / 1024.0);
        let size = match kb {
            Some(kb) => {
                sheet.metric("total_size_kb", round1(kb));
                if kb > 1000.0 {
                    sheet.issue(format!("Heavy page ({kb:.0} KB)"));
                    sheet.recommend("Reduce total page weight below 1 MB");
                }
                size_points(kb)
            }
            None => {
                sheet.missing("total_bytes");
                0.0
            }
        };
        sheet.award("size", size);

        let resources = facts.u64_at("resource_count");
        let requests = match resources {
            Some(count) => {
                sheet.metric("resource_count", count);
                if count > 40 {
                    sheet.issue(format!("Many requests ({count} resources)"));
                    sheet.recommend("Bundle or remove resources to cut request count");
                }
                resource_points(count)
            }
            None => {
                sheet.missing("resource_count");
                0.0
            }
        };
        sheet.award("resources", requests);

        let blocking = blocking_count(facts);
        let blocking_score = match blocking {
            Some(count) => {
                sheet.metric("render_blocking", count);
                if count > 0 {
                    sheet.issue(format!("{count} render-blocking resources"));
                    sheet.recommend("Defer non-critical JavaScript and inline critical CSS");
                }
                blocking_points(count)
            }
            None => {
                sheet.missing("render_blocking");
                0.0
            }
        };
        sheet.award("render_blocking", blocking_score);

        if let (Some(kb), Some(blocking)) = (kb, blocking) {
            sheet.metric(
                "estimated_load_time_secs",
                round1(estimated_load_secs(kb, blocking)),
            );
        }

        let images = image_points(&mut sheet, facts);
        sheet.award("images", images);

        let cache = cache_points(&mut sheet, facts, resources);
        sheet.award("cache", cache);

        let minify = match facts.u64_at("inline.non_minified") {
            Some(count) => {
                sheet.metric("non_minified_inline", count);
                if count > 0 {
                    sheet.issue(format!("{count} inline scripts or styles are not minified"));
                    sheet.recommend("Minify inline JavaScript and CSS");
                }
                deduct(MINIFY_BUDGET, 1.0, count)
            }
            None => {
                sheet.missing("inline.non_minified");
                0.0
            }
        };
        sheet.award("minification", minify);

        sheet.finish()
    }
}

/// Blocking scripts plus stylesheets; either half may be omitted but not both
fn blocking_count(facts: &DimensionFacts) -> Option<u64> {
    if let Some(total) = facts.u64_at("render_blocking") {
        return Some(total);
    }
    let scripts = facts.u64_at("render_blocking.scripts");
    let styles = facts.u64_at("render_blocking.stylesheets");
    match (scripts, styles) {
        (None, None) => None,
        (s, c) => Some(s.unwrap_or(0).saturating_add(c.unwrap_or(0))),
    }
}

fn image_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    let Some(total) = facts.u64_at("images.total") else {
        sheet.missing("images");
        return 0.0;
    };
    let oversized = facts.u64_at("images.oversized").unwrap_or(0);
    let missing_dims = facts.u64_at("images.missing_dimensions").unwrap_or(0);
    sheet.metric("image_count", total);
    sheet.metric("oversized_images", oversized);
    sheet.metric("images_missing_dimensions", missing_dims);

    if oversized > 0 {
        sheet.issue(format!("{oversized} images are larger than 100 KB"));
        sheet.recommend("Compress large images and serve modern formats");
    }
    if missing_dims > 0 {
        sheet.issue(format!("{missing_dims} images have no width/height attributes"));
        sheet.recommend("Set explicit width and height on images");
    }
    let share = ratio(oversized.saturating_add(missing_dims), total).min(1.0);
    IMAGE_BUDGET - (share * IMAGE_BUDGET).floor()
}

fn cache_points(sheet: &mut ScoreSheet, facts: &DimensionFacts, resources: Option<u64>) -> f64 {
    let (Some(resources), Some(uncached)) = (resources, facts.u64_at("cache.uncached")) else {
        sheet.missing("cache");
        return 0.0;
    };
    let short = facts.u64_at("cache.short_lived").unwrap_or(0);
    let stale = uncached.saturating_add(short);
    sheet.metric("uncached_resources", uncached);
    sheet.metric("short_cache_resources", short);
    if stale > 0 {
        sheet.issue(format!("{stale} resources lack long-lived cache headers"));
        sheet.recommend("Serve static assets with Cache-Control max-age of at least one day");
    }
    let share = ratio(stale, resources).min(1.0);
    CACHE_BUDGET - (share * CACHE_BUDGET).floor()
}
