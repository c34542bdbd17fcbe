//! Technical markup scorer
//!
//! | Check            | Points |
//! |------------------|--------|
//! | HTTP status      | 20     |
//! | Response time    | 15     |
//! | HTTPS            | 15     |
//! | Security headers | 15     |
//! | Indexability     | 15     |
//! | Structured data  | 10     |
//! | Accessibility    | 10     |

use super::base::{at_most, ratio, saturating_sum, ScoreSheet, Scorer};
use crate::facts::DimensionFacts;
use crate::models::{Dimension, DimensionResult};

/// Headers checked, with the field each is recorded under
const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("hsts", "Strict-Transport-Security"),
    ("csp", "Content-Security-Policy"),
    ("x_content_type_options", "X-Content-Type-Options"),
    ("x_frame_options", "X-Frame-Options"),
];
const SECURITY_BUDGET: f64 = 15.0;

pub struct TechnicalScorer;

impl Scorer for TechnicalScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Technical
    }

    fn description(&self) -> &'static str {
        "Status, latency, transport security, indexability, structured data, accessibility"
    }

    fn score(&self, facts: &DimensionFacts) -> DimensionResult {
        let mut sheet = ScoreSheet::new(Dimension::Technical);

        let status = status_points(&mut sheet, facts);
        sheet.award("status", status);

        let latency = match facts.f64_at("response_time_ms") {
            Some(ms) => {
                sheet.metric("response_time_ms", ms);
                if ms > 1000.0 {
                    sheet.issue(format!("Slow server response ({ms:.0} ms)"));
                    sheet.recommend("Reduce server response time below 500 ms");
                }
                at_most(ms, &[(500.0, 15.0), (1000.0, 10.0), (2000.0, 5.0)], 0.0)
            }
            None => {
                sheet.missing("response_time_ms");
                0.0
            }
        };
        sheet.award("response_time", latency);

        let https = match facts.bool_at("https") {
            Some(true) => 15.0,
            Some(false) => {
                sheet.issue("Site is not served over HTTPS");
                sheet.recommend("Serve every page over HTTPS");
                0.0
            }
            None => {
                sheet.missing("https");
                0.0
            }
        };
        sheet.award("https", https);

        let security = security_points(&mut sheet, facts);
        sheet.award("security_headers", security);

        let indexability = indexability_points(&mut sheet, facts);
        sheet.award("indexability", indexability);

        let structured = structured_data_points(&mut sheet, facts);
        sheet.award("structured_data", structured);

        let accessibility = accessibility_points(&mut sheet, facts);
        sheet.award("accessibility", accessibility);

        sheet.finish()
    }
}

fn status_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    let Some(code) = facts.u64_at("status_code") else {
        sheet.missing("status_code");
        return 0.0;
    };
    sheet.metric("status_code", code);
    match code {
        200 => 20.0,
        300..=399 => {
            sheet.issue(format!("Page responds with a redirect ({code})"));
            sheet.recommend("Link directly to the final URL instead of redirecting");
            10.0
        }
        _ => {
            sheet.issue(format!("Page responds with HTTP {code}"));
            sheet.recommend("Make sure the page returns HTTP 200");
            0.0
        }
    }
}

fn security_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    if !facts.has("security_headers") {
        sheet.missing("security_headers");
        return 0.0;
    }
    let per_header = SECURITY_BUDGET / SECURITY_HEADERS.len() as f64;
    let mut missing_headers = Vec::new();
    for (field, header) in SECURITY_HEADERS {
        if facts.bool_at(&format!("security_headers.{field}")) != Some(true) {
            missing_headers.push(header);
        }
    }
    sheet.metric("missing_security_headers", &missing_headers);
    if !missing_headers.is_empty() {
        sheet.issue(format!(
            "Missing security headers: {}",
            missing_headers.join(", ")
        ));
        sheet.recommend("Add standard security headers (HSTS, CSP, X-Content-Type-Options, X-Frame-Options)");
    }
    per_header * (SECURITY_HEADERS.len() - missing_headers.len()) as f64
}

fn indexability_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    if !facts.has("meta") {
        sheet.missing("meta");
        return 0.0;
    }
    let mut points = 0.0;

    if facts.str_at("meta.canonical").is_some_and(|c| !c.trim().is_empty()) {
        points += 5.0;
    } else {
        sheet.issue("No canonical URL declared");
        sheet.recommend("Declare a canonical URL");
    }

    let robots = facts.str_at("meta.robots").unwrap_or_default().to_lowercase();
    if robots.contains("noindex") {
        sheet.issue("Page is marked noindex");
        sheet.recommend("Remove noindex from pages that should appear in search");
    } else {
        points += 5.0;
    }

    if facts.count_at("meta.og_tags").unwrap_or(0) > 0 {
        points += 5.0;
    } else {
        sheet.issue("No Open Graph tags");
        sheet.recommend("Add Open Graph tags for social sharing");
    }
    points
}

fn structured_data_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    if !facts.has("structured_data") {
        sheet.missing("structured_data");
        return 0.0;
    }
    let total = saturating_sum(
        ["json_ld", "microdata", "rdfa"]
            .iter()
            .filter_map(|kind| facts.count_at(&format!("structured_data.{kind}"))),
    );
    sheet.metric("structured_data_items", total);
    if total > 0 {
        10.0
    } else {
        sheet.issue("No structured data found");
        sheet.recommend("Add schema.org structured data (JSON-LD)");
        0.0
    }
}

fn accessibility_points(sheet: &mut ScoreSheet, facts: &DimensionFacts) -> f64 {
    if !facts.has("accessibility") {
        sheet.missing("accessibility");
        return 0.0;
    }
    let mut points = 0.0;

    if facts.str_at("accessibility.lang").is_some_and(|l| !l.is_empty()) {
        points += 4.0;
    } else {
        sheet.issue("Document language is not declared");
        sheet.recommend("Declare the document language with a lang attribute");
    }

    let images = facts.u64_at("accessibility.images_total").unwrap_or(0);
    let with_alt = facts.u64_at("accessibility.images_with_alt").unwrap_or(0);
    let alt_coverage = if images == 0 { 1.0 } else { ratio(with_alt, images).min(1.0) };
    sheet.metric("alt_coverage", alt_coverage);
    points += 3.0 * alt_coverage;
    if alt_coverage < 1.0 {
        sheet.issue(format!("{} of {images} images lack alt text", images.saturating_sub(with_alt)));
        sheet.recommend("Add alt text to all images");
    }

    let inputs = facts.u64_at("accessibility.form_inputs").unwrap_or(0);
    let labeled = facts.u64_at("accessibility.labeled_inputs").unwrap_or(0);
    let label_coverage = if inputs == 0 { 1.0 } else { ratio(labeled, inputs).min(1.0) };
    sheet.metric("form_label_coverage", label_coverage);
    points += 3.0 * label_coverage;
    if label_coverage < 1.0 {
        sheet.issue("Some form inputs have no label");
        sheet.recommend("Associate a label with every form input");
    }
    points
}
