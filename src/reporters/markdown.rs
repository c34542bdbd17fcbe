//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - Pull request comments
//! - Issue trackers
//! - Documentation

use crate::models::{CompositeReport, DimensionStatus, Rating};
use anyhow::Result;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &CompositeReport) -> Result<String> {
    let mut md = String::new();

    md.push_str(&render_header(report));
    md.push('\n');

    md.push_str(&render_dimensions(report));
    md.push('\n');

    md.push_str(&render_recommendations(report));
    md.push('\n');

    md.push_str(&render_details(report));

    Ok(md)
}

fn render_header(report: &CompositeReport) -> String {
    let rating_emoji = match report.overall_rating {
        Rating::Excellent => "🏆",
        Rating::Good => "⭐",
        Rating::Fair => "⚠️",
        Rating::Poor => "❌",
    };

    format!(
        r#"# {} Site Health Report: {}

**Score: {:.1}/100** | **Rating: {}** | **Dimensions scored: {}/{}**

URL: {}
Generated: {}
"#,
        rating_emoji,
        report.subject_domain,
        report.overall_score,
        report.overall_rating,
        report.dimension_count_used,
        report.dimension_results.len(),
        report.subject_url,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

fn render_dimensions(report: &CompositeReport) -> String {
    let mut md = String::from("## Dimensions\n\n");
    md.push_str("| Dimension | Score | Rating | Status |\n");
    md.push_str("|-----------|------:|--------|--------|\n");
    for result in report.dimension_results.values() {
        let (score, rating) = if result.is_scored() {
            (format!("{:.1}", result.score), result.rating.to_string())
        } else {
            ("n/a".to_string(), "not scored".to_string())
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            result.dimension.label(),
            score,
            rating,
            result.status
        ));
    }
    md
}

fn render_recommendations(report: &CompositeReport) -> String {
    let mut md = String::from("## Recommendations\n\n");
    if report.recommendations.is_empty() {
        md.push_str("_No recommendations._\n");
        return md;
    }
    for (i, recommendation) in report.recommendations.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, recommendation));
    }
    md
}

fn render_details(report: &CompositeReport) -> String {
    let mut md = String::from("## Details\n");
    for result in report.dimension_results.values() {
        if result.issues.is_empty() {
            continue;
        }
        let heading = match result.status {
            DimensionStatus::Error => format!("{} (could not be scored)", result.dimension.label()),
            _ => result.dimension.label().to_string(),
        };
        md.push_str(&format!("\n### {heading}\n\n"));
        for issue in &result.issues {
            md.push_str(&format!("- {}\n", escape(issue)));
        }
    }
    md
}

/// Keep free text from breaking table and list markup
fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}
