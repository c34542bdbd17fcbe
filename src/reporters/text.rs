//! Text (terminal) reporter with colors and formatting

use crate::models::{CompositeReport, DimensionResult, DimensionStatus, Rating};
use anyhow::Result;

/// Rating colors (ANSI escape codes)
fn rating_color(rating: Rating) -> &'static str {
    match rating {
        Rating::Excellent => "\x1b[32m", // Green
        Rating::Good => "\x1b[92m",      // Light green
        Rating::Fair => "\x1b[33m",      // Yellow
        Rating::Poor => "\x1b[31m",      // Red
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Status tag
fn status_tag(status: DimensionStatus) -> &'static str {
    match status {
        DimensionStatus::Ok => "   ",
        DimensionStatus::Warning => "[!]",
        DimensionStatus::Error => "[x]",
    }
}

/// Render report as formatted terminal output
pub fn render(report: &CompositeReport) -> Result<String> {
    let mut out = String::new();

    // Header
    let rating_c = rating_color(report.overall_rating);
    out.push_str(&format!("\n{BOLD}Site Health: {}{RESET}\n", report.subject_domain));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    out.push_str(&format!(
        "Score: {BOLD}{:.1}/100{RESET}  Rating: {rating_c}{BOLD}{}{RESET}  ",
        report.overall_score, report.overall_rating
    ));
    out.push_str(&format!(
        "Dimensions: {}/{}\n",
        report.dimension_count_used,
        report.dimension_results.len()
    ));
    out.push_str(&format!(
        "{DIM}{}  {}{RESET}\n\n",
        report.subject_url,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    // Dimension table
    out.push_str(&format!("{BOLD}DIMENSIONS{RESET}\n"));
    for result in report.dimension_results.values() {
        out.push_str(&format!(
            "  {} {:<16} {}\n",
            status_tag(result.status),
            result.dimension.label(),
            format_result(result)
        ));
    }
    out.push('\n');

    // Issues that explain warnings and failures
    let notes: Vec<String> = report
        .dimension_results
        .values()
        .filter(|r| r.status != DimensionStatus::Ok)
        .flat_map(|r| {
            let shown: Vec<&String> = match r.status {
                DimensionStatus::Error => r.issues.iter().collect(),
                _ => r
                    .issues
                    .iter()
                    .filter(|i| i.starts_with(crate::models::MISSING_FACT_PREFIX))
                    .collect(),
            };
            shown
                .into_iter()
                .map(|issue| format!("  {DIM}{}:{RESET} {}", r.dimension.label(), issue))
                .collect::<Vec<_>>()
        })
        .collect();
    if !notes.is_empty() {
        out.push_str(&format!("{BOLD}NOTES{RESET}\n"));
        for note in notes {
            out.push_str(&note);
            out.push('\n');
        }
        out.push('\n');
    }

    // Recommendations
    out.push_str(&format!(
        "{BOLD}RECOMMENDATIONS{RESET} ({})\n",
        report.recommendations.len()
    ));
    if report.recommendations.is_empty() {
        out.push_str(&format!("  {DIM}Nothing to fix. Keep it up.{RESET}\n"));
    }
    for (i, recommendation) in report.recommendations.iter().enumerate() {
        out.push_str(&format!("  {DIM}{:>3}{RESET}  {}\n", i + 1, recommendation));
    }
    out.push('\n');

    let failed = report.failed_dimensions();
    if !failed.is_empty() {
        out.push_str(&format!(
            "{DIM}{} dimension(s) could not be scored and were left out of the overall score.{RESET}\n",
            failed.len()
        ));
    }

    Ok(out)
}

/// Score with color, or a not-scored marker for failed dimensions
fn format_result(result: &DimensionResult) -> String {
    if !result.is_scored() {
        return format!("{DIM}not scored{RESET}");
    }
    let color = rating_color(result.rating);
    format!(
        "{color}{:>5.1}{RESET}  {}{}",
        result.score,
        result.rating,
        if result.status == DimensionStatus::Warning {
            format!("  {DIM}(incomplete facts){RESET}")
        } else {
            String::new()
        }
    )
}
