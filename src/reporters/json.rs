//! JSON reporter
//!
//! Outputs the full CompositeReport as pretty-printed JSON.
//! The output deserializes back into an identical report.

use crate::models::CompositeReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &CompositeReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render report as compact JSON (single line)
pub fn render_compact(report: &CompositeReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}
