//! Analytics engagement
//!
//! Rated from total sessions. The engagement score (bounce rate, pages per
//! session, session duration) is reported alongside but does not move the
//! rating; it drives the engagement recommendations.

use super::base::{half_trend, ratio, saturating_sum, ScoreSheet, Scorer};
use crate::facts::DimensionFacts;
use crate::models::{round1, Dimension, DimensionResult, Rating};
use serde_json::Value;

pub struct AnalyticsScorer;

/// Bucket for total sessions over the reporting window
pub fn traffic_rating(sessions: u64) -> Rating {
    match sessions {
        s if s > 10_000 => Rating::Excellent,
        s if s > 5_000 => Rating::Good,
        s if s > 1_000 => Rating::Fair,
        _ => Rating::Poor,
    }
}

/// 0-100 engagement points: bounce rate 30, pages per session 30, duration 40
pub fn engagement_score(bounce_rate: f64, pages_per_session: f64, avg_duration_secs: f64) -> f64 {
    let bounce = match bounce_rate {
        b if b < 30.0 => 30.0,
        b if b < 50.0 => 20.0,
        b if b < 70.0 => 10.0,
        _ => 0.0,
    };
    let depth = match pages_per_session {
        p if p > 3.0 => 30.0,
        p if p > 2.0 => 20.0,
        p if p > 1.5 => 10.0,
        _ => 0.0,
    };
    let duration = match avg_duration_secs {
        d if d > 180.0 => 40.0,
        d if d > 120.0 => 30.0,
        d if d > 60.0 => 20.0,
        _ => 10.0,
    };
    bounce + depth + duration
}

pub fn engagement_rating(score: f64) -> Rating {
    match score {
        s if s > 80.0 => Rating::Excellent,
        s if s > 60.0 => Rating::Good,
        s if s > 40.0 => Rating::Fair,
        _ => Rating::Poor,
    }
}

impl Scorer for AnalyticsScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Analytics
    }

    fn description(&self) -> &'static str {
        "Sessions, traffic trend, traffic sources and engagement"
    }

    fn score(&self, facts: &DimensionFacts) -> DimensionResult {
        let mut sheet = ScoreSheet::new(Dimension::Analytics);

        let series: Vec<f64> = facts
            .array_at("rows")
            .map(|rows| {
                rows.iter()
                    .map(|r| r.get("sessions").and_then(Value::as_f64).unwrap_or(0.0))
                    .collect()
            })
            .unwrap_or_default();
        let sessions = facts
            .u64_at("totals.sessions")
            .or_else(|| facts.has("rows").then(|| series.iter().sum::<f64>() as u64));

        let Some(sessions) = sessions else {
            sheet.missing("totals.sessions");
            return sheet.finish_rated(Rating::Poor);
        };

        let rating = traffic_rating(sessions);
        sheet.metric("sessions", sessions);
        sheet.metric("traffic_rating", rating);

        if let Some(trend) = half_trend(&series) {
            sheet.metric("sessions_trend_pct", round1(trend));
            if trend < 0.0 {
                sheet.issue("Sessions are trending down");
                sheet.recommend("Traffic is declining; step up SEO and content marketing");
            }
        }

        traffic_sources(&mut sheet, facts, sessions);
        engagement(&mut sheet, facts);

        sheet.finish_rated(rating)
    }
}

fn traffic_sources(sheet: &mut ScoreSheet, facts: &DimensionFacts, sessions: u64) {
    let Some(sources) = facts.array_at("sources") else {
        sheet.missing("sources");
        return;
    };
    let sessions_for = |medium: &str| -> u64 {
        saturating_sum(
            sources
                .iter()
                .filter(|s| s.get("medium").and_then(Value::as_str) == Some(medium))
                .filter_map(|s| s.get("sessions").and_then(Value::as_u64)),
        )
    };
    let organic = ratio(sessions_for("organic"), sessions);
    let social = ratio(sessions_for("social"), sessions);
    sheet.metric("organic_share", round1(organic * 100.0) / 100.0);
    sheet.metric("social_share", round1(social * 100.0) / 100.0);

    if organic < 0.3 {
        sheet.issue(format!("Organic search brings {:.0}% of sessions", organic * 100.0));
        sheet.recommend("Organic search traffic is low; strengthen SEO");
    }
    if social < 0.1 {
        sheet.issue(format!("Social media brings {:.0}% of sessions", social * 100.0));
        sheet.recommend("Social traffic is low; invest in social media marketing");
    }
}

fn engagement(sheet: &mut ScoreSheet, facts: &DimensionFacts) {
    let bounce = facts.f64_at("totals.bounce_rate");
    let pages = facts.f64_at("totals.pages_per_session");
    let duration = facts.f64_at("totals.avg_session_duration");

    let mobile_bounce = facts.array_at("devices").and_then(|devices| {
        devices
            .iter()
            .find(|d| d.get("category").and_then(Value::as_str) == Some("mobile"))
            .and_then(|d| d.get("bounce_rate"))
            .and_then(Value::as_f64)
    });
    if let Some(mobile_bounce) = mobile_bounce {
        sheet.metric("mobile_bounce_rate", mobile_bounce);
        if mobile_bounce > 60.0 {
            sheet.issue(format!("Mobile bounce rate is {mobile_bounce:.1}%"));
            sheet.recommend("Mobile visitors bounce often; improve mobile usability");
        }
    }

    let (Some(bounce), Some(pages), Some(duration)) = (bounce, pages, duration) else {
        sheet.missing("engagement");
        return;
    };
    let score = engagement_score(bounce, pages, duration);
    sheet.metric("bounce_rate", bounce);
    sheet.metric("pages_per_session", pages);
    sheet.metric("avg_session_duration", duration);
    sheet.metric("engagement_score", score);
    sheet.metric("engagement_rating", engagement_rating(score));

    if bounce > 60.0 {
        sheet.issue(format!("Bounce rate is {bounce:.1}%"));
        sheet.recommend("Improve landing pages and content quality to reduce bounce rate");
    }
    if pages < 2.0 {
        sheet.issue(format!("{pages:.1} pages per session"));
        sheet.recommend("Strengthen internal links and guide visitors to related content");
    }
    if duration < 60.0 {
        sheet.issue(format!("Average session lasts {duration:.0}s"));
        sheet.recommend("Deepen content to keep visitors engaged longer");
    }
}
