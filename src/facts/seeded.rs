//! Deterministic synthetic facts
//!
//! Used when no live collector or snapshot is available, and for
//! reproducible demos. Each (seed, dimension) pair drives its own ChaCha8
//! stream, so the same seed always yields the same facts regardless of the
//! order or thread providers run on.

use super::{DimensionFacts, FactProvider, ProviderError};
use crate::context::RunContext;
use crate::models::Dimension;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};
use std::sync::Arc;

const PLATFORMS: [&str; 5] = ["google", "facebook", "instagram", "linkedin", "twitter"];
const MEDIUMS: [&str; 5] = ["organic", "direct", "referral", "social", "email"];
const REFERRERS: [&str; 8] = [
    "news.example.org", "blog.example.net", "forum.example.com", "docs.example.io",
    "review.example.com", "partners.example.org", "links.example.biz", "casino-deals.example",
];
const ANCHORS: [&str; 6] = ["official site", "read more", "health guide", "pricing", "here", "casino bonus"];
const KEYWORDS: [&str; 12] = [
    "health", "site", "guide", "pricing", "review", "service", "support", "local", "best",
    "online", "free", "shop",
];

pub struct SeededProvider {
    dimension: Dimension,
    seed: u64,
}

impl SeededProvider {
    pub fn new(dimension: Dimension, seed: u64) -> Self {
        Self { dimension, seed }
    }

    /// One seeded provider per requested dimension
    pub fn all(seed: u64, dimensions: &[Dimension]) -> Vec<Arc<dyn FactProvider>> {
        dimensions
            .iter()
            .map(|&d| Arc::new(Self::new(d, seed)) as Arc<dyn FactProvider>)
            .collect()
    }

    fn rng(&self) -> ChaCha8Rng {
        let stream = self.dimension as u64 + 1;
        ChaCha8Rng::seed_from_u64(self.seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ stream)
    }

    /// Generate facts without a run context
    pub fn generate(&self) -> DimensionFacts {
        let mut rng = self.rng();
        let value = match self.dimension {
            Dimension::Content => content(&mut rng),
            Dimension::Technical => technical(&mut rng),
            Dimension::Links => links(&mut rng),
            Dimension::Keywords => keywords(&mut rng),
            Dimension::Mobile => mobile(&mut rng),
            Dimension::Performance => performance(&mut rng),
            Dimension::Ads => ads(&mut rng),
            Dimension::SearchConsole => search_console(&mut rng),
            Dimension::Analytics => analytics(&mut rng),
        };
        DimensionFacts::from_value(value)
    }
}

impl FactProvider for SeededProvider {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn name(&self) -> &str {
        "seeded"
    }

    fn fetch(&self, _ctx: &RunContext) -> Result<DimensionFacts, ProviderError> {
        Ok(self.generate())
    }
}

fn words(rng: &mut ChaCha8Rng, count: usize) -> String {
    (0..count)
        .map(|_| KEYWORDS[rng.random_range(0..KEYWORDS.len())])
        .collect::<Vec<_>>()
        .join(" ")
}

fn content(rng: &mut ChaCha8Rng) -> Value {
    let title_words = rng.random_range(1..12);
    let description = "x".repeat(rng.random_range(0..220));
    let h2 = rng.random_range(0..6);
    let images: Vec<Value> = (0..rng.random_range(0..8))
        .map(|i| {
            let alt = if rng.random_bool(0.7) {
                Value::String(words(rng, 3))
            } else {
                Value::Null
            };
            json!({"src": format!("/img/{i}.jpg"), "alt": alt})
        })
        .collect();
    json!({
        "title": words(rng, title_words),
        "description": description,
        "headings": {
            "h1": (0..rng.random_range(0..3)).map(|_| words(rng, 4)).collect::<Vec<_>>(),
            "h2": (0..h2).map(|_| words(rng, 3)).collect::<Vec<_>>(),
            "h3": (0..rng.random_range(0..4)).map(|_| words(rng, 3)).collect::<Vec<_>>(),
        },
        "paragraphs": (0..rng.random_range(0..9)).map(|_| words(rng, 30)).collect::<Vec<_>>(),
        "images": images,
    })
}

fn technical(rng: &mut ChaCha8Rng) -> Value {
    let status = if rng.random_bool(0.9) { 200 } else { 301 };
    let images_total = rng.random_range(0..20u64);
    let form_inputs = rng.random_range(0..6u64);
    json!({
        "status_code": status,
        "response_time_ms": rng.random_range(80.0..2500.0_f64).round(),
        "https": rng.random_bool(0.85),
        "security_headers": {
            "hsts": rng.random_bool(0.5),
            "csp": rng.random_bool(0.3),
            "x_content_type_options": rng.random_bool(0.6),
            "x_frame_options": rng.random_bool(0.6),
        },
        "meta": {
            "canonical": if rng.random_bool(0.7) { Value::from("https://example.com/") } else { Value::Null },
            "robots": if rng.random_bool(0.1) { "noindex, nofollow" } else { "index, follow" },
            "og_tags": rng.random_range(0..6u64),
        },
        "structured_data": {
            "json_ld": rng.random_range(0..3u64),
            "microdata": rng.random_range(0..2u64),
            "rdfa": 0,
        },
        "accessibility": {
            "lang": if rng.random_bool(0.8) { Value::from("en") } else { Value::Null },
            "images_total": images_total,
            "images_with_alt": rng.random_range(0..=images_total),
            "form_inputs": form_inputs,
            "labeled_inputs": rng.random_range(0..=form_inputs),
        },
    })
}

fn links(rng: &mut ChaCha8Rng) -> Value {
    let internal = rng.random_range(0..40u64);
    let external = rng.random_range(0..20u64);
    let total = internal + external;
    let backlinks: Vec<Value> = (0..rng.random_range(0..60usize))
        .map(|_| {
            json!({
                "source_domain": REFERRERS[rng.random_range(0..REFERRERS.len())],
                "anchor_text": ANCHORS[rng.random_range(0..ANCHORS.len())],
                "domain_authority": rng.random_range(1..=100u64),
                "is_dofollow": rng.random_bool(0.8),
            })
        })
        .collect();
    json!({
        "internal": internal,
        "external": external,
        "nofollow": rng.random_range(0..=external),
        "broken": rng.random_range(0..4u64),
        "anchors": {
            "empty": rng.random_range(0..=total.min(3)),
            "generic": rng.random_range(0..=total.min(5)),
        },
        "backlinks": backlinks,
    })
}

fn keywords(rng: &mut ChaCha8Rng) -> Value {
    let total_words = rng.random_range(150..2000u64);
    let distinct = rng.random_range(1..KEYWORDS.len());
    let list: Vec<Value> = KEYWORDS[..distinct]
        .iter()
        .enumerate()
        .map(|(i, kw)| json!({"keyword": kw, "count": (40 / (i + 1)) as u64 + rng.random_range(0..5u64)}))
        .collect();
    json!({
        "primary": KEYWORDS[0],
        "total_words": total_words,
        "keywords": list,
        "placement": {
            "in_title": rng.random_bool(0.6),
            "in_meta_description": rng.random_bool(0.5),
            "in_headings": rng.random_bool(0.5),
            "in_url": rng.random_bool(0.4),
            "in_first_paragraph": rng.random_bool(0.6),
            "in_image_alt": rng.random_bool(0.3),
        },
    })
}

fn mobile(rng: &mut ChaCha8Rng) -> Value {
    let viewport = match rng.random_range(0..4) {
        0 => Value::Null,
        1 => Value::from("width=device-width"),
        _ => Value::from("width=device-width, initial-scale=1"),
    };
    let clickable = rng.random_range(0..60u64);
    json!({
        "viewport": viewport,
        "media_query_count": rng.random_range(0..12u64),
        "uses_flex_or_grid": rng.random_bool(0.7),
        "fixed_width_elements": rng.random_range(0..3u64),
        "non_responsive_images": rng.random_range(0..4u64),
        "clickable_elements": clickable,
        "small_touch_targets": rng.random_range(0..=clickable / 5),
        "small_font_elements": rng.random_range(0..8u64),
        "overflow_elements": rng.random_range(0..2u64),
        "non_responsive_tables": rng.random_range(0..2u64),
    })
}

fn performance(rng: &mut ChaCha8Rng) -> Value {
    let resources = rng.random_range(5..90u64);
    let images = rng.random_range(0..30u64);
    json!({
        "total_bytes": rng.random_range(80_000..4_000_000u64),
        "resource_count": resources,
        "render_blocking": {
            "scripts": rng.random_range(0..8u64),
            "stylesheets": rng.random_range(0..4u64),
        },
        "images": {
            "total": images,
            "oversized": rng.random_range(0..=images / 2),
            "missing_dimensions": rng.random_range(0..=images / 2),
        },
        "cache": {
            "uncached": rng.random_range(0..=resources / 3),
            "short_lived": rng.random_range(0..=resources / 4),
        },
        "inline": {
            "non_minified": rng.random_range(0..6u64),
        },
    })
}

fn ads(rng: &mut ChaCha8Rng) -> Value {
    let mut platforms = serde_json::Map::new();
    let mut total = 0u64;
    for platform in PLATFORMS {
        if rng.random_bool(0.5) {
            let count = rng.random_range(0..15u64);
            total += count;
            platforms.insert(platform.to_string(), Value::from(count));
        }
    }
    json!({
        "platforms": platforms,
        "landing_on_domain": rng.random_range(0..=total),
        "estimated_monthly_spend": (rng.random_range(0.0..5000.0_f64) * 100.0).round() / 100.0,
    })
}

fn search_console(rng: &mut ChaCha8Rng) -> Value {
    let base = rng.random_range(1..80u64);
    let drift: i64 = rng.random_range(-2..=2);
    let rows: Vec<Value> = (0..28i64)
        .map(|day| {
            let clicks = (base as i64 + drift * day / 4 + rng.random_range(0..6)).max(0);
            let impressions = clicks * rng.random_range(10..40) + rng.random_range(0..50);
            json!({
                "date": format!("2024-01-{:02}", day + 1),
                "clicks": clicks,
                "impressions": impressions,
                "position": (rng.random_range(1.0..30.0_f64) * 10.0).round() / 10.0,
            })
        })
        .collect();
    let valid = rng.random_range(50..500u64);
    json!({
        "rows": rows,
        "coverage": {
            "valid": valid,
            "errors": rng.random_range(0..20u64),
            "warnings": rng.random_range(0..20u64),
            "excluded": rng.random_range(0..50u64),
        },
        "mobile_usability": {
            "valid": valid,
            "issues": rng.random_range(0..30u64),
        },
    })
}

fn analytics(rng: &mut ChaCha8Rng) -> Value {
    let rows: Vec<Value> = (0..28)
        .map(|day| {
            json!({
                "date": format!("2024-01-{:02}", day + 1),
                "sessions": rng.random_range(20..800u64),
            })
        })
        .collect();
    let sessions: u64 = rows
        .iter()
        .filter_map(|r| r.get("sessions").and_then(Value::as_u64))
        .sum();
    let mut remaining = sessions;
    let sources: Vec<Value> = MEDIUMS
        .iter()
        .map(|medium| {
            let share = rng.random_range(0..=remaining / 2);
            remaining -= share;
            json!({"medium": medium, "sessions": share})
        })
        .collect();
    json!({
        "rows": rows,
        "totals": {
            "sessions": sessions,
            "bounce_rate": (rng.random_range(20.0..80.0_f64) * 10.0).round() / 10.0,
            "pages_per_session": (rng.random_range(1.0..5.0_f64) * 100.0).round() / 100.0,
            "avg_session_duration": rng.random_range(20.0..300.0_f64).round(),
        },
        "sources": sources,
        "devices": [
            {"category": "desktop", "bounce_rate": (rng.random_range(20.0..70.0_f64) * 10.0).round() / 10.0},
            {"category": "mobile", "bounce_rate": (rng.random_range(30.0..85.0_f64) * 10.0).round() / 10.0},
        ],
    })
}
