//! Link profile scorer
//!
//! Internal linking (30), external references (15), nofollow ratio (15),
//! broken links (25) and anchor text quality (15).
//!
//! Link lists may be given either as counts or as arrays of
//! `{ "href", "text", "nofollow" }` objects; nofollow and anchor counts are
//! derived from the arrays when not given explicitly.
//!
//! An optional `backlinks` list (`source_domain`, `anchor_text`,
//! `domain_authority`, `is_dofollow`) is summarized into the raw metrics
//! and checked for toxic links. It does not move the score.

use super::base::{at_least, at_most, deduct, ratio, ScoreSheet, Scorer};
use crate::facts::DimensionFacts;
use crate::models::{round1, Dimension, DimensionResult};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Anchor texts that say nothing about the target
const GENERIC_ANCHORS: &[&str] = &[
    "click here",
    "read more",
    "learn more",
    "more",
    "here",
    "link",
    "this",
    "go",
    "continue",
    "details",
];

/// Points lost per broken link
const BROKEN_LINK_PENALTY: f64 = 5.0;

/// Backlinks from domains below this authority count as toxic
const TOXIC_AUTHORITY: u64 = 30;

/// Anchor keywords that mark a backlink as spam
const TOXIC_ANCHOR_KEYWORDS: &[&str] = &["casino", "gambling", "viagra", "cialis", "porn", "xxx", "adult"];

/// Toxic share above which a disavow is recommended
const TOXIC_RATIO_LIMIT: f64 = 0.1;

/// Anchors kept in the backlink summary
const TOP_ANCHORS: usize = 10;

pub struct LinkScorer;

pub fn is_generic_anchor(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    GENERIC_ANCHORS.contains(&normalized.as_str())
}

impl Scorer for LinkScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Links
    }

    fn description(&self) -> &'static str {
        "Internal and external linking, nofollow usage, broken links, anchor text"
    }

    fn score(&self, facts: &DimensionFacts) -> DimensionResult {
        let mut sheet = ScoreSheet::new(Dimension::Links);

        let internal = facts.count_at("internal");
        let external = facts.count_at("external");
        let total = internal.unwrap_or(0).saturating_add(external.unwrap_or(0));
        sheet.metric("total_links", total);

        let internal_points = match internal {
            Some(count) => {
                sheet.metric("internal_links", count);
                if count < 5 {
                    sheet.issue(format!("Few internal links ({count})"));
                    sheet.recommend("Add internal links to related pages");
                }
                at_least(count as f64, &[(10.0, 30.0), (5.0, 20.0), (1.0, 10.0)], 0.0)
            }
            None => {
                sheet.missing("internal");
                0.0
            }
        };
        sheet.award("internal", internal_points);

        let external_points = match external {
            Some(0) => {
                sheet.issue("No external links");
                sheet.recommend("Cite relevant external sources");
                5.0
            }
            Some(count) if count > 100 => {
                sheet.metric("external_links", count);
                sheet.issue(format!("Excessive external links ({count})"));
                sheet.recommend("Trim outbound links to the most relevant sources");
                5.0
            }
            Some(count) => {
                sheet.metric("external_links", count);
                15.0
            }
            None => {
                sheet.missing("external");
                0.0
            }
        };
        sheet.award("external", external_points);

        let nofollow = facts
            .count_at("nofollow")
            .or_else(|| derive_count(facts, |link| link.get("nofollow").and_then(Value::as_bool) == Some(true)));
        let nofollow_points = match nofollow {
            Some(count) => {
                let share = ratio(count, total);
                sheet.metric("nofollow_ratio", share);
                if share > 0.3 {
                    sheet.issue(format!("{:.0}% of links are nofollow", share * 100.0));
                    sheet.recommend("Reserve nofollow for untrusted or paid links");
                }
                at_most(share, &[(0.1, 15.0), (0.3, 10.0), (0.5, 5.0)], 0.0)
            }
            None => {
                sheet.missing("nofollow");
                0.0
            }
        };
        sheet.award("nofollow", nofollow_points);

        let broken_points = match facts.count_at("broken") {
            Some(count) => {
                sheet.metric("broken_links", count);
                if count > 0 {
                    sheet.issue(format!("{count} broken links"));
                    sheet.recommend("Fix or remove broken links");
                }
                deduct(25.0, BROKEN_LINK_PENALTY, count)
            }
            None => {
                sheet.missing("broken");
                0.0
            }
        };
        sheet.award("broken", broken_points);

        let anchor_points = anchor_points(&mut sheet, facts, total);
        sheet.award("anchors", anchor_points);

        backlink_profile(&mut sheet, facts);

        sheet.finish()
    }
}

/// Low authority or a spam keyword in the anchor
pub fn is_toxic_backlink(domain_authority: u64, anchor: &str) -> bool {
    let anchor = anchor.to_lowercase();
    domain_authority < TOXIC_AUTHORITY
        || TOXIC_ANCHOR_KEYWORDS.iter().any(|k| anchor.contains(k))
}

fn backlink_profile(sheet: &mut ScoreSheet, facts: &DimensionFacts) {
    let Some(backlinks) = facts.array_at("backlinks") else {
        return;
    };
    if backlinks.is_empty() {
        sheet.metric("backlinks", json!({"total": 0}));
        sheet.issue("No backlinks found");
        sheet.recommend("Earn backlinks from relevant, reputable sites");
        return;
    }

    let mut domains = BTreeSet::new();
    let mut anchors: BTreeMap<&str, u64> = BTreeMap::new();
    let mut authority = Vec::with_capacity(backlinks.len());
    let mut dofollow = 0u64;
    let mut toxic = 0u64;
    for link in backlinks {
        let da = link.get("domain_authority").and_then(Value::as_u64).unwrap_or(0);
        let anchor = link.get("anchor_text").and_then(Value::as_str).unwrap_or("");
        if let Some(domain) = link.get("source_domain").and_then(Value::as_str) {
            domains.insert(domain);
        }
        *anchors.entry(anchor).or_default() += 1;
        if link.get("is_dofollow").and_then(Value::as_bool).unwrap_or(true) {
            dofollow += 1;
        }
        if is_toxic_backlink(da, anchor) {
            toxic += 1;
        }
        authority.push(da);
    }
    authority.sort_unstable();

    let total = backlinks.len() as u64;
    let mut top_anchors: Vec<(&str, u64)> = anchors.into_iter().collect();
    top_anchors.sort_by(|a, b| b.1.cmp(&a.1));
    top_anchors.truncate(TOP_ANCHORS);
    let toxic_ratio = ratio(toxic, total);
    let avg = authority.iter().map(|&d| d as f64).sum::<f64>() / authority.len() as f64;

    sheet.metric(
        "backlinks",
        json!({
            "total": total,
            "referring_domains": domains.len(),
            "dofollow": dofollow,
            "nofollow": total - dofollow,
            "domain_authority": {
                "min": authority.first(),
                "max": authority.last(),
                "avg": round1(avg),
                "median": authority[authority.len() / 2],
            },
            "top_anchors": top_anchors
                .iter()
                .map(|(text, count)| json!({"text": text, "count": count}))
                .collect::<Vec<_>>(),
            "toxic": toxic,
            "toxic_ratio": round1(toxic_ratio * 100.0) / 100.0,
        }),
    );

    if toxic_ratio > TOXIC_RATIO_LIMIT {
        sheet.issue(format!("{:.0}% of backlinks look toxic", toxic_ratio * 100.0));
        sheet.recommend("Disavow toxic backlinks from low-authority or spam domains");
    }
}

fn anchor_points(sheet: &mut ScoreSheet, facts: &DimensionFacts, total: u64) -> f64 {
    let empty = facts.count_at("anchors.empty").or_else(|| {
        derive_count(facts, |link| {
            link.get("text")
                .and_then(Value::as_str)
                .map_or(true, |t| t.trim().is_empty())
        })
    });
    let generic = facts.count_at("anchors.generic").or_else(|| {
        derive_count(facts, |link| {
            link.get("text")
                .and_then(Value::as_str)
                .is_some_and(is_generic_anchor)
        })
    });

    let (Some(empty), Some(generic)) = (empty, generic) else {
        sheet.missing("anchors");
        return 0.0;
    };
    sheet.metric("empty_anchors", empty);
    sheet.metric("generic_anchors", generic);
    if total == 0 {
        return 0.0;
    }

    let weak = ratio(empty.saturating_add(generic), total);
    sheet.metric("weak_anchor_ratio", weak);
    if empty > 0 {
        sheet.issue(format!("{empty} links have no anchor text"));
    }
    if generic > 0 {
        sheet.issue(format!("{generic} links use generic anchor text"));
    }
    if weak > 0.05 {
        sheet.recommend("Use descriptive anchor text instead of phrases like \"click here\"");
    }
    at_most(weak, &[(0.05, 15.0), (0.15, 10.0), (0.30, 5.0)], 0.0)
}

/// Count link objects across both lists matching `pred`.
///
/// `None` unless at least one list is recorded as an array of objects.
fn derive_count(facts: &DimensionFacts, pred: impl Fn(&Value) -> bool) -> Option<u64> {
    let lists: Vec<&Vec<Value>> = ["internal", "external"]
        .iter()
        .filter_map(|key| facts.array_at(key))
        .collect();
    if lists.is_empty() {
        return None;
    }
    Some(
        lists
            .iter()
            .flat_map(|list| list.iter())
            .filter(|link| link.is_object() && pred(link))
            .count() as u64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DimensionStatus;
    use serde_json::json;

    #[test]
    fn test_generic_anchor_detection() {
        assert!(is_generic_anchor("Click Here"));
        assert!(is_generic_anchor(" read more "));
        assert!(!is_generic_anchor("Pricing for teams"));
    }

    #[test]
    fn test_count_based_facts() {
        let facts = DimensionFacts::from_value(json!({
            "internal": 12,
            "external": 8,
            "nofollow": 1,
            "broken": 0,
            "anchors": {"empty": 0, "generic": 1}
        }));
        let result = LinkScorer.score(&facts);
        assert_eq!(result.score, 100.0);
        assert_eq!(result.status, DimensionStatus::Ok);
    }

    #[test]
    fn test_derived_from_link_lists() {
        let facts = DimensionFacts::from_value(json!({
            "internal": [
                {"href": "/a", "text": "Pricing"},
                {"href": "/b", "text": "click here"},
                {"href": "/c", "text": ""}
            ],
            "external": [
                {"href": "https://other.org", "text": "Other", "nofollow": true}
            ],
            "broken": [{"href": "/gone"}]
        }));
        let result = LinkScorer.score(&facts);
        // internal 10, external 15, nofollow 1/4 -> 10, broken 20, weak 2/4 -> 0
        assert_eq!(result.score, 55.0);
        assert_eq!(result.raw_metrics["generic_anchors"], 1);
        assert_eq!(result.raw_metrics["empty_anchors"], 1);
        assert!(result
            .recommendations
            .contains(&"Fix or remove broken links".to_string()));
    }

    #[test]
    fn test_broken_links_floor_at_zero() {
        let facts = DimensionFacts::from_value(json!({
            "internal": 10, "external": 5, "nofollow": 0, "broken": 12,
            "anchors": {"empty": 0, "generic": 0}
        }));
        let result = LinkScorer.score(&facts);
        assert_eq!(result.raw_metrics["broken_score"], 0.0);
        assert_eq!(result.score, 75.0);
    }

    #[test]
    fn test_no_links_at_all() {
        let facts = DimensionFacts::from_value(json!({
            "internal": [], "external": [], "broken": []
        }));
        let result = LinkScorer.score(&facts);
        // external 5, nofollow ratio 0 -> 15, broken 25
        assert_eq!(result.score, 45.0);
        assert_eq!(result.status, DimensionStatus::Ok);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let facts = DimensionFacts::from_value(json!({
            "internal": u64::MAX, "external": 5, "nofollow": 0, "broken": 0,
            "anchors": {"empty": u64::MAX, "generic": 1}
        }));
        let result = LinkScorer.score(&facts);
        assert_eq!(result.raw_metrics["total_links"], u64::MAX);
        assert_eq!(result.raw_metrics["anchors_score"], 0.0);
    }

    #[test]
    fn test_toxic_backlink_detection() {
        assert!(is_toxic_backlink(12, "Example Bakery"));
        assert!(is_toxic_backlink(80, "Best CASINO bonus"));
        assert!(!is_toxic_backlink(30, "example bakery"));
    }

    #[test]
    fn test_backlink_profile() {
        let mut facts = json!({
            "internal": 12, "external": 8, "nofollow": 1, "broken": 0,
            "anchors": {"empty": 0, "generic": 1}
        });
        facts["backlinks"] = json!([
            {"source_domain": "news.org", "anchor_text": "bakery", "domain_authority": 70, "is_dofollow": true},
            {"source_domain": "news.org", "anchor_text": "bakery", "domain_authority": 60, "is_dofollow": false},
            {"source_domain": "blog.net", "anchor_text": "sourdough", "domain_authority": 50, "is_dofollow": true},
            {"source_domain": "spam.biz", "anchor_text": "cheap viagra", "domain_authority": 10, "is_dofollow": true}
        ]);
        let result = LinkScorer.score(&DimensionFacts::from_value(facts));
        // backlinks never move the score
        assert_eq!(result.score, 100.0);
        let profile = &result.raw_metrics["backlinks"];
        assert_eq!(profile["total"], 4);
        assert_eq!(profile["referring_domains"], 3);
        assert_eq!(profile["dofollow"], 3);
        assert_eq!(profile["nofollow"], 1);
        assert_eq!(profile["domain_authority"]["median"], 60);
        assert_eq!(profile["domain_authority"]["avg"], 47.5);
        assert_eq!(profile["top_anchors"][0]["text"], "bakery");
        assert_eq!(profile["top_anchors"][0]["count"], 2);
        assert_eq!(profile["toxic"], 1);
        assert_eq!(profile["toxic_ratio"], 0.25);
        assert!(result
            .recommendations
            .contains(&"Disavow toxic backlinks from low-authority or spam domains".to_string()));
    }

    #[test]
    fn test_backlinks_are_optional() {
        let facts = DimensionFacts::from_value(json!({
            "internal": 12, "external": 8, "nofollow": 1, "broken": 0,
            "anchors": {"empty": 0, "generic": 1}
        }));
        let result = LinkScorer.score(&facts);
        assert!(result.raw_metrics.get("backlinks").is_none());
        assert_eq!(result.status, DimensionStatus::Ok);
    }

    #[test]
    fn test_missing_everything() {
        let result = LinkScorer.score(&DimensionFacts::new());
        assert_eq!(result.score, 0.0);
        assert_eq!(
            result.missing_facts(),
            vec!["internal", "external", "nofollow", "broken", "anchors"]
        );
    }
}
