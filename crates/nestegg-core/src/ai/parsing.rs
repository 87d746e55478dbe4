//! Text parsing helpers for AI coaching replies
//!
//! Replies are free-form text. Structure is recovered heuristically and a reply
//! that does not follow the requested shape degrades to its raw text instead of
//! failing: the user still sees what the model said.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use super::types::{Difficulty, GeneratedInsight, SavingsRecommendation, Sentiment};

/// `- item`, `* item`, `• item`, `1. item`, `1) item`
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*•]|\d+[.)])\s+(.+)$").expect("valid regex"));

static RECOMMENDATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^RECOMMENDATION\s*:\s*(.+)$").expect("valid regex"));

static SAVINGS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^SAVINGS\s*:\s*\$?\s*(\d[\d,]*(?:\.\d+)?)").expect("valid regex")
});

static DIFFICULTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^DIFFICULTY\s*:\s*(easy|medium|hard)\b").expect("valid regex")
});

/// Utilization below which the month reads as positive
const POSITIVE_BELOW: f64 = 0.7;
/// Utilization above which the month reads as a warning
const WARNING_ABOVE: f64 = 0.9;

/// Sentiment from spent / budget; the model's own tone is not consulted
pub fn classify_sentiment(spent: f64, budget: f64) -> Sentiment {
    if budget <= 0.0 {
        return Sentiment::Neutral;
    }
    let ratio = spent / budget;
    if ratio < POSITIVE_BELOW {
        Sentiment::Positive
    } else if ratio > WARNING_ABOVE {
        Sentiment::Warning
    } else {
        Sentiment::Neutral
    }
}

/// Text of a bullet or numbered line, marker stripped
fn bullet_text(line: &str) -> Option<&str> {
    BULLET_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// Split a coaching reply into a summary and suggestions
///
/// The first two non-empty lines form the summary. Bullet and numbered lines
/// after them become suggestions. Without any, the raw reply is the only
/// suggestion.
pub fn parse_insight_response(content: &str, spent: f64, budget: f64) -> GeneratedInsight {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let insight = lines.iter().take(2).copied().collect::<Vec<_>>().join(" ");

    let mut suggestions: Vec<String> = lines
        .iter()
        .skip(2)
        .filter_map(|l| bullet_text(l))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if suggestions.is_empty() {
        warn!(
            chars = content.len(),
            "No suggestion bullets in AI reply, using raw content"
        );
        suggestions.push(content.trim().to_string());
    }

    GeneratedInsight {
        insight,
        suggestions,
        sentiment: classify_sentiment(spent, budget),
    }
}

/// Markdown emphasis and list markers models like to wrap labels in
fn strip_decoration(line: &str) -> String {
    line.trim()
        .trim_start_matches(['-', '*', '•', '#', ' '])
        .replace("**", "")
        .trim()
        .to_string()
}

#[derive(Default)]
struct PartialRecommendation {
    action: Option<String>,
    savings: Option<f64>,
    difficulty: Option<Difficulty>,
}

impl PartialRecommendation {
    /// Whatever was seen, missing fields left empty
    fn flush(self) -> Option<SavingsRecommendation> {
        Some(SavingsRecommendation {
            action: self.action?,
            estimated_savings: self.savings,
            difficulty: self.difficulty,
        })
    }

    fn complete(self) -> Option<SavingsRecommendation> {
        Some(SavingsRecommendation {
            action: self.action?,
            estimated_savings: Some(self.savings?),
            difficulty: Some(self.difficulty?),
        })
    }
}

/// Group RECOMMENDATION / SAVINGS / DIFFICULTY lines into records
///
/// A record is flushed when the next RECOMMENDATION starts, keeping any
/// missing SAVINGS or DIFFICULTY as `None`. The record still open when the
/// reply ends is kept only if all three fields were seen. If no record
/// survives, the raw reply becomes a single unstructured recommendation.
pub fn parse_savings_recommendations(content: &str) -> Vec<SavingsRecommendation> {
    let mut records = Vec::new();
    let mut current: Option<PartialRecommendation> = None;

    for raw in content.lines() {
        let line = strip_decoration(raw);
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = RECOMMENDATION_RE.captures(&line) {
            if let Some(done) = current.take().and_then(PartialRecommendation::flush) {
                records.push(done);
            }
            current = Some(PartialRecommendation {
                action: caps.get(1).map(|m| m.as_str().trim().to_string()),
                ..Default::default()
            });
            continue;
        }

        let Some(partial) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = SAVINGS_RE.captures(&line) {
            partial.savings = caps
                .get(1)
                .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok());
        } else if let Some(caps) = DIFFICULTY_RE.captures(&line) {
            partial.difficulty = caps.get(1).and_then(|m| m.as_str().parse().ok());
        }
    }

    if let Some(done) = current.and_then(PartialRecommendation::complete) {
        records.push(done);
    }

    if records.is_empty() {
        warn!(
            chars = content.len(),
            "No complete recommendation records in AI reply, using raw content"
        );
        return vec![SavingsRecommendation {
            action: content.trim().to_string(),
            estimated_savings: None,
            difficulty: None,
        }];
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_boundaries() {
        assert_eq!(classify_sentiment(690.0, 1000.0), Sentiment::Positive);
        assert_eq!(classify_sentiment(700.0, 1000.0), Sentiment::Neutral);
        assert_eq!(classify_sentiment(900.0, 1000.0), Sentiment::Neutral);
        assert_eq!(classify_sentiment(910.0, 1000.0), Sentiment::Warning);
        assert_eq!(classify_sentiment(50.0, 0.0), Sentiment::Neutral);
        assert_eq!(classify_sentiment(50.0, -10.0), Sentiment::Neutral);
    }

    #[test]
    fn test_sentiment_ignores_reply_tone() {
        let content = "Terrible month, you are way over.\nCut back now.\n- Stop spending";
        let parsed = parse_insight_response(content, 100.0, 1000.0);
        assert_eq!(parsed.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_parse_insight_with_mixed_bullets() {
        let content = "\nYou're on track this month.\nFood is your biggest category.\n\n\
                       - Cook at home twice a week\n\
                       * Cancel the unused gym plan\n\
                       • Set a weekend cap\n\
                       1. Review subscriptions\n\
                       2) Automate savings\n\
                       Good luck!";
        let parsed = parse_insight_response(content, 800.0, 1000.0);

        assert_eq!(
            parsed.insight,
            "You're on track this month. Food is your biggest category."
        );
        assert_eq!(
            parsed.suggestions,
            vec![
                "Cook at home twice a week",
                "Cancel the unused gym plan",
                "Set a weekend cap",
                "Review subscriptions",
                "Automate savings",
            ]
        );
        assert_eq!(parsed.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_parse_insight_without_bullets_falls_back_to_raw() {
        let content = "Spending looks fine.\nKeep it up.\nNothing else to add.";
        let parsed = parse_insight_response(content, 950.0, 1000.0);
        assert_eq!(parsed.insight, "Spending looks fine. Keep it up.");
        assert_eq!(parsed.suggestions, vec![content.to_string()]);
        assert_eq!(parsed.sentiment, Sentiment::Warning);
    }

    #[test]
    fn test_parse_insight_single_line() {
        let parsed = parse_insight_response("Just one line.", 0.0, 100.0);
        assert_eq!(parsed.insight, "Just one line.");
        assert_eq!(parsed.suggestions, vec!["Just one line.".to_string()]);
    }

    #[test]
    fn test_negative_amounts_are_not_bullets() {
        assert_eq!(bullet_text("-5 dollars"), None);
        assert_eq!(bullet_text("- 5 dollars"), Some("5 dollars"));
        assert_eq!(bullet_text("3) Automate savings"), Some("Automate savings"));
    }

    #[test]
    fn test_parse_recommendations() {
        let content = "Here are some ideas:\n\n\
                       RECOMMENDATION: Cook at home on weeknights\n\
                       SAVINGS: $120\n\
                       DIFFICULTY: medium\n\n\
                       RECOMMENDATION: Cancel the second streaming service\n\
                       SAVINGS: $1,015.50\n\
                       DIFFICULTY: Easy\n";
        let recs = parse_savings_recommendations(content);

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].action, "Cook at home on weeknights");
        assert_eq!(recs[0].estimated_savings, Some(120.0));
        assert_eq!(recs[0].difficulty, Some(Difficulty::Medium));
        assert_eq!(recs[1].estimated_savings, Some(1015.5));
        assert_eq!(recs[1].difficulty, Some(Difficulty::Easy));
        assert!(recs.iter().all(SavingsRecommendation::is_structured));
    }

    #[test]
    fn test_earlier_partial_records_kept_trailing_partial_dropped() {
        let content = "RECOMMENDATION: Bike to work\n\
                       DIFFICULTY: hard\n\
                       RECOMMENDATION: Brew coffee at home\n\
                       SAVINGS: $40\n\
                       DIFFICULTY: easy\n\
                       RECOMMENDATION: Sell unused gear\n\
                       SAVINGS: $200";
        let recs = parse_savings_recommendations(content);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].action, "Bike to work");
        assert_eq!(recs[0].estimated_savings, None);
        assert_eq!(recs[0].difficulty, Some(Difficulty::Hard));
        assert!(!recs[0].is_structured());
        assert_eq!(recs[1].action, "Brew coffee at home");
        assert_eq!(recs[1].estimated_savings, Some(40.0));
    }

    #[test]
    fn test_lone_trailing_partial_falls_back_to_raw() {
        let content = "RECOMMENDATION: Sell unused gear\nSAVINGS: $200";
        let recs = parse_savings_recommendations(content);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].action, content);
        assert_eq!(recs[0].estimated_savings, None);
    }

    #[test]
    fn test_markdown_decorated_markers() {
        let content = "**RECOMMENDATION:** Meal prep on Sundays\n\
                       - **SAVINGS:** $85\n\
                       - **DIFFICULTY:** medium";
        let recs = parse_savings_recommendations(content);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].action, "Meal prep on Sundays");
        assert_eq!(recs[0].estimated_savings, Some(85.0));
    }

    #[test]
    fn test_fields_before_any_recommendation_ignored() {
        let content = "SAVINGS: $10\nDIFFICULTY: easy\nRECOMMENDATION: Walk more\nSAVINGS: $5\nDIFFICULTY: easy";
        let recs = parse_savings_recommendations(content);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].estimated_savings, Some(5.0));
    }

    #[test]
    fn test_unstructured_reply_degrades_to_raw() {
        let content = "  You could save by cooking more and cancelling subscriptions.  ";
        let recs = parse_savings_recommendations(content);
        assert_eq!(recs.len(), 1);
        assert_eq!(
            recs[0].action,
            "You could save by cooking more and cancelling subscriptions."
        );
        assert_eq!(recs[0].estimated_savings, None);
        assert_eq!(recs[0].difficulty, None);
        assert!(!recs[0].is_structured());
    }

    #[test]
    fn test_non_numeric_savings_leaves_record_incomplete() {
        let content = "RECOMMENDATION: Negotiate rent\nSAVINGS: varies\nDIFFICULTY: hard";
        let recs = parse_savings_recommendations(content);
        assert_eq!(recs.len(), 1);
        assert!(!recs[0].is_structured());
        assert_eq!(recs[0].action, content);
    }
}
