//! Recommendation filtering.
//!
//! Drops recommendations that repeat something another section already shows
//! (employment gaps) and those about grammar or spelling, which are never
//! surfaced as recommendations. Pure: same input, same output.

use tracing::trace;

/// Shown when every recommendation was filtered out.
pub const ALL_FILTERED_FALLBACK: &str = "Your resume looks good! Only minor improvements needed.";
/// Shown when the service sent no recommendations at all.
pub const NO_RECOMMENDATIONS_FALLBACK: &str = "No significant issues found. Great job!";

const GAP_WORDS: &[&str] = &["gap", "gaps"];

/// Words that, right before "gap", name something other than time out of work.
const NON_EMPLOYMENT_QUALIFIERS: &[&str] = &[
    "skill",
    "skills",
    "knowledge",
    "keyword",
    "keywords",
    "competency",
];

const GRAMMAR_PHRASES: &[&str] = &["grammar", "grammatical", "spelling", "misspell", "typo"];

/// Cross-section facts the filter needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationContext {
    /// Employment gaps are already listed in the Experience fragment.
    pub gaps_rendered: bool,
    /// Number of grammar findings in the payload. Grammar recommendations are
    /// dropped regardless of this value.
    pub grammar_issue_count: usize,
}

/// True when "gap" or "gaps" appears as a whole word and is not qualified as a
/// skill or keyword gap.
pub fn mentions_gaps(recommendation: &str) -> bool {
    let lowered = recommendation.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    words.iter().enumerate().any(|(i, word)| {
        GAP_WORDS.contains(word)
            && !(i > 0 && NON_EMPLOYMENT_QUALIFIERS.contains(&words[i - 1]))
    })
}

pub fn mentions_grammar(recommendation: &str) -> bool {
    contains_any(recommendation, GRAMMAR_PHRASES)
}

/// Filters recommendations in order and substitutes a fallback line when the
/// result would be empty.
pub fn filter_recommendations(
    recommendations: &[String],
    context: &RecommendationContext,
) -> Vec<String> {
    if recommendations.is_empty() {
        return vec![NO_RECOMMENDATIONS_FALLBACK.to_string()];
    }

    let kept: Vec<String> = recommendations
        .iter()
        .filter(|r| !(context.gaps_rendered && mentions_gaps(r)))
        .filter(|r| !mentions_grammar(r))
        .cloned()
        .collect();

    trace!(
        "Recommendation filter: kept {} of {} (gaps_rendered={}, grammar_issues={})",
        kept.len(),
        recommendations.len(),
        context.gaps_rendered,
        context.grammar_issue_count
    );

    if kept.is_empty() {
        vec![ALL_FILTERED_FALLBACK.to_string()]
    } else {
        kept
    }
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    let lower = text.to_lowercase();
    phrases.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_gap_recommendation_kept_without_rendered_gaps() {
        let input = recs(&["Fix employment gaps", "Add metrics"]);
        let out = filter_recommendations(&input, &RecommendationContext::default());
        assert_eq!(out, input);
    }

    #[test]
    fn test_gap_recommendation_dropped_when_gaps_rendered() {
        let input = recs(&["Explain the gap in your employment history", "Add metrics"]);
        let ctx = RecommendationContext {
            gaps_rendered: true,
            grammar_issue_count: 0,
        };
        assert_eq!(filter_recommendations(&input, &ctx), recs(&["Add metrics"]));
    }

    #[test]
    fn test_grammar_recommendation_always_dropped() {
        let input = recs(&["Fix grammar/spelling issues", "Watch for TYPOS", "Add metrics"]);
        for count in [0, 3, 50] {
            let ctx = RecommendationContext {
                gaps_rendered: false,
                grammar_issue_count: count,
            };
            assert_eq!(filter_recommendations(&input, &ctx), recs(&["Add metrics"]));
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let input = recs(&["C", "Fix spelling", "A", "B"]);
        let out = filter_recommendations(&input, &RecommendationContext::default());
        assert_eq!(out, recs(&["C", "A", "B"]));
    }

    #[test]
    fn test_fallbacks_are_distinct() {
        let empty = filter_recommendations(&[], &RecommendationContext::default());
        let filtered = filter_recommendations(
            &recs(&["Fix grammar"]),
            &RecommendationContext::default(),
        );
        assert_eq!(empty, recs(&[NO_RECOMMENDATIONS_FALLBACK]));
        assert_eq!(filtered, recs(&[ALL_FILTERED_FALLBACK]));
        assert_ne!(empty, filtered);
    }

    #[test]
    fn test_any_gap_wording_dropped_when_gaps_rendered() {
        let ctx = RecommendationContext {
            gaps_rendered: true,
            grammar_issue_count: 0,
        };
        let input = recs(&[
            "Explain the gaps between jobs",
            "Address gaps in work history",
            "Explain resume gaps.",
            "Account for the 2019-2020 gap",
            "Add metrics",
        ]);
        assert_eq!(filter_recommendations(&input, &ctx), recs(&["Add metrics"]));
    }

    #[test]
    fn test_gap_must_be_a_whole_word() {
        assert!(!mentions_gaps("Use Gapminder-style charts"));
        assert!(!mentions_gaps("Mention your gaming projects"));
        assert!(mentions_gaps("Gaps: explain them"));
    }

    #[test]
    fn test_unrelated_gap_wording_is_kept() {
        let ctx = RecommendationContext {
            gaps_rendered: true,
            grammar_issue_count: 0,
        };
        let input = recs(&[
            "Close the skill gap for cloud roles",
            "Fill keyword gaps for ATS",
        ]);
        assert_eq!(filter_recommendations(&input, &ctx), input);
    }
}
