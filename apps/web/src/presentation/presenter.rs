use tracing::{debug, warn};

use crate::models::analysis::{AnalysisResult, Section};
use crate::models::view::{Fragment, FragmentItem, ItemBody, SectionKind, ViewModel};
use crate::presentation::recommendations::{filter_recommendations, RecommendationContext};
use crate::presentation::sections::{
    ContactRenderer, EducationRenderer, ExperienceRenderer, GrammarRenderer, SectionRenderer,
    SkillsRenderer, StructureRenderer,
};

/// Builds the view model for one analysis result.
///
/// Order: score, contact, skills, experience, education, structure, grammar,
/// recommendations. Any section may be missing except score and
/// recommendations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultPresenter;

impl ResultPresenter {
    pub fn present(&self, result: &AnalysisResult) -> ViewModel {
        let mut fragments = vec![score_fragment(result)];

        fragments.extend(render_section(&ContactRenderer, &result.contact));
        fragments.extend(render_section(&SkillsRenderer, &result.skills));
        fragments.extend(render_section(&ExperienceRenderer, &result.experience));
        fragments.extend(render_section(&EducationRenderer, &result.education));
        fragments.extend(render_section(&StructureRenderer, &result.structure));
        fragments.extend(render_section(&GrammarRenderer, &result.grammar));

        let context = RecommendationContext {
            gaps_rendered: result.has_gaps(),
            grammar_issue_count: result.grammar_issue_count(),
        };
        let raw = result
            .recommendations
            .present()
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let recommendations = filter_recommendations(raw, &context);
        debug!(
            "Recommendations: {} received, {} shown",
            raw.len(),
            recommendations.len()
        );
        fragments.push(Fragment {
            kind: SectionKind::Recommendations,
            title: "Recommendations".to_string(),
            items: vec![FragmentItem {
                label: None,
                body: ItemBody::List(recommendations),
            }],
        });

        let view = ViewModel { fragments };
        debug!("Presented sections: {:?}", view.kinds());
        view
    }
}

fn score_fragment(result: &AnalysisResult) -> Fragment {
    let mut items = vec![FragmentItem::text("Score", format!("{}/100", result.score))];
    if let Some(words) = result.word_count {
        items.push(FragmentItem::text("Word Count", words.to_string()));
    }
    Fragment {
        kind: SectionKind::Score,
        title: "Resume Score".to_string(),
        items,
    }
}

fn render_section<R: SectionRenderer>(
    renderer: &R,
    section: &Section<R::Section>,
) -> Option<Fragment> {
    match section {
        Section::Absent => None,
        Section::Present(value) => renderer.render(value),
        Section::Malformed(reason) => {
            warn!("Omitting {:?} section: {reason}", R::KIND);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::recommendations::{ALL_FILTERED_FALLBACK, NO_RECOMMENDATIONS_FALLBACK};
    use serde_json::{json, Value};

    fn present(payload: Value) -> ViewModel {
        let result = AnalysisResult::from_value(payload).unwrap();
        ResultPresenter.present(&result)
    }

    fn scenario_payload() -> Value {
        json!({
            "score": 85,
            "contact": { "email": "a@b.com", "phone": "" },
            "skills": { "languages": ["Python"] },
            "grammar": [
                { "message": "m1", "context": "c1" },
                { "message": "m2", "context": "c2" },
                { "message": "m3", "context": "c3" }
            ],
            "recommendations": [
                "Fix employment gaps",
                "Fix grammar/spelling issues",
                "Add metrics"
            ]
        })
    }

    #[test]
    fn test_scenario_without_gaps() {
        let view = present(scenario_payload());
        assert_eq!(
            view.recommendations(),
            &["Fix employment gaps".to_string(), "Add metrics".to_string()]
        );
        assert!(view.fragment(SectionKind::Grammar).is_none());
        let contact = view.fragment(SectionKind::Contact).unwrap();
        assert_eq!(contact.items, vec![FragmentItem::text("Email", "a@b.com")]);
        assert_eq!(
            view.kinds(),
            vec![
                SectionKind::Score,
                SectionKind::Contact,
                SectionKind::Skills,
                SectionKind::Recommendations
            ]
        );
    }

    #[test]
    fn test_scenario_with_gaps() {
        let mut payload = scenario_payload();
        payload["experience"] = json!({
            "gaps": [{ "start": "2019", "end": "2020", "duration": "1 year" }]
        });
        let view = present(payload);
        assert_eq!(view.recommendations(), &["Add metrics".to_string()]);
        assert!(view.fragment(SectionKind::Experience).is_some());
    }

    #[test]
    fn test_plural_gap_recommendations_dropped_with_rendered_gaps() {
        let view = present(json!({
            "experience": {
                "gaps": [{ "start": "2019", "end": "2020", "duration": "1 year" }]
            },
            "recommendations": [
                "Explain the gaps between jobs",
                "Address gaps in work history",
                "Explain resume gaps",
                "Add metrics"
            ]
        }));
        assert_eq!(view.recommendations(), &["Add metrics".to_string()]);
    }

    #[test]
    fn test_ongoing_gap_keeps_experience_fragment() {
        let view = present(json!({
            "experience": {
                "action_verbs": ["Led"],
                "achievements": ["Cut costs 20%"],
                "gaps": [{ "start": "2023-01", "end": null, "duration": "ongoing" }]
            },
            "recommendations": ["Explain the employment gap", "Add metrics"]
        }));
        let experience = view.fragment(SectionKind::Experience).unwrap();
        assert_eq!(experience.items.len(), 3);
        assert_eq!(
            experience.items[2],
            FragmentItem::list("Employment Gaps", vec!["2023-01 to present (ongoing)".into()])
        );
        assert_eq!(view.recommendations(), &["Add metrics".to_string()]);
    }

    #[test]
    fn test_stray_skill_value_keeps_skills_fragment() {
        let view = present(json!({
            "skills": { "programming": ["Python", 3], "cloud": ["aws"] }
        }));
        let skills = view.fragment(SectionKind::Skills).unwrap();
        assert_eq!(skills.items.len(), 2);
    }

    #[test]
    fn test_full_payload_order() {
        let issues: Vec<Value> = (0..8)
            .map(|i| json!({ "message": format!("m{i}"), "context": "c" }))
            .collect();
        let view = present(json!({
            "score": 90,
            "word_count": 512,
            "contact": { "email": "a@b.com" },
            "skills": { "cloud": ["aws"] },
            "experience": { "action_verbs": ["Led"] },
            "education": ["MSc"],
            "structure": { "section_order_score": 75, "sections": ["summary"] },
            "grammar": issues,
            "recommendations": ["Add metrics"]
        }));
        assert_eq!(
            view.kinds(),
            vec![
                SectionKind::Score,
                SectionKind::Contact,
                SectionKind::Skills,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Structure,
                SectionKind::Grammar,
                SectionKind::Recommendations
            ]
        );
        let score = view.fragment(SectionKind::Score).unwrap();
        assert_eq!(
            score.items,
            vec![
                FragmentItem::text("Score", "90/100"),
                FragmentItem::text("Word Count", "512")
            ]
        );
    }

    #[test]
    fn test_empty_payload_degrades_to_score_and_fallback() {
        let view = present(json!({}));
        assert_eq!(
            view.kinds(),
            vec![SectionKind::Score, SectionKind::Recommendations]
        );
        assert_eq!(view.recommendations(), &[NO_RECOMMENDATIONS_FALLBACK.to_string()]);
        assert_eq!(
            view.fragment(SectionKind::Score).unwrap().items[0].body,
            ItemBody::Text("0/100".into())
        );
    }

    #[test]
    fn test_malformed_sections_are_isolated() {
        let view = present(json!({
            "score": 50,
            "contact": "oops",
            "skills": { "tools": ["git"] },
            "experience": ["legacy", "sentences"],
            "structure": "flat",
            "grammar": "many",
            "recommendations": ["Fix grammar"]
        }));
        assert_eq!(
            view.kinds(),
            vec![
                SectionKind::Score,
                SectionKind::Skills,
                SectionKind::Recommendations
            ]
        );
        assert_eq!(view.recommendations(), &[ALL_FILTERED_FALLBACK.to_string()]);
    }

    #[test]
    fn test_present_is_deterministic() {
        let result = AnalysisResult::from_value(scenario_payload()).unwrap();
        assert_eq!(ResultPresenter.present(&result), ResultPresenter.present(&result));
    }
}
