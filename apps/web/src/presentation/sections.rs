//! Section renderers. Each one turns a single decoded payload section into a
//! fragment, or nothing when the section has nothing worth showing.
//!
//! Renderers never see the rest of the payload, so a bad section can only
//! ever remove its own fragment.

use crate::models::analysis::{
    ContactInfo, EmploymentGap, ExperienceReport, GrammarIssue, SkillInventory, StructureReport,
};
use crate::models::view::{Fragment, FragmentItem, SectionKind};
use crate::presentation::format::format_category;

/// Grammar findings below this count are treated as noise and not shown.
pub const GRAMMAR_VISIBILITY_THRESHOLD: usize = 7;
/// How many grammar findings are listed before the "more" marker.
pub const GRAMMAR_PREVIEW_LIMIT: usize = 5;

pub const NO_CONTACT_PLACEHOLDER: &str = "No contact information detected";
pub const MORE_MARKER: &str = "...and more";

pub trait SectionRenderer {
    type Section;

    const KIND: SectionKind;
    const TITLE: &'static str;

    /// Items for the section, empty when nothing should be shown.
    fn items(&self, section: &Self::Section) -> Vec<FragmentItem>;

    fn render(&self, section: &Self::Section) -> Option<Fragment> {
        let items = self.items(section);
        if items.is_empty() {
            return None;
        }
        Some(Fragment {
            kind: Self::KIND,
            title: Self::TITLE.to_string(),
            items,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Contact
// ────────────────────────────────────────────────────────────────────────────

pub struct ContactRenderer;

impl SectionRenderer for ContactRenderer {
    type Section = ContactInfo;

    const KIND: SectionKind = SectionKind::Contact;
    const TITLE: &'static str = "Contact Information";

    fn items(&self, contact: &ContactInfo) -> Vec<FragmentItem> {
        let items: Vec<_> = contact
            .fields
            .iter()
            .filter_map(|(field, value)| {
                let value = value.as_deref()?.trim();
                (!value.is_empty()).then(|| FragmentItem::text(format_category(field), value))
            })
            .collect();

        if items.is_empty() {
            vec![FragmentItem::note(NO_CONTACT_PLACEHOLDER)]
        } else {
            items
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

pub struct SkillsRenderer;

impl SectionRenderer for SkillsRenderer {
    type Section = SkillInventory;

    const KIND: SectionKind = SectionKind::Skills;
    const TITLE: &'static str = "Skills";

    fn items(&self, skills: &SkillInventory) -> Vec<FragmentItem> {
        skills
            .categories
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(category, list)| FragmentItem::text(format_category(category), list.join(", ")))
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

pub struct ExperienceRenderer;

impl SectionRenderer for ExperienceRenderer {
    type Section = ExperienceReport;

    const KIND: SectionKind = SectionKind::Experience;
    const TITLE: &'static str = "Experience";

    fn items(&self, experience: &ExperienceReport) -> Vec<FragmentItem> {
        let mut items = Vec::new();
        if !experience.action_verbs.is_empty() {
            items.push(FragmentItem::text(
                "Action Verbs",
                experience.action_verbs.join(", "),
            ));
        }
        if !experience.achievements.is_empty() {
            items.push(FragmentItem::list(
                "Key Achievements",
                experience.achievements.clone(),
            ));
        }
        if !experience.gaps.is_empty() {
            items.push(FragmentItem::list(
                "Employment Gaps",
                experience.gaps.iter().map(format_gap).collect(),
            ));
        }
        items
    }
}

/// `start to end (duration)`. An empty end reads "present"; an empty duration
/// drops the parenthesis.
pub fn format_gap(gap: &EmploymentGap) -> String {
    let end = if gap.end.trim().is_empty() { "present" } else { gap.end.as_str() };
    if gap.duration.trim().is_empty() {
        format!("{} to {}", gap.start, end)
    } else {
        format!("{} to {} ({})", gap.start, end, gap.duration)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

pub struct EducationRenderer;

impl SectionRenderer for EducationRenderer {
    type Section = Vec<String>;

    const KIND: SectionKind = SectionKind::Education;
    const TITLE: &'static str = "Education";

    fn items(&self, entries: &Vec<String>) -> Vec<FragmentItem> {
        let entries: Vec<String> = entries
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
        if entries.is_empty() {
            return Vec::new();
        }
        vec![FragmentItem::list("Entries", entries)]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Structure
// ────────────────────────────────────────────────────────────────────────────

pub struct StructureRenderer;

impl SectionRenderer for StructureRenderer {
    type Section = StructureReport;

    const KIND: SectionKind = SectionKind::Structure;
    const TITLE: &'static str = "Resume Structure";

    fn items(&self, structure: &StructureReport) -> Vec<FragmentItem> {
        let mut items = vec![FragmentItem::text(
            "Section Order Score",
            format!("{}/100", structure.section_order_score),
        )];
        if !structure.sections.is_empty() {
            let sections: Vec<_> = structure
                .sections
                .iter()
                .map(|s| format_category(s))
                .collect();
            items.push(FragmentItem::text("Detected Sections", sections.join(", ")));
        }
        if !structure.format_issues.is_empty() {
            items.push(FragmentItem::list(
                "Format Issues",
                structure.format_issues.clone(),
            ));
        }
        items
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Grammar
// ────────────────────────────────────────────────────────────────────────────

pub struct GrammarRenderer;

impl SectionRenderer for GrammarRenderer {
    type Section = Vec<GrammarIssue>;

    const KIND: SectionKind = SectionKind::Grammar;
    const TITLE: &'static str = "Grammar Issues";

    fn items(&self, issues: &Vec<GrammarIssue>) -> Vec<FragmentItem> {
        if issues.len() < GRAMMAR_VISIBILITY_THRESHOLD {
            return Vec::new();
        }

        let mut items = vec![
            FragmentItem::note(format!("Found {} grammar issues", issues.len())),
            FragmentItem::list(
                "Top Issues",
                issues
                    .iter()
                    .take(GRAMMAR_PREVIEW_LIMIT)
                    .map(format_grammar_issue)
                    .collect(),
            ),
        ];
        if issues.len() > GRAMMAR_PREVIEW_LIMIT {
            items.push(FragmentItem::note(MORE_MARKER));
        }
        items
    }
}

pub fn format_grammar_issue(issue: &GrammarIssue) -> String {
    let context = issue.context.trim();
    if context.is_empty() {
        issue.message.clone()
    } else {
        format!("{}: \"{}\"", issue.message, context)
    }
}
