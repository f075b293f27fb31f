//! Payload model for the external analysis service.
//!
//! Every section is decoded on its own. A section that is missing or `null`
//! becomes [`Section::Absent`]; a section with an unexpected shape becomes
//! [`Section::Malformed`] and is later omitted from the report instead of
//! failing the whole payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("analysis payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// One decoded section of the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Absent,
    Present(T),
    Malformed(String),
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Section::Absent
    }
}

impl<T> Section<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            Section::Present(value) => Some(value),
            _ => None,
        }
    }
}

/// Contact fields in payload order. `None` means the service found nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactInfo {
    pub fields: Vec<(String, Option<String>)>,
}

impl<'de> Deserialize<'de> for ContactInfo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let fields = map
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::Null => None,
                    Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                };
                (name, value)
            })
            .collect();
        Ok(ContactInfo { fields })
    }
}

/// Skill categories in payload order. A category whose value is not a list
/// of strings keeps only its string entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillInventory {
    pub categories: Vec<(String, Vec<String>)>,
}

impl<'de> Deserialize<'de> for SkillInventory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let mut categories = Vec::with_capacity(map.len());
        for (category, value) in map {
            let skills = strings_from(&category, value);
            categories.push((category, skills));
        }
        Ok(SkillInventory { categories })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentGap {
    #[serde(default, deserialize_with = "lenient_text")]
    pub start: String,
    /// Empty for a gap that is still ongoing.
    #[serde(default, deserialize_with = "lenient_text")]
    pub end: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceReport {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub action_verbs: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub achievements: Vec<String>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub gaps: Vec<EmploymentGap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureReport {
    #[serde(default, deserialize_with = "lenient_score")]
    pub section_order_score: u32,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub sections: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub format_issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarIssue {
    pub message: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub context: String,
}

/// The analysis result as received. Immutable once decoded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct AnalysisResult {
    pub score: u32,
    pub word_count: Option<u64>,
    pub contact: Section<ContactInfo>,
    pub skills: Section<SkillInventory>,
    pub experience: Section<ExperienceReport>,
    pub education: Section<Vec<String>>,
    pub structure: Section<StructureReport>,
    pub grammar: Section<Vec<GrammarIssue>>,
    pub recommendations: Section<Vec<String>>,
    pub error: Option<String>,
}

impl AnalysisResult {
    /// Decodes a payload object section by section.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let mut map = match value {
            Value::Object(map) => map,
            other => return Err(PayloadError::NotAnObject(json_kind(&other))),
        };

        Ok(AnalysisResult {
            score: map.remove("score").map(|v| score_from(&v)).unwrap_or(0),
            word_count: map.remove("word_count").and_then(|v| v.as_u64()),
            contact: section("contact", take_first(&mut map, &["contact", "contact_info"])),
            skills: section("skills", take_first(&mut map, &["skills", "skills_found"])),
            experience: section("experience", map.remove("experience")),
            education: entries_section("education", map.remove("education")),
            structure: section("structure", map.remove("structure")),
            grammar: entries_section("grammar", map.remove("grammar")),
            recommendations: entries_section(
                "recommendations",
                take_first(&mut map, &["recommendations", "suggestions"]),
            ),
            error: match map.remove("error") {
                Some(Value::String(message)) => Some(message),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            },
        })
    }

    /// True when employment gaps will be shown in the Experience fragment.
    pub fn has_gaps(&self) -> bool {
        self.experience
            .present()
            .is_some_and(|experience| !experience.gaps.is_empty())
    }

    pub fn grammar_issue_count(&self) -> usize {
        self.grammar.present().map_or(0, Vec::len)
    }
}

impl TryFrom<Value> for AnalysisResult {
    type Error = PayloadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        AnalysisResult::from_value(value)
    }
}

/// Removes every alias from the map and keeps the first one that is set.
fn take_first(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    let mut found = None;
    for key in keys {
        if let Some(value) = map.remove(*key) {
            if found.is_none() {
                found = Some(value);
            }
        }
    }
    found
}

fn section<T: DeserializeOwned>(name: &str, value: Option<Value>) -> Section<T> {
    match value {
        None | Some(Value::Null) => Section::Absent,
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => Section::Present(parsed),
            Err(e) => {
                warn!("Malformed '{name}' section in analysis payload: {e}");
                Section::Malformed(e.to_string())
            }
        },
    }
}

/// List sections: a non-list is malformed, a bad entry only drops itself.
fn entries_section<T: DeserializeOwned>(name: &str, value: Option<Value>) -> Section<Vec<T>> {
    match value {
        None | Some(Value::Null) => Section::Absent,
        Some(Value::Array(items)) => Section::Present(entries_from(name, items)),
        Some(other) => {
            warn!(
                "Malformed '{name}' section in analysis payload: expected a list, got {}",
                json_kind(&other)
            );
            Section::Malformed(format!("expected a list, got {}", json_kind(&other)))
        }
    }
}

fn entries_from<T: DeserializeOwned>(name: &str, items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping malformed '{name}' entry: {e}");
                None
            }
        })
        .collect()
}

/// Keeps the string entries of a list. Anything else yields no entries.
fn strings_from(name: &str, value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                other => {
                    warn!("Skipping non-string '{name}' entry: {other}");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            warn!("Expected a list for '{name}', got {}", json_kind(&other));
            Vec::new()
        }
    }
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(strings_from("list", Value::deserialize(deserializer)?))
}

fn lenient_entries<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(entries_from("list", items)),
        _ => Ok(Vec::new()),
    }
}

/// `null` becomes empty text; numbers and booleans keep their JSON spelling.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Rounds any JSON number into 0..=100. Non-numbers count as 0.
fn score_from(value: &Value) -> u32 {
    value
        .as_f64()
        .map(|n| n.round().clamp(0.0, 100.0) as u32)
        .unwrap_or(0)
}

fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(score_from(&value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
