use serde::Serialize;

/// Which payload section a fragment was rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Score,
    Contact,
    Skills,
    Experience,
    Education,
    Structure,
    Grammar,
    Recommendations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ItemBody {
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FragmentItem {
    pub label: Option<String>,
    pub body: ItemBody,
}

impl FragmentItem {
    pub fn text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            body: ItemBody::Text(text.into()),
        }
    }

    pub fn list(label: impl Into<String>, entries: Vec<String>) -> Self {
        Self {
            label: Some(label.into()),
            body: ItemBody::List(entries),
        }
    }

    pub fn note(text: impl Into<String>) -> Self {
        Self {
            label: None,
            body: ItemBody::Text(text.into()),
        }
    }
}

/// Rendered output of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub kind: SectionKind,
    pub title: String,
    pub items: Vec<FragmentItem>,
}

/// Ordered fragments for one analysis. Rebuilt from scratch on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub fragments: Vec<Fragment>,
}

impl ViewModel {
    pub fn fragment(&self, kind: SectionKind) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.kind == kind)
    }

    pub fn kinds(&self) -> Vec<SectionKind> {
        self.fragments.iter().map(|f| f.kind).collect()
    }

    /// The filtered recommendation lines shown at the end of the report.
    pub fn recommendations(&self) -> &[String] {
        self.fragment(SectionKind::Recommendations)
            .and_then(|f| f.items.first())
            .and_then(|item| match &item.body {
                ItemBody::List(entries) => Some(entries.as_slice()),
                ItemBody::Text(_) => None,
            })
            .unwrap_or(&[])
    }
}
