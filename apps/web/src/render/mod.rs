//! HTML rendering of the presentation surface.
//!
//! Produces one self-contained page: the upload form, the error slot and the
//! report fragments in view-model order. Every payload string is escaped.

use std::fmt::Write as _;

use crate::controller::validation::ALLOWED_EXTENSIONS;
use crate::controller::SurfaceSnapshot;
use crate::models::view::{Fragment, FragmentItem, ItemBody, SectionKind, ViewModel};

pub fn render_page(snapshot: &SurfaceSnapshot) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Analyzer</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        <h1>Resume Analyzer</h1>
        {form}
        {error}
        {report}
    </div>
</body>
</html>"#,
        css = inline_css(),
        form = render_form(snapshot),
        error = render_error(snapshot.error.as_deref()),
        report = snapshot
            .report
            .as_ref()
            .map(render_report)
            .unwrap_or_default(),
    )
}

fn render_form(snapshot: &SurfaceSnapshot) -> String {
    let accept = ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"<form class="upload" action="/report" method="post" enctype="multipart/form-data">
            <input type="file" id="resumeFile" name="resume" accept="{accept}">
            <button type="submit" id="analyzeBtn"{disabled}>{label}</button>
        </form>"#,
        disabled = if snapshot.trigger_enabled { "" } else { " disabled" },
        label = escape(&snapshot.trigger_label),
    )
}

fn render_error(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(
            r#"<div id="error-message" class="error">{}</div>"#,
            escape(message)
        ),
        None => String::new(),
    }
}

pub fn render_report(view: &ViewModel) -> String {
    let mut out = String::from(r#"<div id="results" class="results">"#);
    for fragment in &view.fragments {
        out.push_str(&render_fragment(fragment));
    }
    out.push_str("</div>");
    out
}

fn render_fragment(fragment: &Fragment) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<section class="card" id="{}"><h2>{}</h2>"#,
        section_id(fragment.kind),
        escape(&fragment.title)
    );
    for item in &fragment.items {
        out.push_str(&render_item(fragment.kind, item));
    }
    out.push_str("</section>");
    out
}

fn render_item(kind: SectionKind, item: &FragmentItem) -> String {
    let mut out = String::from(r#"<div class="item">"#);
    if let Some(label) = &item.label {
        let _ = write!(out, "<strong>{}:</strong>", escape(label));
    }
    let headline = kind == SectionKind::Score && item.label.as_deref() == Some("Score");
    match &item.body {
        ItemBody::Text(text) if headline => {
            let _ = write!(out, r#"<p class="score">{}</p>"#, escape(text));
        }
        ItemBody::Text(text) => {
            let _ = write!(out, "<p>{}</p>", escape(text));
        }
        ItemBody::List(entries) => {
            out.push_str("<ul>");
            for entry in entries {
                let _ = write!(out, r#"<li class="suggestion-item">{}</li>"#, escape(entry));
            }
            out.push_str("</ul>");
        }
    }
    out.push_str("</div>");
    out
}

fn section_id(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Score => "score",
        SectionKind::Contact => "contact",
        SectionKind::Skills => "skills",
        SectionKind::Experience => "experience",
        SectionKind::Education => "education",
        SectionKind::Structure => "structure",
        SectionKind::Grammar => "grammar",
        SectionKind::Recommendations => "suggestions",
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn inline_css() -> &'static str {
    r#"
body { font-family: system-ui, sans-serif; background: #f5f6f8; margin: 0; }
.container { max-width: 860px; margin: 0 auto; padding: 2rem 1rem; }
.upload { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
.error { background: #fdecea; color: #b3261e; padding: .75rem 1rem; border-radius: 6px; }
.card { background: #fff; border-radius: 8px; padding: 1rem 1.25rem; margin: 1rem 0; }
.score { font-size: 2.5rem; font-weight: 700; margin: .25rem 0; }
.item { margin: .5rem 0; }
.suggestion-item { margin: .25rem 0; }
button[disabled] { opacity: .6; cursor: progress; }
"#
}
