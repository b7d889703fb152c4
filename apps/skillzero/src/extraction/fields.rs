//! Field extraction: finds the value that follows a label, either in a parsed
//! profile page (`dt`/`dd` pairs) or in the plain-text rendering of one.

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::extraction::ExtractionError;

/// Placeholder the site shows for an empty field. Never surfaces as a value.
pub const NOT_REGISTERED: &str = "未登録";

pub fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// Normalizes a raw extracted value: trims it and maps blank or the
/// "not registered" placeholder to `None`.
pub fn clean_value(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value == NOT_REGISTERED {
        None
    } else {
        Some(value.to_string())
    }
}

/// Concatenated text of an element, with `<br>` rendered as a line break so that
/// multi-paragraph fields keep their blank lines.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Markup mode
// ────────────────────────────────────────────────────────────────────────────

/// Finds the `dt` whose text equals `label` and returns the text of the `dd`
/// immediately after it.
pub fn extract_markup_field(doc: &Html, label: &str) -> Result<Option<String>, ExtractionError> {
    let dt = selector("dt")?;

    let value = doc
        .select(&dt)
        .find(|term| element_text(*term).trim() == label)
        .and_then(|term| term.next_siblings().find_map(ElementRef::wrap))
        .filter(|definition| definition.value().name() == "dd")
        .and_then(|definition| clean_value(&element_text(definition)));

    Ok(value)
}

// ────────────────────────────────────────────────────────────────────────────
// Plain-text mode
// ────────────────────────────────────────────────────────────────────────────

/// One labelled span of a plain-text profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'t> {
    pub label: &'t str,
    pub body: &'t str,
}

/// Splits plain text into labelled sections in a single scan.
///
/// A label counts only when it sits alone on its line. Each section's body runs
/// from the line after its label to the start of the next label line, or to the
/// end of the text. Adding a label only means adding it to the list.
#[derive(Debug, Clone)]
pub struct SectionSplitter {
    pattern: Regex,
}

impl SectionSplitter {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Result<Self, ExtractionError> {
        let alternation = labels
            .iter()
            .map(|l| regex::escape(l.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?m)^[ \t]*({alternation})[ \t]*\r?\n"))?;
        Ok(Self { pattern })
    }

    pub fn split<'t>(&self, text: &'t str) -> Vec<Section<'t>> {
        let marks: Vec<_> = self
            .pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let label = caps.get(1)?;
                Some((whole.start(), whole.end(), label.as_str()))
            })
            .collect();

        marks
            .iter()
            .enumerate()
            .map(|(i, &(_, body_start, label))| {
                let body_end = marks.get(i + 1).map_or(text.len(), |next| next.0);
                Section {
                    label,
                    body: &text[body_start..body_end],
                }
            })
            .collect()
    }
}
