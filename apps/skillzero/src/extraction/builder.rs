//! Profile building: turns a fetched profile page or a pasted profile text into
//! one `ProfileInfo`.
//!
//! Markup flow: username → bio (+ marker sub-sections) → basic fields → skills/duration.
//! Text flow:   username → every labelled section → keyword-line work history.
//!
//! Each step runs on its own; a failing step is logged and the rest still run.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::{debug, info, warn};

use crate::extraction::bio::{split_bio_markers, work_history_lines};
use crate::extraction::fields::{
    clean_value, element_text, extract_markup_field, selector, SectionSplitter,
};
use crate::extraction::page::page_text;
use crate::extraction::ExtractionError;
use crate::models::{ProfileField, ProfileInfo, ProfileSource, WorkHistory};

/// Heading suffix meaning "'s profile".
const PROFILE_SUFFIX: &str = "さんのプロフィール";
/// Usernames at or above this length are assumed to be a mis-parsed heading.
const MAX_USERNAME_CHARS: usize = 50;

/// The whole heading line, so names containing spaces are kept intact.
static USERNAME_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(&format!(r"(?m)^[ \t]*(.+?){PROFILE_SUFFIX}[ \t]*\r?$")));

static SECTION_SPLITTER: Lazy<Result<SectionSplitter, ExtractionError>> = Lazy::new(|| {
    let labels: Vec<&str> = ProfileField::ALL.iter().map(|f| f.label()).collect();
    SectionSplitter::new(&labels)
});

type MarkupStep = fn(&Html, &mut ProfileInfo) -> Result<(), ExtractionError>;

// ────────────────────────────────────────────────────────────────────────────
// From markup
// ────────────────────────────────────────────────────────────────────────────

/// Builds a profile from a fetched profile page.
///
/// Returns `None` for an empty document. A page that yields no real attribute
/// is still returned, flagged `partial_extraction` with its sizes attached.
pub fn build_from_markup(html: &str, url: &str, extracted_at: &str) -> Option<ProfileInfo> {
    if html.trim().is_empty() {
        return None;
    }

    let doc = Html::parse_document(html);
    let mut info = ProfileInfo::new(
        Some(url.to_string()),
        extracted_at.to_string(),
        ProfileSource::Markup,
    );

    let steps: [(&str, MarkupStep); 4] = [
        ("username", extract_username),
        ("bio", extract_bio_and_related),
        ("basic_info", extract_basic_info),
        ("skills_and_duration", extract_skills_and_duration),
    ];
    for (name, step) in steps {
        if let Err(e) = step(&doc, &mut info) {
            warn!("Profile extraction step '{name}' failed for {url}: {e}");
        }
    }

    if info.is_valid() {
        info!(
            "Extracted {} profile fields from {url}",
            info.extracted_count()
        );
    } else {
        warn!("Profile extraction was partial for {url}");
        info.partial_extraction = true;
        info.html_content_length = Some(html.len());
        info.html_text_length = Some(page_text(&doc).chars().count());
    }

    Some(info)
}

fn extract_username(doc: &Html, info: &mut ProfileInfo) -> Result<(), ExtractionError> {
    let heading = selector("h3.content_title")?;
    if let Some(el) = doc.select(&heading).next() {
        let text = element_text(el);
        let name = text.replace(PROFILE_SUFFIX, "");
        let name = name.trim();
        if !name.is_empty() && name.chars().count() < MAX_USERNAME_CHARS {
            debug!("username: {name}");
            info.username = Some(name.to_string());
        }
    }
    Ok(())
}

fn extract_bio_and_related(doc: &Html, info: &mut ProfileInfo) -> Result<(), ExtractionError> {
    let Some(bio) = extract_markup_field(doc, ProfileField::Bio.label())? else {
        return Ok(());
    };

    let sections = split_bio_markers(&bio);
    if let Some(work) = sections.work {
        info.work_history = WorkHistory(vec![work]);
    }
    if sections.likes.is_some() {
        info.likes = sections.likes;
    }
    if sections.strengths.is_some() {
        info.strengths = sections.strengths;
    }

    debug!("bio: {} chars", bio.chars().count());
    info.bio = Some(bio);
    Ok(())
}

fn extract_basic_info(doc: &Html, info: &mut ProfileInfo) -> Result<(), ExtractionError> {
    fill_labelled_fields(doc, info, &ProfileField::BASIC, extract_markup_field);
    Ok(())
}

fn extract_skills_and_duration(doc: &Html, info: &mut ProfileInfo) -> Result<(), ExtractionError> {
    fill_labelled_fields(
        doc,
        info,
        &[ProfileField::Skills, ProfileField::Duration],
        extract_markup_field,
    );
    Ok(())
}

/// Reads each field on its own; a field that fails is logged and the others still run.
fn fill_labelled_fields<F>(doc: &Html, info: &mut ProfileInfo, fields: &[ProfileField], lookup: F)
where
    F: Fn(&Html, &str) -> Result<Option<String>, ExtractionError>,
{
    for &field in fields {
        match lookup(doc, field.label()) {
            Ok(Some(value)) => {
                debug!("{}: {}", field.key(), preview(&value));
                *field.slot_mut(info) = Some(value);
            }
            Ok(None) => {}
            Err(e) => warn!("Could not read profile field '{}': {e}", field.key()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// From pasted text
// ────────────────────────────────────────────────────────────────────────────

/// Builds a profile from a pasted plain-text profile page.
///
/// Returns `None` for blank input. Otherwise every text attribute is present,
/// empty when its section was not found, and `work_history` is always a list.
pub fn build_from_text(
    text: &str,
    url: Option<&str>,
    extracted_at: &str,
) -> Option<ProfileInfo> {
    if text.trim().is_empty() {
        return None;
    }

    let mut info = ProfileInfo::new(
        url.filter(|u| !u.trim().is_empty()).map(String::from),
        extracted_at.to_string(),
        ProfileSource::Text,
    );

    info.username = Some(match USERNAME_PATTERN.as_ref() {
        Ok(pattern) => pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        Err(e) => {
            warn!("Username pattern unavailable: {e}");
            String::new()
        }
    });

    match SECTION_SPLITTER.as_ref() {
        Ok(splitter) => {
            let sections = splitter.split(text);
            for field in ProfileField::ALL {
                let value = sections
                    .iter()
                    .find(|s| s.label == field.label())
                    .and_then(|s| clean_value(s.body))
                    .unwrap_or_default();
                *field.slot_mut(&mut info) = Some(value);
            }
        }
        Err(e) => {
            warn!("Section labels unavailable, profile text left unparsed: {e}");
            for field in ProfileField::ALL {
                *field.slot_mut(&mut info) = Some(String::new());
            }
        }
    }
    info.strengths = Some(String::new());

    let bio = info.bio.as_deref().unwrap_or_default();
    info.work_history = WorkHistory(work_history_lines(bio));

    info!(
        "Extracted {} profile fields from pasted text",
        info.extracted_count()
    );
    Some(info)
}

fn preview(value: &str) -> String {
    value.chars().take(50).collect()
}
