//! Profile-page check for fetched documents.
//!
//! A login wall or an error page still comes back as `200 OK` HTML, so the
//! document is inspected before anything is extracted from it.

use scraper::Html;

use crate::extraction::fields::{element_text, selector};
use crate::extraction::ExtractionError;
use crate::models::ProfileField;

/// Minimum visible text length for a structureless page to be accepted.
const MIN_TEXT_CHARS: usize = 100;

/// Which indicator accepted the page, or why it was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCheck {
    TitleMentionsProfile,
    HasProfileHeading,
    HasBioField,
    HasDefinitionList,
    HasEnoughText,
    SignInPage,
    ErrorPage,
    TooLittleContent,
}

impl PageCheck {
    pub fn is_profile(self) -> bool {
        matches!(
            self,
            PageCheck::TitleMentionsProfile
                | PageCheck::HasProfileHeading
                | PageCheck::HasBioField
                | PageCheck::HasDefinitionList
                | PageCheck::HasEnoughText
        )
    }
}

/// Classifies a fetched document. Structural indicators win; a page without
/// any is accepted only when it has enough text and does not look like a
/// sign-in or error page.
pub fn is_profile_page(html: &str, final_url: &str) -> Result<PageCheck, ExtractionError> {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&selector("title")?)
        .next()
        .map(element_text)
        .unwrap_or_default();
    if title.contains("プロフィール") {
        return Ok(PageCheck::TitleMentionsProfile);
    }

    if doc.select(&selector("h3.content_title")?).next().is_some() {
        return Ok(PageCheck::HasProfileHeading);
    }

    let dt = selector("dt")?;
    let bio_label = ProfileField::Bio.label();
    if doc
        .select(&dt)
        .any(|term| element_text(term).trim() == bio_label)
    {
        return Ok(PageCheck::HasBioField);
    }

    if doc.select(&dt).next().is_some() && doc.select(&selector("dd")?).next().is_some() {
        return Ok(PageCheck::HasDefinitionList);
    }

    let text = page_text(&doc);
    let url = final_url.to_lowercase();
    if url.contains("signin") || url.contains("auth") || text.contains("ログイン") {
        return Ok(PageCheck::SignInPage);
    }
    if text.to_lowercase().contains("error") || text.contains("エラー") {
        return Ok(PageCheck::ErrorPage);
    }
    if text.trim().chars().count() > MIN_TEXT_CHARS {
        return Ok(PageCheck::HasEnoughText);
    }

    Ok(PageCheck::TooLittleContent)
}

/// All visible text of a document.
pub fn page_text(doc: &Html) -> String {
    element_text(doc.root_element())
}
