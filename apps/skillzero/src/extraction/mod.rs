// Profile extraction: labelled-field lookup, bio sub-sections, and the two profile builders.
// Everything here is best-effort; a field that cannot be read is left absent.

pub mod bio;
pub mod builder;
pub mod fields;
pub mod page;

use thiserror::Error;

pub use builder::{build_from_markup, build_from_text};
pub use page::is_profile_page;

/// Failure of a single extraction step. Never fatal to the profile as a whole.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid label pattern: {0}")]
    Pattern(#[from] regex::Error),
}
