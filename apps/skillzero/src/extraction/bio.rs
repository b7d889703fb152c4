//! Bio sub-extraction: pulls work, likes and strengths out of a free-text bio.

pub const WORK_MARKER: &str = "仕事💼：";
pub const LIKES_MARKER: &str = "好きなこと🌟：";
pub const STRENGTHS_MARKER: &str = "得意なこと🧠：";

/// A bio line mentioning any of these is treated as work history.
pub const WORK_KEYWORDS: [&str; 9] = [
    "勤務", "転職", "就職", "仕事", "職歴", "経験", "働い", "務め", "在籍",
];

/// Sub-sections found behind the emoji markers of a bio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BioSections {
    /// Keeps its `仕事💼：` prefix, as the line reads in the bio.
    pub work: Option<String>,
    pub likes: Option<String>,
    pub strengths: Option<String>,
}

/// Marker-based split used for bios read from a profile page.
///
/// - work: from its marker to the next blank line or the end of the bio.
/// - likes: from its marker to the strengths marker; needs both markers.
/// - strengths: from its marker to the work marker; needs both markers.
///
/// When the closing marker appears before the opening one, the value runs to the end.
pub fn split_bio_markers(bio: &str) -> BioSections {
    let work_at = bio.find(WORK_MARKER);
    let likes_at = bio.find(LIKES_MARKER);
    let strengths_at = bio.find(STRENGTHS_MARKER);

    let work = work_at.and_then(|start| {
        let rest = &bio[start..];
        let end = rest.find("\n\n").unwrap_or(rest.len());
        non_blank(&rest[..end])
    });

    let likes = match (likes_at, strengths_at) {
        (Some(start), Some(stop)) => between(bio, start + LIKES_MARKER.len(), stop),
        _ => None,
    };

    let strengths = match (strengths_at, work_at) {
        (Some(start), Some(stop)) => between(bio, start + STRENGTHS_MARKER.len(), stop),
        _ => None,
    };

    BioSections {
        work,
        likes,
        strengths,
    }
}

/// Keyword-line heuristic used for pasted profile text: every bio line that
/// mentions a work-related keyword, trimmed, in order.
pub fn work_history_lines(bio: &str) -> Vec<String> {
    bio.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| WORK_KEYWORDS.iter().any(|k| line.contains(k)))
        .map(String::from)
        .collect()
}

fn between(text: &str, start: usize, stop: usize) -> Option<String> {
    let end = if stop >= start { stop } else { text.len() };
    non_blank(&text[start..end])
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
