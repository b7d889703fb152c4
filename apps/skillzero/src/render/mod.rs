// Prompt Renderer: turns one merged participant into the plain-text prompt document.
// Pure functions only; file output lives in `writer`.

pub mod prompts;
pub mod writer;

use crate::models::{FormData, FormQuestion, ProfileInfo};

pub use writer::{prompt_file_name, write_prompt};

use prompts::{
    FORM_SECTION_TEMPLATE, NOT_ANSWERED, NOT_REGISTERED, PROFILE_SECTION_TEMPLATE,
    PROMPT_END_MARKER,
};

/// Replaces `{key}` occurrences in `template` with the matching value.
///
/// Single pass over the template: substituted values are never rescanned, so a
/// value that itself contains `{job}` is copied through unchanged. Unknown keys
/// are left as literal text.
pub fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let matched = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match matched {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn or_placeholder<'a>(value: &'a Option<String>, placeholder: &'a str) -> &'a str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder,
    }
}

/// The profile section, or `None` when the profile carries nothing worth showing.
pub fn profile_summary(name: &str, info: &ProfileInfo) -> Option<String> {
    if !info.is_valid() {
        return None;
    }
    let work_history = info.work_history.fragments().join("\n");

    Some(fill_placeholders(
        PROFILE_SECTION_TEMPLATE,
        &[
            ("name", name),
            ("job", or_placeholder(&info.job, NOT_REGISTERED)),
            ("bio", or_placeholder(&info.bio, NOT_REGISTERED)),
            ("location", or_placeholder(&info.location, NOT_REGISTERED)),
            ("family", or_placeholder(&info.family, NOT_REGISTERED)),
            (
                "libecity_meeting",
                or_placeholder(&info.libecity_meeting, NOT_REGISTERED),
            ),
            ("challenges", or_placeholder(&info.challenges, NOT_REGISTERED)),
            ("hobbies", or_placeholder(&info.hobbies, NOT_REGISTERED)),
            ("likes", or_placeholder(&info.likes, NOT_REGISTERED)),
            ("skills", or_placeholder(&info.skills, NOT_REGISTERED)),
            ("work_history", work_history.as_str()),
        ],
    ))
}

/// The survey answer section. Always rendered.
pub fn form_summary(form: &FormData) -> String {
    let answer = |q: FormQuestion| match form.answer(q) {
        Some(a) if !a.trim().is_empty() => a,
        _ => NOT_ANSWERED,
    };

    fill_placeholders(
        FORM_SECTION_TEMPLATE,
        &[
            ("experience_label", FormQuestion::Experience.label()),
            ("experience", answer(FormQuestion::Experience)),
            ("strengths_label", FormQuestion::Strengths.label()),
            ("strengths", answer(FormQuestion::Strengths)),
            ("appreciation_label", FormQuestion::Appreciation.label()),
            ("appreciation", answer(FormQuestion::Appreciation)),
            ("not_bad_at_label", FormQuestion::NotBadAt.label()),
            ("not_bad_at", answer(FormQuestion::NotBadAt)),
            ("weaknesses_label", FormQuestion::Weaknesses.label()),
            ("weaknesses", answer(FormQuestion::Weaknesses)),
        ],
    )
}

/// Builds the complete prompt document for one participant.
///
/// Order: template, profile section (omitted when `profile` is absent or invalid),
/// form answers, event info, end marker. Sections are separated by a blank line.
/// The template is copied verbatim, trailing whitespace included; an empty
/// template contributes nothing.
pub fn render_prompt(
    name: &str,
    profile: Option<&ProfileInfo>,
    form: &FormData,
    template: &str,
    event_info: &str,
) -> String {
    let mut sections: Vec<String> = Vec::with_capacity(3);

    if let Some(summary) = profile.and_then(|p| profile_summary(name, p)) {
        sections.push(summary);
    }
    sections.push(form_summary(form));
    let event_info = event_info.trim();
    if !event_info.is_empty() {
        sections.push(event_info.to_string());
    }

    let mut prompt = String::with_capacity(template.len());
    if !template.is_empty() {
        prompt.push_str(template);
        prompt.push_str("\n\n");
    }
    prompt.push_str(&sections.join("\n\n"));
    prompt.push_str("\n\n");
    prompt.push_str(PROMPT_END_MARKER);
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProfileSource, WorkHistory};
    use crate::render::prompts::EVENT_INFO;

    const TEMPLATE: &str = "# 分析してください\n以下の情報をもとに強みを分析してください。\n";

    fn profile() -> ProfileInfo {
        ProfileInfo {
            job: Some("看護師".to_string()),
            bio: Some("よろしくお願いします".to_string()),
            work_history: WorkHistory(vec![
                "仕事💼：病院勤務".to_string(),
                "転職して訪問看護へ".to_string(),
            ]),
            ..ProfileInfo::new(None, "2026-07-01 10:00:00".to_string(), ProfileSource::Text)
        }
    }

    #[test]
    fn test_fill_placeholders_single_pass() {
        let out = fill_placeholders("{a} and {b}", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(out, "{b} and B");
    }

    #[test]
    fn test_fill_placeholders_keeps_unknown_keys() {
        let out = fill_placeholders("{x} {a} {", &[("a", "A")]);
        assert_eq!(out, "{x} A {");
    }

    #[test]
    fn test_absent_profile_omits_section() {
        let out = render_prompt("Taro", None, &FormData::default(), TEMPLATE, EVENT_INFO);
        assert!(!out.contains("## プロフィール情報"));
        assert!(out.contains("## フォーム回答データ"));
        assert!(out.contains("## オフ会情報"));
    }

    #[test]
    fn test_invalid_profile_omits_section() {
        let empty = ProfileInfo::new(
            Some("https://libecity.com/user_profile/x".to_string()),
            "2026-07-01 10:00:00".to_string(),
            ProfileSource::Markup,
        );
        let out = render_prompt("Taro", Some(&empty), &FormData::default(), TEMPLATE, EVENT_INFO);
        assert!(!out.contains("## プロフィール情報"));
    }

    #[test]
    fn test_profile_section_values_and_placeholders() {
        let out = render_prompt("Taro", Some(&profile()), &FormData::default(), TEMPLATE, "");
        assert!(out.contains("**名前**: Taro"));
        assert!(out.contains("**職種・職業**: 看護師"));
        assert!(out.contains("**出身地**: 未登録"));
        assert!(out.contains("**詳細プロフィール**:\n仕事💼：病院勤務\n転職して訪問看護へ"));
        assert!(!out.contains("## オフ会情報"));
    }

    #[test]
    fn test_unanswered_questions_render_placeholder() {
        let form = FormData {
            strengths: Some("料理".to_string()),
            weaknesses: Some("  ".to_string()),
            ..Default::default()
        };
        let out = form_summary(&form);
        assert!(out.contains("**得意と言われたこと／好きなこと**: 料理"));
        assert!(out.contains("**「これは苦手...」と思うこと**: 未回答"));
        assert_eq!(out.matches(NOT_ANSWERED).count(), 4);
    }

    #[test]
    fn test_braces_in_answers_pass_through() {
        let form = FormData {
            experience: Some("{job} と書いてみた".to_string()),
            ..Default::default()
        };
        let out = render_prompt("Taro", Some(&profile()), &form, TEMPLATE, EVENT_INFO);
        assert!(out.contains("**今までやってきたこと （仕事／プライベート）**: {job} と書いてみた"));
    }

    #[test]
    fn test_section_order_and_end_marker() {
        let out = render_prompt("Taro", Some(&profile()), &FormData::default(), TEMPLATE, EVENT_INFO);
        let template_at = out.find("# 分析してください").unwrap();
        let profile_at = out.find("## プロフィール情報").unwrap();
        let form_at = out.find("## フォーム回答データ").unwrap();
        let event_at = out.find("## オフ会情報").unwrap();
        assert!(template_at < profile_at && profile_at < form_at && form_at < event_at);
        assert!(out.ends_with(&format!("\n\n{PROMPT_END_MARKER}\n")));
    }

    #[test]
    fn test_template_is_prepended_verbatim() {
        let template = "# 分析してください\n\n  手順を守ること  \n\n";
        let out = render_prompt("Taro", None, &FormData::default(), template, "");
        assert!(out.starts_with(&format!("{template}\n\n## フォーム回答データ")));
    }

    #[test]
    fn test_empty_template_adds_nothing() {
        let out = render_prompt("Taro", None, &FormData::default(), "", "");
        assert!(out.starts_with("## フォーム回答データ"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let form = FormData {
            experience: Some("接客".to_string()),
            ..Default::default()
        };
        let first = render_prompt("Taro", Some(&profile()), &form, TEMPLATE, EVENT_INFO);
        let second = render_prompt("Taro", Some(&profile()), &form, TEMPLATE, EVENT_INFO);
        assert_eq!(first, second);
    }
}
