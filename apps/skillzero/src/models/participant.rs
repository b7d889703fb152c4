use serde::{Deserialize, Serialize};

use crate::models::profile::{is_present, ProfileInfo};

/// One of the five fixed free-text survey questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormQuestion {
    Experience,
    Strengths,
    Appreciation,
    NotBadAt,
    Weaknesses,
}

impl FormQuestion {
    pub const ALL: [FormQuestion; 5] = [
        FormQuestion::Experience,
        FormQuestion::Strengths,
        FormQuestion::Appreciation,
        FormQuestion::NotBadAt,
        FormQuestion::Weaknesses,
    ];

    /// Question text as it appears in the survey export header and in the prompt.
    pub fn label(self) -> &'static str {
        match self {
            FormQuestion::Experience => "今までやってきたこと （仕事／プライベート）",
            FormQuestion::Strengths => "得意と言われたこと／好きなこと",
            FormQuestion::Appreciation => "人に感謝されたこと／頼まれたこと",
            FormQuestion::NotBadAt => "苦手じゃないこと／つい引き受けてしまうこと",
            FormQuestion::Weaknesses => "「これは苦手...」と思うこと",
        }
    }
}

/// Answers to the five survey questions. `None` means the question was not answered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appreciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_bad_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<String>,
}

impl FormData {
    pub fn answer(&self, question: FormQuestion) -> Option<&str> {
        match question {
            FormQuestion::Experience => self.experience.as_deref(),
            FormQuestion::Strengths => self.strengths.as_deref(),
            FormQuestion::Appreciation => self.appreciation.as_deref(),
            FormQuestion::NotBadAt => self.not_bad_at.as_deref(),
            FormQuestion::Weaknesses => self.weaknesses.as_deref(),
        }
    }

    pub fn answer_mut(&mut self, question: FormQuestion) -> &mut Option<String> {
        match question {
            FormQuestion::Experience => &mut self.experience,
            FormQuestion::Strengths => &mut self.strengths,
            FormQuestion::Appreciation => &mut self.appreciation,
            FormQuestion::NotBadAt => &mut self.not_bad_at,
            FormQuestion::Weaknesses => &mut self.weaknesses,
        }
    }

    /// Fills unanswered questions from `other`; answered ones are kept.
    pub fn fill_gaps_from(&mut self, other: &FormData) {
        for question in FormQuestion::ALL {
            let slot = self.answer_mut(question);
            if !is_present(slot) {
                if let Some(answer) = other.answer(question).filter(|a| !a.trim().is_empty()) {
                    *slot = Some(answer.to_string());
                }
            }
        }
    }
}

/// A survey respondent, identified by nickname.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub email: String,
    pub nickname: String,
    #[serde(default)]
    pub profile_url: String,
    #[serde(default)]
    pub form_data: FormData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_info: Option<ProfileInfo>,
    #[serde(default)]
    pub submitted: bool,
}

impl ParticipantRecord {
    /// Merge key: the nickname with surrounding whitespace removed.
    pub fn identity(&self) -> &str {
        self.nickname.trim()
    }
}

/// The consolidated document written by the `process` stage and read by `prompts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedData {
    pub processed_at: String,
    pub total_participants: usize,
    pub participants: Vec<ParticipantRecord>,
}

impl ProcessedData {
    pub fn new(processed_at: String, participants: Vec<ParticipantRecord>) -> Self {
        Self {
            processed_at,
            total_participants: participants.len(),
            participants,
        }
    }
}
