use serde::{Deserialize, Deserializer, Serialize};

/// Which builder produced a `ProfileInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Markup,
    Text,
}

/// A labelled section of a profile page. The label is the literal heading text
/// shown on the page (and in its plain-text rendering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Bio,
    Location,
    Job,
    Family,
    LibecityMeeting,
    Challenges,
    Hobbies,
    Likes,
    Skills,
    Duration,
}

impl ProfileField {
    /// Every labelled section, in page order.
    pub const ALL: [ProfileField; 10] = [
        ProfileField::Bio,
        ProfileField::Location,
        ProfileField::Job,
        ProfileField::Family,
        ProfileField::LibecityMeeting,
        ProfileField::Challenges,
        ProfileField::Hobbies,
        ProfileField::Likes,
        ProfileField::Skills,
        ProfileField::Duration,
    ];

    /// Sections read from `dt`/`dd` pairs alongside the bio in a profile page.
    pub const BASIC: [ProfileField; 7] = [
        ProfileField::Location,
        ProfileField::Job,
        ProfileField::Family,
        ProfileField::LibecityMeeting,
        ProfileField::Challenges,
        ProfileField::Hobbies,
        ProfileField::Likes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Bio => "自己紹介",
            ProfileField::Location => "出身地",
            ProfileField::Job => "職種・職業",
            ProfileField::Family => "家族構成",
            ProfileField::LibecityMeeting => "リベ大との出会い",
            ProfileField::Challenges => "挑戦、実践していること、これからやりたいことなど",
            ProfileField::Hobbies => "趣味・特技",
            ProfileField::Likes => "好きな〇〇",
            ProfileField::Skills => "経歴・スキル",
            ProfileField::Duration => "在籍期間",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ProfileField::Bio => "bio",
            ProfileField::Location => "location",
            ProfileField::Job => "job",
            ProfileField::Family => "family",
            ProfileField::LibecityMeeting => "libecity_meeting",
            ProfileField::Challenges => "challenges",
            ProfileField::Hobbies => "hobbies",
            ProfileField::Likes => "likes",
            ProfileField::Skills => "skills",
            ProfileField::Duration => "duration",
        }
    }

    pub fn slot_mut(self, info: &mut ProfileInfo) -> &mut Option<String> {
        match self {
            ProfileField::Bio => &mut info.bio,
            ProfileField::Location => &mut info.location,
            ProfileField::Job => &mut info.job,
            ProfileField::Family => &mut info.family,
            ProfileField::LibecityMeeting => &mut info.libecity_meeting,
            ProfileField::Challenges => &mut info.challenges,
            ProfileField::Hobbies => &mut info.hobbies,
            ProfileField::Likes => &mut info.likes,
            ProfileField::Skills => &mut info.skills,
            ProfileField::Duration => &mut info.duration,
        }
    }
}

/// Ordered work-history fragments. Older processed files stored a single string;
/// both shapes deserialize into this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkHistory(pub Vec<String>);

impl WorkHistory {
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|f| f.trim().is_empty())
    }

    pub fn fragments(&self) -> &[String] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for WorkHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::One(s) if s.trim().is_empty() => WorkHistory::default(),
            Repr::One(s) => WorkHistory(vec![s]),
            Repr::Many(v) => WorkHistory(v),
        })
    }
}

/// Structured fields extracted from a participant's profile page or pasted profile text.
///
/// `url`, `extracted_at`, `source` and the partial-extraction diagnostics are bookkeeping;
/// they never make a profile valid on their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub extracted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ProfileSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, alias = "birthplace", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, alias = "occupation", skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(
        default,
        alias = "libecity_encounter",
        skip_serializing_if = "Option::is_none"
    )]
    pub libecity_meeting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenges: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<String>,
    #[serde(default)]
    pub work_history: WorkHistory,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub partial_extraction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_content_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_text_length: Option<usize>,
}

impl ProfileInfo {
    pub fn new(url: Option<String>, extracted_at: String, source: ProfileSource) -> Self {
        Self {
            url,
            extracted_at,
            source: Some(source),
            ..Default::default()
        }
    }

    /// Every free-text attribute with its JSON key, bookkeeping excluded.
    pub fn text_fields(&self) -> [(&'static str, &Option<String>); 12] {
        [
            ("username", &self.username),
            ("bio", &self.bio),
            ("location", &self.location),
            ("job", &self.job),
            ("family", &self.family),
            ("libecity_meeting", &self.libecity_meeting),
            ("challenges", &self.challenges),
            ("hobbies", &self.hobbies),
            ("likes", &self.likes),
            ("skills", &self.skills),
            ("duration", &self.duration),
            ("strengths", &self.strengths),
        ]
    }

    fn text_fields_mut(&mut self) -> [&mut Option<String>; 12] {
        [
            &mut self.username,
            &mut self.bio,
            &mut self.location,
            &mut self.job,
            &mut self.family,
            &mut self.libecity_meeting,
            &mut self.challenges,
            &mut self.hobbies,
            &mut self.likes,
            &mut self.skills,
            &mut self.duration,
            &mut self.strengths,
        ]
    }

    /// Number of attributes carrying a non-blank value.
    pub fn extracted_count(&self) -> usize {
        let text = self
            .text_fields()
            .iter()
            .filter(|(_, v)| is_present(v))
            .count();
        text + usize::from(!self.work_history.is_empty())
    }

    /// A profile is worth rendering only when at least one real attribute was extracted.
    pub fn is_valid(&self) -> bool {
        self.extracted_count() > 0
    }

    /// Copies `other`'s values into slots that are absent or blank here.
    /// Non-blank values already present are kept.
    pub fn fill_gaps_from(&mut self, other: &ProfileInfo) {
        let theirs = other.text_fields();
        for (slot, (_, value)) in self.text_fields_mut().into_iter().zip(theirs.iter()) {
            if !is_present(slot) && is_present(value) {
                *slot = (*value).clone();
            }
        }
        if self.work_history.is_empty() && !other.work_history.is_empty() {
            self.work_history = other.work_history.clone();
        }
        if self.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
            self.url = other.url.clone();
        }
        self.partial_extraction = !self.is_valid() && other.partial_extraction;
    }
}

pub fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
