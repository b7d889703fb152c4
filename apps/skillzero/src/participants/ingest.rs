//! Survey export reader: one `SurveyRow` per CSV record.
//!
//! Header cells are matched with all whitespace removed, because the export
//! wraps some question titles across lines.

use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{FormData, FormQuestion, ParticipantRecord};

pub const COL_TIMESTAMP: &str = "タイムスタンプ";
pub const COL_EMAIL: &str = "メールアドレス";
pub const COL_NICKNAME: &str = "ニックネーム\nリベシティで使用している名前）";
pub const COL_PROFILE_URL: &str = "リベシティの\nプロフィールURL";
pub const COL_PROFILE_DATA: &str = "プロフィールデータ";
pub const COL_SUBMITTED: &str = "本人提出済";

/// Marker in the submitted column meaning "handed in by the participant".
const SUBMITTED_MARK: &str = "済";

/// A participant record plus the pasted profile text, if the row carried one.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRow {
    pub record: ParticipantRecord,
    pub profile_text: Option<String>,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Default)]
struct SurveyColumns {
    timestamp: Option<usize>,
    email: Option<usize>,
    nickname: usize,
    profile_url: Option<usize>,
    profile_data: Option<usize>,
    submitted: Option<usize>,
    questions: [Option<usize>; 5],
}

impl SurveyColumns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, AppError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let find = |name: &str| {
            let wanted = normalize_header(name);
            normalized.iter().position(|h| *h == wanted)
        };

        let nickname =
            find(COL_NICKNAME).ok_or_else(|| AppError::MissingColumns(vec![COL_NICKNAME.to_string()]))?;

        let columns = SurveyColumns {
            timestamp: find(COL_TIMESTAMP),
            email: find(COL_EMAIL),
            nickname,
            profile_url: find(COL_PROFILE_URL),
            profile_data: find(COL_PROFILE_DATA),
            submitted: find(COL_SUBMITTED),
            questions: FormQuestion::ALL.map(|q| find(q.label())),
        };

        if columns.profile_url.is_none() && columns.profile_data.is_none() {
            warn!("Neither a profile URL nor a profile text column is present; profiles will be empty");
        }
        for (question, column) in FormQuestion::ALL.iter().zip(columns.questions.iter()) {
            if column.is_none() {
                warn!("Question column not found: {}", question.label());
            }
        }

        Ok(columns)
    }

    fn row(&self, record: &csv::StringRecord) -> SurveyRow {
        let cell = |idx: Option<usize>| -> String {
            idx.and_then(|i| record.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let answer = |idx: Option<usize>| Some(cell(idx)).filter(|v| !v.is_empty());

        let mut form_data = FormData::default();
        for (question, idx) in FormQuestion::ALL.iter().zip(self.questions.iter()) {
            *form_data.answer_mut(*question) = answer(*idx);
        }

        SurveyRow {
            record: ParticipantRecord {
                timestamp: cell(self.timestamp),
                email: cell(self.email),
                nickname: cell(Some(self.nickname)),
                profile_url: cell(self.profile_url),
                form_data,
                profile_info: None,
                submitted: cell(self.submitted) == SUBMITTED_MARK,
            },
            profile_text: answer(self.profile_data),
        }
    }
}

fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Reads the survey export at `path`. A missing file or nickname column is fatal;
/// an unreadable record is logged and skipped.
pub fn read_survey(path: &Path) -> Result<Vec<SurveyRow>, AppError> {
    let file = std::fs::File::open(path).map_err(|e| AppError::from_input_io(path, e))?;
    let rows = read_survey_from(file)?;
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn read_survey_from<R: Read>(reader: R) -> Result<Vec<SurveyRow>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = SurveyColumns::resolve(reader.headers()?)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                if record.iter().all(|v| v.trim().is_empty()) {
                    continue;
                }
                rows.push(columns.row(&record));
            }
            Err(e) => warn!("Skipping unreadable CSV record {}: {e}", index + 1),
        }
    }
    Ok(rows)
}
