use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::extraction::{build_from_markup, build_from_text, is_profile_page};
use crate::fetch::{is_supported_profile_url, DebugLog, PageFetcher};
use crate::models::{ProcessedData, ProfileInfo};
use crate::participants::{merge_duplicates, read_survey, save_processed};

/// Counts reported at the end of a `process` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessSummary {
    pub rows: usize,
    pub participants: usize,
    pub with_profile: usize,
}

/// CSV → profiles → merged participants → consolidated JSON.
///
/// `run_at` stamps the JSON document and every extracted profile. Rows are
/// handled one at a time; a row whose profile cannot be built keeps going
/// without one.
pub async fn run_process(
    config: &Config,
    fetcher: &dyn PageFetcher,
    run_at: &str,
) -> Result<ProcessSummary, AppError> {
    let debug_log = DebugLog::new(config.debug_file());
    if let Err(e) = debug_log.reset(run_at) {
        warn!("Could not reset debug log {}: {e}", debug_log.path().display());
    }

    let rows = read_survey(&config.csv_path)?;
    let total_rows = rows.len();

    let mut records = Vec::with_capacity(total_rows);
    for (i, row) in rows.into_iter().enumerate() {
        let mut record = row.record;
        info!("Processing row {}/{}: {}", i + 1, total_rows, record.identity());

        record.profile_info = match row.profile_text.as_deref() {
            Some(text) => build_from_text(text, Some(record.profile_url.as_str()), run_at),
            None if !record.profile_url.trim().is_empty() => {
                resolve_profile(config, fetcher, &debug_log, &record.profile_url, run_at).await
            }
            None => None,
        };

        match &record.profile_info {
            Some(profile) if profile.is_valid() => {}
            Some(_) => warn!("No usable profile fields for {}", record.identity()),
            None => info!("No profile data for {}", record.identity()),
        }
        records.push(record);
    }

    let participants = merge_duplicates(records);
    let summary = ProcessSummary {
        rows: total_rows,
        participants: participants.len(),
        with_profile: participants
            .iter()
            .filter(|p| p.profile_info.as_ref().is_some_and(ProfileInfo::is_valid))
            .count(),
    };

    let data = ProcessedData::new(run_at.to_string(), participants);
    save_processed(&config.processed_data_file, &data)?;

    info!(
        "Process finished: {} rows, {} participants, {} with profile",
        summary.rows, summary.participants, summary.with_profile
    );
    Ok(summary)
}

/// Fetches and extracts one profile page. Every failure is logged and yields `None`.
async fn resolve_profile(
    config: &Config,
    fetcher: &dyn PageFetcher,
    debug_log: &DebugLog,
    url: &str,
    run_at: &str,
) -> Option<ProfileInfo> {
    let url = url.trim();
    if !is_supported_profile_url(url) {
        warn!("Skipping unsupported profile URL: {url}");
        return None;
    }

    let page = match fetcher.fetch(url).await {
        Ok(page) => page,
        Err(e) => {
            warn!("Profile fetch failed for {url}: {e}");
            return None;
        }
    };

    if page.body.len() < config.min_profile_size {
        warn!(
            "Profile page for {url} is only {} bytes (expected at least {})",
            page.body.len(),
            config.min_profile_size
        );
    }

    match is_profile_page(&page.body, &page.final_url) {
        Ok(check) if check.is_profile() => {}
        Ok(check) => {
            warn!("Not a profile page ({check:?}): {url}");
            if let Err(e) = debug_log.record(&page) {
                warn!("Could not write debug log entry for {url}: {e}");
            }
            return None;
        }
        Err(e) => {
            warn!("Profile page check failed for {url}: {e}");
            return None;
        }
    }

    build_from_markup(&page.body, url, run_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::participants::load_processed;
    use crate::pipeline::test_support::{fixture, StubFetcher, RUN_AT, TARO_URL, WALL_URL};

    #[tokio::test]
    async fn test_process_builds_merged_document() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());

        let summary = run_process(&config, &StubFetcher::new(), RUN_AT).await.unwrap();
        assert_eq!(summary.rows, 6);
        assert_eq!(summary.participants, 5);
        assert_eq!(summary.with_profile, 2);

        let data = load_processed(&config.processed_data_file).unwrap();
        assert_eq!(data.processed_at, RUN_AT);
        let names: Vec<_> = data.participants.iter().map(|p| p.nickname.as_str()).collect();
        assert_eq!(names, vec!["Taro", "Hanako", "Jiro", "Saburo", "Shiro"]);

        let taro = &data.participants[0];
        let profile = taro.profile_info.as_ref().unwrap();
        assert_eq!(profile.username.as_deref(), Some("たろう"));
        assert_eq!(profile.job.as_deref(), Some("会社員"));
        assert_eq!(profile.strengths.as_deref(), Some("段取り"));
        assert_eq!(taro.form_data.experience.as_deref(), Some("営業"));
        assert_eq!(taro.form_data.strengths.as_deref(), Some("話を聞くこと"));

        let hanako = &data.participants[1];
        assert_eq!(
            hanako.profile_info.as_ref().and_then(|p| p.job.as_deref()),
            Some("看護師")
        );

        for name in ["Jiro", "Saburo", "Shiro"] {
            let p = data.participants.iter().find(|p| p.nickname == name).unwrap();
            assert!(p.profile_info.is_none(), "{name} should have no profile");
        }
    }

    #[tokio::test]
    async fn test_rejected_page_goes_to_debug_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());

        run_process(&config, &StubFetcher::new(), RUN_AT).await.unwrap();

        let log = fs::read_to_string(config.debug_file()).unwrap();
        assert!(log.starts_with("=== デバッグ情報サマリー ==="));
        assert!(log.contains(&format!("=== {WALL_URL} ===")));
        assert!(log.contains("Final URL: https://libecity.com/signin"));
        assert!(!log.contains(TARO_URL));
    }

    #[tokio::test]
    async fn test_rerun_writes_identical_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture(dir.path());

        run_process(&config, &StubFetcher::new(), RUN_AT).await.unwrap();
        let first = fs::read(&config.processed_data_file).unwrap();
        run_process(&config, &StubFetcher::new(), RUN_AT).await.unwrap();
        let second = fs::read(&config.processed_data_file).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_csv_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fixture(dir.path());
        config.csv_path = dir.path().join("missing.csv");

        let err = run_process(&config, &StubFetcher::new(), RUN_AT).await.unwrap_err();
        assert!(matches!(err, AppError::MissingInput(_)));
        assert!(!config.processed_data_file.exists());
    }
}
