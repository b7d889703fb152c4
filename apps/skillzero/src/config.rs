use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_CSV_PATH: &str = "spreadsheet_data - form_answer.csv";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_OUTPUT_DIR: &str = "output";
const PROCESSED_DATA_FILE_NAME: &str = "processed_data.json";
const DEBUG_FILE_NAME: &str = "debug_info.txt";
const PROMPT_TEMPLATE_FILE_NAME: &str = "prompts.md";

/// Application configuration loaded from environment variables.
/// Built once in `main` and handed to each stage by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub csv_path: PathBuf,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub processed_data_file: PathBuf,
    pub event_info_path: Option<PathBuf>,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    pub min_profile_size: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Missing keys fall back
    /// to defaults; present but malformed numeric values are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let output_dir = PathBuf::from(
            lookup("SKILLZERO_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
        );
        let processed_data_file = lookup("SKILLZERO_PROCESSED_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| output_dir.join(PROCESSED_DATA_FILE_NAME));

        Ok(Config {
            csv_path: PathBuf::from(
                lookup("SKILLZERO_CSV_PATH").unwrap_or_else(|| DEFAULT_CSV_PATH.to_string()),
            ),
            data_dir: PathBuf::from(
                lookup("SKILLZERO_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            ),
            output_dir,
            processed_data_file,
            event_info_path: lookup("SKILLZERO_EVENT_INFO_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            max_retries: parse_or(&lookup, "SKILLZERO_MAX_RETRIES", 3)?,
            retry_delay: Duration::from_millis(parse_or(&lookup, "SKILLZERO_RETRY_DELAY_MS", 2000)?),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SKILLZERO_REQUEST_TIMEOUT_SECS",
                30,
            )?),
            min_profile_size: parse_or(&lookup, "SKILLZERO_MIN_PROFILE_SIZE", 1000)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn prompt_template_path(&self) -> PathBuf {
        self.data_dir.join(PROMPT_TEMPLATE_FILE_NAME)
    }

    pub fn debug_file(&self) -> PathBuf {
        self.output_dir.join(DEBUG_FILE_NAME)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.csv_path, PathBuf::from(DEFAULT_CSV_PATH));
        assert_eq!(
            config.processed_data_file,
            PathBuf::from("output").join("processed_data.json")
        );
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_millis(2000));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.min_profile_size, 1000);
        assert!(config.event_info_path.is_none());
        assert_eq!(config.prompt_template_path(), PathBuf::from("data").join("prompts.md"));
    }

    #[test]
    fn test_processed_file_follows_output_dir() {
        let config = Config::from_lookup(lookup_from(&[("SKILLZERO_OUTPUT_DIR", "out")])).unwrap();
        assert_eq!(config.processed_data_file, PathBuf::from("out").join("processed_data.json"));
        assert_eq!(config.debug_file(), PathBuf::from("out").join("debug_info.txt"));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("SKILLZERO_MAX_RETRIES", "5"),
            ("SKILLZERO_RETRY_DELAY_MS", "10"),
            ("SKILLZERO_EVENT_INFO_PATH", "data/event.md"),
        ]))
        .unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(10));
        assert_eq!(config.event_info_path, Some(PathBuf::from("data/event.md")));
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("SKILLZERO_MAX_RETRIES", "three")]))
            .unwrap_err();
        assert!(err.to_string().contains("SKILLZERO_MAX_RETRIES"));
    }
}
