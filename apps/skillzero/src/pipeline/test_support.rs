// Fixtures shared by the stage tests: a survey export on disk and a canned page fetcher.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;

use crate::config::Config;
use crate::fetch::{FetchError, FetchedPage, PageFetcher};
use crate::models::{ParticipantRecord, ProcessedData};
use crate::participants::ingest::{COL_NICKNAME, COL_PROFILE_DATA, COL_PROFILE_URL};
use crate::participants::save_processed;

pub const RUN_AT: &str = "2026-07-01 09:00:00";

pub const TARO_URL: &str = "https://libecity.com/user_profile/taro";
pub const WALL_URL: &str = "https://libecity.com/user_profile/wall";
pub const GONE_URL: &str = "https://libecity.com/user_profile/gone";

const TARO_PAGE: &str = r#"<html><head><title>たろうさんのプロフィール</title></head><body>
    <h3 class="content_title">たろうさんのプロフィール</h3>
    <dl><dt>自己紹介</dt><dd>仕事💼：営業<br>得意なこと🧠：段取り</dd>
    <dt>職種・職業</dt><dd>会社員</dd></dl></body></html>"#;

/// Serves canned pages keyed by URL; anything else is a 404.
pub struct StubFetcher {
    pages: HashMap<String, FetchedPage>,
}

impl StubFetcher {
    pub fn new() -> Self {
        let mut pages = HashMap::new();
        pages.insert(TARO_URL.to_string(), page(TARO_URL, TARO_URL, TARO_PAGE));
        pages.insert(
            WALL_URL.to_string(),
            page(
                WALL_URL,
                "https://libecity.com/signin",
                "<html><body>ログインしてください</body></html>",
            ),
        );
        Self { pages }
    }
}

fn page(requested: &str, final_url: &str, body: &str) -> FetchedPage {
    FetchedPage {
        requested_url: requested.to_string(),
        final_url: final_url.to_string(),
        status: 200,
        content_type: "text/html; charset=UTF-8".to_string(),
        body: body.to_string(),
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            status: 404,
            url: url.to_string(),
        })
    }
}

fn quoted(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes a survey export and a prompt template under `dir` and returns a config
/// pointing at them. Six rows, five distinct participants:
/// Taro (fetched page, plus a duplicate row), Hanako (pasted text), Jiro (sign-in
/// wall), Saburo (404) and Shiro (unsupported URL).
pub fn fixture(dir: &Path) -> Config {
    let header = quoted(&[
        "タイムスタンプ",
        COL_NICKNAME,
        COL_PROFILE_URL,
        COL_PROFILE_DATA,
        "今までやってきたこと （仕事／プライベート）",
        "得意と言われたこと／好きなこと",
    ]);
    let rows = [
        quoted(&["2026/07/01 10:00", "Taro", TARO_URL, "", "営業", ""]),
        quoted(&[
            "2026/07/01 11:00",
            "Hanako",
            "",
            "はなこさんのプロフィール\n職種・職業\n看護師\n",
            "",
            "料理",
        ]),
        quoted(&["2026/07/01 12:00", "Taro ", "", "", "", "話を聞くこと"]),
        quoted(&["2026/07/01 13:00", "Jiro", WALL_URL, "", "", ""]),
        quoted(&["2026/07/01 14:00", "Saburo", GONE_URL, "", "", ""]),
        quoted(&["2026/07/01 15:00", "Shiro", "https://example.com/me", "", "", ""]),
    ];
    let csv_path = dir.join("form_answer.csv");
    fs::write(&csv_path, format!("{header}\n{}\n", rows.join("\n"))).unwrap();

    let data_dir = dir.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(
        data_dir.join("prompts.md"),
        "# 分析依頼\n強みを分析してください。\n",
    )
    .unwrap();

    let vars: HashMap<&str, String> = HashMap::from([
        ("SKILLZERO_CSV_PATH", csv_path.display().to_string()),
        ("SKILLZERO_DATA_DIR", data_dir.display().to_string()),
        ("SKILLZERO_OUTPUT_DIR", dir.join("output").display().to_string()),
        ("SKILLZERO_RETRY_DELAY_MS", "0".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

/// Saves a processed document listing `nicknames` without running the `process` stage.
pub fn write_processed(config: &Config, nicknames: &[&str]) {
    let participants = nicknames
        .iter()
        .map(|name| ParticipantRecord {
            nickname: name.to_string(),
            ..Default::default()
        })
        .collect();
    save_processed(
        &config.processed_data_file,
        &ProcessedData::new(RUN_AT.to_string(), participants),
    )
    .unwrap();
}
