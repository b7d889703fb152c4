use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::fetch::FetchedPage;

const RULE: &str = "==================================================";

/// Append-only diagnostics for fetched pages that were not usable profiles.
/// Reset at the start of every `process` run.
#[derive(Debug, Clone)]
pub struct DebugLog {
    path: PathBuf,
}

impl DebugLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncates the log and writes a fresh summary header.
    pub fn reset(&self, created_at: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let header = format!("=== デバッグ情報サマリー ===\n作成日時: {created_at}\n{RULE}\n");
        fs::write(&self.path, header)?;
        info!("Debug log reset: {}", self.path.display());
        Ok(())
    }

    /// Appends one block describing a rejected page.
    pub fn record(&self, page: &FetchedPage) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "\n=== {} ===", page.requested_url)?;
        writeln!(file, "Status Code: {}", page.status)?;
        writeln!(file, "Content Length: {} bytes", page.body.len())?;
        writeln!(file, "Content Type: {}", page.content_type)?;
        writeln!(file, "Final URL: {}", page.final_url)?;
        writeln!(file, "{RULE}")?;
        Ok(())
    }
}
