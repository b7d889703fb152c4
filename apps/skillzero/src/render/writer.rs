use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const PROMPT_FILE_SUFFIX: &str = "_analysis_prompt.txt";
const UNKNOWN_NAME: &str = "Unknown";

/// Characters not allowed in file names on common filesystems.
const RESERVED_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Deterministic output file name for a participant: `<name>_analysis_prompt.txt`.
pub fn prompt_file_name(name: &str) -> String {
    let name = name.trim();
    let safe: String = if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name.chars()
            .map(|c| if RESERVED_CHARS.contains(&c) || c.is_control() { '_' } else { c })
            .collect()
    };
    format!("{safe}{PROMPT_FILE_SUFFIX}")
}

/// Writes one prompt document into `dir`, creating the directory when needed.
/// Overwrites any previous file for the same participant.
pub fn write_prompt(dir: &Path, name: &str, prompt: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(prompt_file_name(name));
    fs::write(&path, prompt)?;
    Ok(path)
}
