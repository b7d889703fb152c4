use std::fs;
use std::path::Path;

use tracing::info;

use crate::errors::AppError;
use crate::models::ProcessedData;

/// Writes the consolidated participant document as pretty-printed UTF-8 JSON,
/// creating parent directories as needed.
pub fn save_processed(path: &Path, data: &ProcessedData) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    info!(
        "Saved {} participants to {}",
        data.total_participants,
        path.display()
    );
    Ok(())
}

pub fn load_processed(path: &Path) -> Result<ProcessedData, AppError> {
    let raw = fs::read_to_string(path).map_err(|e| AppError::from_input_io(path, e))?;
    let data: ProcessedData = serde_json::from_str(&raw)?;
    if data.total_participants != data.participants.len() {
        return Err(AppError::InvalidData(format!(
            "total_participants is {} but {} participants are listed",
            data.total_participants,
            data.participants.len()
        )));
    }
    info!(
        "Loaded {} participants from {}",
        data.participants.len(),
        path.display()
    );
    Ok(data)
}
