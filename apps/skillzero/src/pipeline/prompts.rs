use std::collections::HashSet;
use std::fs;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::participants::load_processed;
use crate::render::prompts::EVENT_INFO;
use crate::render::{prompt_file_name, render_prompt, write_prompt};

/// Outcome of a `prompts` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
    pub succeeded: usize,
    pub total: usize,
}

impl RenderSummary {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

/// Consolidated JSON → one prompt file per participant in the output directory.
///
/// The template, the processed data and a configured event-info override are
/// required inputs. A participant whose file cannot be written is logged and
/// counted as failed; the rest are still written.
pub fn run_prompts(config: &Config) -> Result<RenderSummary, AppError> {
    let template_path = config.prompt_template_path();
    let template =
        fs::read_to_string(&template_path).map_err(|e| AppError::from_input_io(&template_path, e))?;

    let event_info = match &config.event_info_path {
        Some(path) => {
            info!("Using event info from {}", path.display());
            fs::read_to_string(path).map_err(|e| AppError::from_input_io(path, e))?
        }
        None => EVENT_INFO.to_string(),
    };

    let data = load_processed(&config.processed_data_file)?;

    let mut summary = RenderSummary {
        succeeded: 0,
        total: data.participants.len(),
    };
    let mut written = HashSet::new();

    for participant in &data.participants {
        let name = participant.identity();
        let prompt = render_prompt(
            name,
            participant.profile_info.as_ref(),
            &participant.form_data,
            &template,
            &event_info,
        );

        if !written.insert(prompt_file_name(name)) {
            warn!("Prompt file for {name} overwrites another participant's file");
        }

        match write_prompt(&config.output_dir, name, &prompt) {
            Ok(path) => {
                info!("Wrote prompt for {name}: {}", path.display());
                summary.succeeded += 1;
            }
            Err(e) => error!("Failed to write prompt for {name}: {e}"),
        }
    }

    info!(
        "Prompt generation finished: {}/{} succeeded",
        summary.succeeded, summary.total
    );
    Ok(summary)
}
