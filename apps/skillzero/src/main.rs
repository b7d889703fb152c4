mod config;
mod errors;
mod extraction;
mod fetch;
mod models;
mod participants;
mod pipeline;
mod render;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::fetch::ProfileClient;
use crate::pipeline::{run_process, run_prompts};

#[derive(Parser, Debug)]
#[command(name = "skillzero", version)]
#[command(about = "Builds per-participant analysis prompts from survey answers and community profiles")]
struct Cli {
    #[command(subcommand)]
    command: Stage,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Stage {
    /// Read the survey export, extract profiles, merge duplicates, write the processed JSON
    Process,
    /// Render one prompt file per participant from the processed JSON
    Prompts,
    /// Run `process` then `prompts`
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting skillzero v{} ({:?})", env!("CARGO_PKG_VERSION"), cli.command);

    match cli.command {
        Stage::Process => process_stage(&config).await,
        Stage::Prompts => prompts_stage(&config),
        Stage::Run => {
            process_stage(&config).await?;
            prompts_stage(&config)
        }
    }
}

async fn process_stage(config: &Config) -> Result<()> {
    let client = ProfileClient::new(config)?;
    let run_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    match run_process(config, &client, &run_at).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Process stage aborted: {e}");
            Err(e.into())
        }
    }
}

fn prompts_stage(config: &Config) -> Result<()> {
    let summary = match run_prompts(config) {
        Ok(summary) => summary,
        Err(e) => {
            error!("Prompts stage aborted: {e}");
            return Err(e.into());
        }
    };

    if summary.failed() > 0 {
        bail!(
            "{} of {} prompt files could not be written",
            summary.failed(),
            summary.total
        );
    }
    Ok(())
}
