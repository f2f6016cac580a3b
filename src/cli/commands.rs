//! Subcommand implementations

use super::{ControlArgs, RunArgs, ValidateArgs};
use crate::config::Config;
use crate::core::batch::BatchSummary;
use crate::core::engine::UploadEngine;
use crate::core::submit::HttpSubmitter;
use crate::storage::{CsvResultSink, RunFolder, load_work_items};
use anyhow::Context;
use std::sync::Arc;
use tracing::{Instrument, info, info_span};

/// Resolve the effective configuration: file, then environment, then flags
pub async fn resolve_config(args: &RunArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };
    config = config.with_env_overrides(|key| std::env::var(key).ok())?;
    args.overrides.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Upload every voucher of the input file
pub async fn run(args: RunArgs) -> anyhow::Result<BatchSummary> {
    let config = resolve_config(&args).await?;

    let folder = RunFolder::new(&args.run_folder);
    let meta = folder.load_meta().await?;
    let span = info_span!("run", run_id = %meta.run_id_or_new());
    async move {
        info!("Environment: {}", meta.env_label());
        info!("Endpoint: {}", config.endpoint.url());
        upload(&args, &config, &folder).await
    }
    .instrument(span)
    .await
}

async fn upload(args: &RunArgs, config: &Config, folder: &RunFolder) -> anyhow::Result<BatchSummary> {
    let input = load_work_items(&args.input, config.upload.procurement_batch_id.as_deref())
        .with_context(|| format!("loading {}", args.input.display()))?;

    folder.ensure_control_file()?;
    let control = Arc::new(folder.control_signal(config.upload.control_poll_interval()));
    let submitter = Arc::new(HttpSubmitter::new(&config.endpoint)?);
    let engine = UploadEngine::new(&config.upload, submitter, control);
    let sink = CsvResultSink::for_run(folder, &args.input);

    let result = engine
        .run_and_persist(input.items, &sink)
        .await
        .context("writing results")?;

    let summary = result.summary();
    println!("{}", summary);
    if summary.failed > 0 {
        println!("Failed uploads saved to: {}", sink.failed_path().display());
    }
    Ok(summary)
}

/// Load and validate the input without uploading
pub fn validate(args: ValidateArgs) -> anyhow::Result<usize> {
    let input = load_work_items(&args.input, None)
        .with_context(|| format!("validating {}", args.input.display()))?;
    println!(
        "{}: {} vouchers, columns: {}",
        args.input.display(),
        input.len(),
        input.headers.join(", ")
    );
    Ok(input.len())
}

/// Write a new run state for a run in progress
pub fn control(args: ControlArgs) -> anyhow::Result<()> {
    let folder = RunFolder::new(&args.run_folder);
    folder
        .set_state(args.state)
        .with_context(|| format!("updating {}", folder.control_path().display()))?;
    println!("Run state set to {}", args.state);
    Ok(())
}
