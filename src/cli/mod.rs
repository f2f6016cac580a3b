//! Command line interface

pub mod commands;

use crate::config::Config;
use crate::core::control::RunState;
use crate::utils::logging::{LogFormat, LogLevel};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Controlled, rate-limited voucher uploader
#[derive(Debug, Parser)]
#[command(name = "voucher-upload", version, about, long_about = None)]
pub struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text, env = "VOUCHER_UPLOAD_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Default log level; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info", env = "VOUCHER_UPLOAD_LOG_LEVEL")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload every voucher of a CSV file
    Run(RunArgs),
    /// Check a CSV file without uploading anything
    Validate(ValidateArgs),
    /// Pause, resume or stop a run in progress
    Control(ControlArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// CSV file with one voucher per row
    #[arg(long, short)]
    pub input: PathBuf,

    /// Run folder holding meta.json and control.json
    #[arg(long)]
    pub run_folder: PathBuf,

    /// YAML configuration file
    #[arg(long, short, env = "VOUCHER_UPLOAD_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// CSV file with one voucher per row
    #[arg(long, short)]
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct ControlArgs {
    /// Run folder of the run to control
    #[arg(long)]
    pub run_folder: PathBuf,

    /// New state: running, paused or stopped
    pub state: RunState,
}

/// Command line settings; they win over the file and the environment
#[derive(Debug, Default, Args)]
pub struct ConfigOverrides {
    /// Endpoint base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Basic auth username
    #[arg(long)]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long)]
    pub password: Option<String>,

    /// Maximum parallel in-flight requests
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Aggregate request rate cap
    #[arg(long)]
    pub requests_per_second: Option<u32>,

    /// Items per checkpoint
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Maximum attempts per voucher
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Procurement batch id added to every voucher
    #[arg(long)]
    pub procurement_batch_id: Option<String>,
}

impl ConfigOverrides {
    /// Apply the flags that were given
    pub fn apply(&self, config: &mut Config) {
        use crate::config::Credentials;

        if let Some(base_url) = &self.base_url {
            config.endpoint.base_url = base_url.clone();
        }
        if let Some(username) = &self.username {
            let password = match (&self.password, &config.endpoint.credentials) {
                (Some(password), _) => password.clone(),
                (None, Credentials::Basic { password, .. }) => password.clone(),
                (None, _) => String::new(),
            };
            config.endpoint.credentials = Credentials::Basic {
                username: username.clone(),
                password,
            };
        } else if let (Some(new_password), Credentials::Basic { password, .. }) =
            (&self.password, &mut config.endpoint.credentials)
        {
            *password = new_password.clone();
        }
        if let Some(max_workers) = self.max_workers {
            config.upload.max_workers = max_workers;
        }
        if let Some(rps) = self.requests_per_second {
            config.upload.requests_per_second = rps;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.upload.chunk_size = chunk_size;
        }
        if let Some(max_retries) = self.max_retries {
            config.upload.max_retries = max_retries;
        }
        if let Some(id) = &self.procurement_batch_id {
            config.upload.procurement_batch_id = Some(id.clone());
        }
    }
}
