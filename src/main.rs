//! voucher-upload - controlled voucher uploader
//!
//! Uploads a CSV of vouchers with bounded concurrency, a global rate limit,
//! retries, and operator pause/stop through the run folder's control file.

#![allow(missing_docs)]

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error};
use voucher_upload::cli::{Cli, Commands, commands};
use voucher_upload::utils::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_format, cli.log_level) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    debug!("{}", voucher_upload::build_info());

    let outcome = match cli.command {
        Commands::Run(args) => commands::run(args).await.map(|_| ()),
        Commands::Validate(args) => commands::validate(args).map(|_| ()),
        Commands::Control(args) => commands::control(args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
