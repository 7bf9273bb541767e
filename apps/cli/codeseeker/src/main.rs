use codeseeker::cli::Cli;
use codeseeker::context::{resolve_config_dir, resolve_log_dir};
use codeseeker::logger::initialize as LoggerInitialize;

use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_dir = match resolve_config_dir(cli.global.config_dir.as_deref())
        .and_then(|config_dir| resolve_log_dir(&config_dir))
    {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = LoggerInitialize(&log_dir, cli.global.verbose) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    info!("codeseeker {} starting", env!("CARGO_PKG_VERSION"));
    info!("Log directory: {}", log_dir.display());

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    match codeseeker::run(&cli, &cancel).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            if let Some(hint) = e.hint() {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}
