//! roomboard binary.

use std::process::ExitCode;

use clap::Parser;

use roomboard_core::init_tracing;
use roomboard_server::{AppConfig, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(config.tracing.clone()) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match roomboard_server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
