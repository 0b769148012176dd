mod cli;
mod config;
mod prompt;
mod provider;
mod public_ip;
mod records;

use log::info;
use std::process::ExitCode;

use prompt::Console;

#[tokio::main]
async fn main() -> ExitCode {
    // Credentials may come from a local .env file
    dotenvy::dotenv().ok();

    // Parse command line arguments
    let (config_path, command) = match cli::parse_args(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(status) => return ExitCode::from(status),
    };

    // Load configuration first (before logger init)
    let config = match config::Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logger with config log level (env var takes precedence)
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.general.log_level),
    )
    .init();

    info!(
        "Using zone {} with credential {}",
        config.cloudflare.zone_id,
        config.cloudflare.masked_api_key()
    );

    let mut console = Console::stdio();
    match cli::run(command, &config, &mut console).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
