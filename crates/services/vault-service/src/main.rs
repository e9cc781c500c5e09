//! Vault - command-line entry point.

use clap::Parser;

use vault_service_lib::{cli::Cli, commands, config::VaultServiceConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments (flags override environment)
    let cli = Cli::parse();

    let mut config = VaultServiceConfig::from_env();
    if cli.verbose {
        config.log_level = "debug".to_string();
    }
    if let Some(path) = &cli.data_file {
        config = config.with_data_file(path.clone());
    }
    if let Some(key) = &cli.key {
        config = config.with_encryption_key(key.clone());
    }

    common::telemetry::init(&config.service_config());
    tracing::debug!(?config, "Configuration loaded");

    if let Err(e) = commands::execute(cli, config).await {
        tracing::error!(code = e.code(), "Command failed: {}", e);
        eprintln!("error: {}", e.user_message());
        std::process::exit(1);
    }
}
