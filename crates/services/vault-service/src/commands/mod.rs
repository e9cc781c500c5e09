//! Command handlers invoked by the `vault` binary.

pub mod entries;
pub mod generate;

use common::AppResult;

use crate::cli::{Cli, Commands};
use crate::config::VaultServiceConfig;

/// Dispatch a parsed command line.
pub async fn execute(cli: Cli, config: VaultServiceConfig) -> AppResult<()> {
    match cli.command {
        Commands::GenerateKey => generate::execute(),
        command => entries::execute(command, &config).await,
    }
}
