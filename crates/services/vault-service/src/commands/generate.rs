//! Generate-key command.

use common::AppResult;

use crate::infra::AesGcmEncryption;

/// Print a new base64 key suitable for `VAULT_ENCRYPTION_KEY`.
pub fn execute() -> AppResult<()> {
    tracing::info!("Generating encryption key");
    println!("{}", AesGcmEncryption::generate_key());
    Ok(())
}
