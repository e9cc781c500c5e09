//! Vault service configuration.

use std::env;
use std::path::PathBuf;

use common::{AppError, AppResult, ServiceConfig};

/// Default location of the entry snapshot file
pub const DEFAULT_DATA_FILE: &str = "vault.json";

/// Default log filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Vault service configuration.
#[derive(Clone)]
pub struct VaultServiceConfig {
    /// Base64-encoded 32-byte AES key
    encryption_key: Option<String>,
    /// JSON snapshot file holding the stored entries
    pub data_file: PathBuf,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

// Never print the key
impl std::fmt::Debug for VaultServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultServiceConfig")
            .field("encryption_key", &"[REDACTED]")
            .field("data_file", &self.data_file)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl VaultServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            encryption_key: env::var("VAULT_ENCRYPTION_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            data_file: env::var("VAULT_DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE)),
            log_level: env::var("VAULT_LOG_LEVEL")
                .or_else(|_| env::var("LOG_LEVEL"))
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Override the encryption key (e.g. from a CLI flag).
    pub fn with_encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    /// Override the snapshot file location.
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    /// Get the configured encryption key.
    ///
    /// # Errors
    /// Validation error when no key has been configured.
    pub fn encryption_key(&self) -> AppResult<&str> {
        self.encryption_key.as_deref().ok_or_else(|| {
            AppError::validation("VAULT_ENCRYPTION_KEY must be set (see `vault generate-key`)")
        })
    }

    /// Shared settings used for tracing setup
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            service_name: "vault-service".to_string(),
            log_level: self.log_level.clone(),
        }
    }
}

impl Default for VaultServiceConfig {
    fn default() -> Self {
        Self {
            encryption_key: None,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
