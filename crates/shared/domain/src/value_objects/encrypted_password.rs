use std::fmt;

use crate::constants::MIN_ENCRYPTED_PASSWORD_LENGTH;
use crate::error::{DomainError, DomainResult};

use super::impl_string_value_object;

/// Opaque ciphertext produced by an [`EncryptionService`](crate::EncryptionService).
///
/// The textual form embeds everything the cipher needs to reverse it. The
/// domain only checks a minimum length; the decrypt step is what actually
/// proves the payload is intact.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncryptedPassword(String);

impl EncryptedPassword {
    /// Wrap a ciphertext string as-is (no trimming).
    ///
    /// # Errors
    /// `InvalidEncryptedPassword` when the value is empty or shorter than
    /// [`MIN_ENCRYPTED_PASSWORD_LENGTH`] characters.
    pub fn new(value: &str) -> DomainResult<Self> {
        if value.is_empty() {
            return Err(DomainError::InvalidEncryptedPassword(
                "Encrypted password cannot be empty".to_string(),
            ));
        }

        if value.chars().count() < MIN_ENCRYPTED_PASSWORD_LENGTH {
            return Err(DomainError::InvalidEncryptedPassword(format!(
                "Encrypted password must be at least {} characters",
                MIN_ENCRYPTED_PASSWORD_LENGTH
            )));
        }

        Ok(Self(value.to_string()))
    }
}

impl_string_value_object!(EncryptedPassword);

// Don't expose ciphertext in debug output
impl fmt::Debug for EncryptedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncryptedPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for EncryptedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
