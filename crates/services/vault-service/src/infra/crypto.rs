//! AES-256-GCM password encryption.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use domain::{EncryptedPassword, EncryptionError, EncryptionService};

/// AES-256 key length in bytes
pub const KEY_LENGTH: usize = 32;

const NONCE_LENGTH: usize = 12;
const TAG_LENGTH: usize = 16;

/// [`EncryptionService`] backed by AES-256-GCM.
///
/// Produces `base64(nonce || ciphertext || tag)` with a fresh random nonce
/// per call. The owner id is bound as associated data, so a payload only
/// decrypts for the account it was created for.
pub struct AesGcmEncryption {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for AesGcmEncryption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmEncryption")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl AesGcmEncryption {
    /// Create from raw key bytes.
    pub fn new(key: &[u8; KEY_LENGTH]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Create from a base64-encoded 32-byte key.
    ///
    /// # Errors
    /// `InvalidKey` when the text is not base64 or not exactly 32 bytes.
    pub fn from_base64_key(encoded: &str) -> Result<Self, EncryptionError> {
        let bytes = Zeroizing::new(
            STANDARD
                .decode(encoded.trim())
                .map_err(|e| EncryptionError::InvalidKey(format!("base64 decode: {e}")))?,
        );

        if bytes.len() != KEY_LENGTH {
            return Err(EncryptionError::InvalidKey(format!(
                "expected {} bytes, got {}",
                KEY_LENGTH,
                bytes.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&bytes)
            .map_err(|e| EncryptionError::InvalidKey(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Generate a random key, base64-encoded for configuration.
    pub fn generate_key() -> String {
        let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
        OsRng.fill_bytes(&mut key[..]);
        STANDARD.encode(&key[..])
    }
}

impl EncryptionService for AesGcmEncryption {
    fn encrypt(
        &self,
        plaintext: &str,
        owner_id: &str,
    ) -> Result<EncryptedPassword, EncryptionError> {
        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(
                nonce,
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: owner_id.as_bytes(),
                },
            )
            .map_err(|e| EncryptionError::Encrypt(format!("AES-GCM encrypt: {e}")))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);

        EncryptedPassword::new(&STANDARD.encode(combined))
            .map_err(|e| EncryptionError::Encrypt(e.to_string()))
    }

    fn decrypt(
        &self,
        encrypted: &EncryptedPassword,
        owner_id: &str,
    ) -> Result<String, EncryptionError> {
        let combined = STANDARD
            .decode(encrypted.as_str())
            .map_err(|e| EncryptionError::Decrypt(format!("base64 decode: {e}")))?;

        if combined.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(EncryptionError::Decrypt("ciphertext too short".into()));
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = Zeroizing::new(
            self.cipher
                .decrypt(
                    nonce,
                    Payload {
                        msg: ciphertext,
                        aad: owner_id.as_bytes(),
                    },
                )
                .map_err(|e| EncryptionError::Decrypt(format!("AES-GCM decrypt: {e}")))?,
        );

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| EncryptionError::Decrypt(format!("plaintext is not UTF-8: {e}")))
    }
}
