//! Infrastructure layer - concrete adapters for the domain ports.

mod crypto;

pub use crypto::{AesGcmEncryption, KEY_LENGTH};
