//! Encryption for data kept at rest.
//!
//! Only the new-session draft is encrypted; saved credentials live in the
//! settings file protected by file permissions.

use crate::core::domain::Identity;
use crate::error::Result;

mod age;

pub use self::age::Age;

/// Symmetric seal/open around a local identity.
pub trait Cipher {
    /// Encrypt `plaintext` so that only `identity` can open it.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` or `CipherError::ArmorFailed`.
    fn seal(&self, plaintext: &str, identity: &Identity) -> Result<String>;

    /// Decrypt text produced by [`Cipher::seal`].
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` if the identity doesn't match
    /// or the input is corrupt.
    fn open(&self, ciphertext: &str, identity: &Identity) -> Result<String>;
}

/// Seal with the default age backend.
pub fn seal(plaintext: &str, identity: &Identity) -> Result<String> {
    Age.seal(plaintext, identity)
}

/// Open with the default age backend.
pub fn open(ciphertext: &str, identity: &Identity) -> Result<String> {
    Age.open(ciphertext, identity)
}
