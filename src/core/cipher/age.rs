//! age backend.
//!
//! x25519 recipient encryption with ASCII armor.

use std::io::{Read, Write};

use tracing::trace;

use super::Cipher;
use crate::core::domain::Identity;
use crate::error::{CipherError, Result};

/// age encryption to the identity's own recipient
pub struct Age;

impl Cipher for Age {
    fn seal(&self, plaintext: &str, identity: &Identity) -> Result<String> {
        trace!(plaintext_len = plaintext.len(), "sealing");

        let recipient = identity.recipient();
        let encryptor =
            age::Encryptor::with_recipients(std::iter::once(&recipient as &dyn age::Recipient))
                .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let mut sealed = Vec::new();
        let armor = age::armor::ArmoredWriter::wrap_output(&mut sealed, age::armor::Format::AsciiArmor)
            .map_err(|e| CipherError::ArmorFailed(e.to_string()))?;
        let mut writer = encryptor
            .wrap_output(armor)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        writer.write_all(plaintext.as_bytes())?;
        writer
            .finish()
            .and_then(|armor| armor.finish())
            .map_err(|e| CipherError::ArmorFailed(e.to_string()))?;

        String::from_utf8(sealed)
            .map_err(|e| CipherError::EncryptionFailed(format!("UTF-8 error: {}", e)).into())
    }

    fn open(&self, ciphertext: &str, identity: &Identity) -> Result<String> {
        trace!(ciphertext_len = ciphertext.len(), "opening");

        let reader = age::armor::ArmoredReader::new(ciphertext.as_bytes());
        let decryptor =
            age::Decryptor::new(reader).map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;

        let mut reader = decryptor
            .decrypt(std::iter::once(identity.as_age() as &dyn age::Identity))
            .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;

        let mut opened = Vec::new();
        reader
            .read_to_end(&mut opened)
            .map_err(|e| CipherError::DecryptionFailed(e.to_string()))?;

        String::from_utf8(opened)
            .map_err(|e| CipherError::DecryptionFailed(format!("UTF-8 error: {}", e)).into())
    }
}
