//! Saved credential type.
//!
//! A named secret value owned by the user-level credential list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::core::types::CredentialId;

/// A saved credential.
///
/// The value is wiped from memory on drop and never shown by `Debug` or
/// `Display`; use [`SavedCredential::fingerprint`] to identify it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCredential {
    id: CredentialId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    value: String,
    created_at: DateTime<Utc>,
}

impl SavedCredential {
    /// Create a credential with a fresh UUID v4 id
    pub fn new(value: String, label: Option<String>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), value, label)
    }

    /// Create a credential with a known id
    pub fn with_id(id: impl Into<CredentialId>, value: String, label: Option<String>) -> Self {
        Self {
            id: id.into(),
            label,
            value,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Plaintext secret value
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the label
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// Replace the value, wiping the old one
    pub fn replace_value(&mut self, value: String) {
        self.value.zeroize();
        self.value = value;
    }

    /// First 8 hex characters of the SHA-256 of the value
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.value.as_bytes());
        digest
            .iter()
            .take(4)
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Label if set, otherwise the short id
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.short_id().to_string(),
        }
    }

    /// First 8 characters of the id
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

impl Drop for SavedCredential {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

impl std::fmt::Debug for SavedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedCredential")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("value", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl std::fmt::Display for SavedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.fingerprint())
    }
}
