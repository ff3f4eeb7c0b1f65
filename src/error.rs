//! Error types.
//!
//! One top-level [`Error`] with a sub-enum per concern. Expected absence
//! (an unsatisfied requirement, a dangling credential reference) is data,
//! not an error; only spawn preparation turns it into
//! [`CredentialError::MissingRequired`].

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Settings file and profile lookup errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] toml::ser::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    #[error("profile '{profile}' does not support agent '{agent}'")]
    IncompatibleProfile { profile: String, agent: String },

    #[error("unable to determine home directory")]
    HomeNotFound,
}

/// Identity key and draft storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no private key found in {0}")]
    NoPrivateKey(String),

    #[error("failed to read: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// Encryption errors for the at-rest draft.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("armor failed: {0}")]
    ArmorFailed(String),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("environment variable name cannot be empty")]
    EmptyName,

    #[error("invalid environment variable name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("value for {0} cannot be empty")]
    EmptyValue(String),

    #[error("invalid assignment '{0}' (expected NAME=VALUE)")]
    InvalidAssignment(String),
}

/// Credential store and satisfaction errors.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("credential not found: {id}{}", suggestion_suffix(.suggestions))]
    NotFound { id: String, suggestions: Vec<String> },

    #[error("credential id '{0}' is ambiguous")]
    Ambiguous(String),

    #[error("missing required credential: {name}")]
    MissingRequired { name: String },
}

impl CredentialError {
    /// Build a `NotFound` error listing known ids that share a prefix with `id`.
    pub fn not_found_with_suggestions(id: String, available: &[String]) -> Self {
        let head: String = id.chars().take(2).collect();
        let suggestions = if head.is_empty() {
            Vec::new()
        } else {
            available
                .iter()
                .filter(|candidate| candidate.starts_with(&head))
                .take(3)
                .cloned()
                .collect()
        };
        Self::NotFound { id, suggestions }
    }
}

fn suggestion_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {})", suggestions.join(", "))
    }
}

/// Environment presence probe errors.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("environment check for machine '{machine}' is still loading")]
    Pending { machine: String },

    #[error("environment check for machine '{machine}' failed: {reason}")]
    Unavailable { machine: String, reason: String },
}

/// Session spawn errors.
#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("spawn rejected: {0}")]
    Rejected(String),

    #[error("agent binary not found: {0}")]
    AgentNotFound(String),

    #[error("directory does not exist: {0}")]
    InvalidDirectory(String),
}

pub type Result<T> = std::result::Result<T, Error>;
