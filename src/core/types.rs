//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// An environment variable name (e.g., ANTHROPIC_API_KEY).
pub type EnvVarName = String;

/// Opaque, stable identifier of a saved credential (UUID v4 string).
pub type CredentialId = String;

/// Identifier of an AI backend profile (e.g., `deepseek`).
pub type ProfileId = String;

/// Identifier of a machine running the session daemon.
pub type MachineId = String;
