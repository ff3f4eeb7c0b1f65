//! Credential requirement type.
//!
//! One environment variable a profile needs at session start.

use serde::{Deserialize, Serialize};

use crate::core::types::EnvVarName;

/// Whether a variable carries a secret or plain configuration.
///
/// Only `Secret` requirements take part in satisfaction; `Plain` values
/// always come straight from the profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    Secret,
    #[default]
    Plain,
}

impl std::fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Secret => write!(f, "secret"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// A single environment variable requirement derived from a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRequirement {
    pub env_var_name: EnvVarName,
    pub required: bool,
    pub kind: RequirementKind,
}

impl CredentialRequirement {
    /// Required secret requirement
    pub fn secret(name: impl Into<EnvVarName>) -> Self {
        Self {
            env_var_name: name.into(),
            required: true,
            kind: RequirementKind::Secret,
        }
    }

    /// Optional secret requirement
    pub fn optional_secret(name: impl Into<EnvVarName>) -> Self {
        Self {
            required: false,
            ..Self::secret(name)
        }
    }

    /// Plain configuration requirement
    pub fn plain(name: impl Into<EnvVarName>) -> Self {
        Self {
            env_var_name: name.into(),
            required: true,
            kind: RequirementKind::Plain,
        }
    }

    pub fn is_secret(&self) -> bool {
        self.kind == RequirementKind::Secret
    }
}
