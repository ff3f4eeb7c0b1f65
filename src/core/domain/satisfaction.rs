//! Satisfaction verdict types.
//!
//! Output of the resolver: one item per secret requirement plus an overall
//! verdict.

use serde::{Deserialize, Serialize};

use crate::core::types::{CredentialId, EnvVarName};

/// Source that satisfied a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SatisfiedBy {
    /// Value typed for this launch only
    SessionOnly,
    /// Saved credential explicitly picked for this session
    SelectedSaved,
    /// Default binding created during the current run
    RememberedSaved,
    /// Default binding loaded from settings
    DefaultSaved,
    /// Already set in the target machine's environment
    MachineEnv,
}

impl SatisfiedBy {
    /// Whether the value comes from the saved credential list
    pub fn uses_saved_credential(&self) -> bool {
        matches!(
            self,
            Self::SelectedSaved | Self::RememberedSaved | Self::DefaultSaved
        )
    }

    /// Whether the injector writes this variable into the spawn overlay
    pub fn is_injected(&self) -> bool {
        !matches!(self, Self::MachineEnv)
    }

    /// Short human-readable description
    pub fn describe(&self) -> &'static str {
        match self {
            Self::SessionOnly => "entered for this session",
            Self::SelectedSaved => "selected saved credential",
            Self::RememberedSaved => "remembered saved credential",
            Self::DefaultSaved => "default saved credential",
            Self::MachineEnv => "machine environment",
        }
    }
}

/// Verdict for a single secret requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatisfactionItem {
    pub env_var_name: EnvVarName,
    pub required: bool,
    pub is_satisfied: bool,
    pub satisfied_by: Option<SatisfiedBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_secret_id: Option<CredentialId>,
}

impl SatisfactionItem {
    /// Unsatisfied item
    pub fn unsatisfied(env_var_name: &str, required: bool) -> Self {
        Self {
            env_var_name: env_var_name.to_string(),
            required,
            is_satisfied: false,
            satisfied_by: None,
            saved_secret_id: None,
        }
    }

    /// Item satisfied by `source`
    pub fn satisfied(
        env_var_name: &str,
        required: bool,
        source: SatisfiedBy,
        saved_secret_id: Option<CredentialId>,
    ) -> Self {
        Self {
            env_var_name: env_var_name.to_string(),
            required,
            is_satisfied: true,
            satisfied_by: Some(source),
            saved_secret_id,
        }
    }

    /// Whether this item prevents the session from starting
    pub fn blocks(&self) -> bool {
        self.required && !self.is_satisfied
    }
}

/// Overall verdict for a profile's secret requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SatisfactionResult {
    pub has_secret_requirements: bool,
    pub is_satisfied: bool,
    pub items: Vec<SatisfactionItem>,
}

impl SatisfactionResult {
    /// Build a result from items; overall satisfaction ignores optional items
    pub fn from_items(items: Vec<SatisfactionItem>) -> Self {
        Self {
            has_secret_requirements: !items.is_empty(),
            is_satisfied: items.iter().all(|item| !item.blocks()),
            items,
        }
    }

    /// Result for a profile with no secret requirements
    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    /// First required item that is not satisfied, in requirement order
    pub fn first_unsatisfied_required(&self) -> Option<&SatisfactionItem> {
        self.items.iter().find(|item| item.blocks())
    }

    /// Look up the item for a variable
    pub fn item(&self, env_var_name: &str) -> Option<&SatisfactionItem> {
        self.items
            .iter()
            .find(|item| item.env_var_name == env_var_name)
    }
}
