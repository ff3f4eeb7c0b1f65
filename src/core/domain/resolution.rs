//! Resolution prompt result.
//!
//! What the user chose when asked how to satisfy a missing credential.

use zeroize::Zeroizing;

use crate::core::types::CredentialId;

/// User decision returned by a resolution prompt
#[derive(Clone, PartialEq, Eq)]
pub enum ResolutionAction {
    /// Dismissed; the caller reverts the profile selection
    Cancel,
    /// Rely on the machine's own environment
    UseMachine,
    /// Use a value for this launch only
    EnterOnce { value: Zeroizing<String> },
    /// Use a saved credential, optionally remembering it as the default
    SelectSaved {
        secret_id: CredentialId,
        set_default: bool,
    },
}

impl ResolutionAction {
    /// Convenience constructor for `EnterOnce`
    pub fn enter_once(value: impl Into<String>) -> Self {
        Self::EnterOnce {
            value: Zeroizing::new(value.into()),
        }
    }

    /// Convenience constructor for `SelectSaved`
    pub fn select_saved(secret_id: impl Into<CredentialId>, set_default: bool) -> Self {
        Self::SelectSaved {
            secret_id: secret_id.into(),
            set_default,
        }
    }
}

impl std::fmt::Debug for ResolutionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancel => write!(f, "Cancel"),
            Self::UseMachine => write!(f, "UseMachine"),
            Self::EnterOnce { .. } => write!(f, "EnterOnce {{ value: <redacted> }}"),
            Self::SelectSaved {
                secret_id,
                set_default,
            } => f
                .debug_struct("SelectSaved")
                .field("secret_id", secret_id)
                .field("set_default", set_default)
                .finish(),
        }
    }
}
