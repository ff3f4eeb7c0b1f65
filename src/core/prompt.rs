//! Auto-prompt controller.
//!
//! Decides, after every change to machine, profile, or satisfaction, whether
//! to open the credential resolution prompt. A prompt key
//! (`machine:profile:VARIABLE`) identifies the unresolved state so the same
//! state is never prompted twice in a row.

use tracing::debug;

use crate::core::constants::PROMPT_KEY_SEPARATOR;
use crate::core::domain::SatisfactionResult;
use crate::core::types::{EnvVarName, ProfileId};

/// Inputs re-evaluated on every change
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub machine_id: &'a str,
    pub profile_id: &'a str,
    pub satisfaction: &'a SatisfactionResult,
    /// Presence probe still in flight
    pub presence_loading: bool,
    /// Profile selected before the current one; restored on cancel
    pub previous_profile_id: Option<&'a str>,
}

/// A prompt the caller should open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub key: String,
    pub env_var_name: EnvVarName,
    /// Profile to restore if the user cancels
    pub revert_to: Option<ProfileId>,
}

/// Result of [`AutoPromptController::evaluate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptDecision {
    /// Nothing to resolve
    Idle,
    /// Presence unknown; decide once the probe finishes
    Waiting,
    /// One-shot suppression consumed for this key
    Suppressed(String),
    /// Already prompted for this exact state
    AlreadyPrompted(String),
    /// Open the resolution prompt
    Open(PromptRequest),
}

/// Compose the key identifying an unresolved state.
pub fn prompt_key(machine_id: &str, profile_id: &str, env_var: &str) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        machine_id,
        profile_id,
        env_var,
        sep = PROMPT_KEY_SEPARATOR
    )
}

/// Tracks which unresolved states have already been prompted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoPromptController {
    last_prompt_key: Option<String>,
    suppress_next_prompt_key: Option<String>,
}

impl AutoPromptController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_prompt_key(&self) -> Option<&str> {
        self.last_prompt_key.as_deref()
    }

    pub fn suppressed_key(&self) -> Option<&str> {
        self.suppress_next_prompt_key.as_deref()
    }

    /// Skip the next prompt for `key` once, e.g. when the user opened the
    /// resolution UI themselves.
    pub fn suppress_next(&mut self, key: impl Into<String>) {
        self.suppress_next_prompt_key = Some(key.into());
    }

    /// Decide whether to prompt for the current state.
    pub fn evaluate(&mut self, ctx: &PromptContext<'_>) -> PromptDecision {
        let missing = ctx.satisfaction.first_unsatisfied_required();

        let Some(missing) = missing.filter(|_| ctx.satisfaction.has_secret_requirements) else {
            self.last_prompt_key = None;
            return PromptDecision::Idle;
        };

        if ctx.presence_loading {
            return PromptDecision::Waiting;
        }

        let key = prompt_key(ctx.machine_id, ctx.profile_id, &missing.env_var_name);

        if self.suppress_next_prompt_key.as_deref() == Some(key.as_str()) {
            debug!(key = %key, "prompt suppressed once");
            self.suppress_next_prompt_key = None;
            return PromptDecision::Suppressed(key);
        }

        if self.last_prompt_key.as_deref() == Some(key.as_str()) {
            return PromptDecision::AlreadyPrompted(key);
        }

        debug!(key = %key, "opening resolution prompt");
        self.last_prompt_key = Some(key.clone());

        PromptDecision::Open(PromptRequest {
            key,
            env_var_name: missing.env_var_name.clone(),
            revert_to: ctx.previous_profile_id.map(str::to_string),
        })
    }
}
