//! New-session draft.
//!
//! Everything the user has picked for the next launch: target machine,
//! directory, agent, profile, modes, and per-session credential choices.
//! The draft can be kept between runs as an age-encrypted TOML blob.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::{Zeroize, Zeroizing};

use crate::core::bindings::{DefaultBindings, Selection, Selections, SessionValues};
use crate::core::cipher;
use crate::core::config::write_private;
use crate::core::constants;
use crate::core::domain::{AgentKind, Identity, Profile, ResolutionAction};
use crate::core::modes;
use crate::core::types::{EnvVarName, MachineId, ProfileId};
use crate::core::validation::validate_value;
use crate::error::{ConfigError, Result, StoreError};

/// Result of applying a [`ResolutionAction`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Draft updated; re-resolve
    Applied,
    /// User dismissed the prompt; restore this profile (if any)
    Cancelled { revert_to: Option<ProfileId> },
}

/// Draft state for the next session
#[derive(Debug, Clone)]
pub struct NewSessionDraft {
    machine_id: MachineId,
    directory: PathBuf,
    agent: AgentKind,
    profile_id: Option<ProfileId>,
    previous_profile_id: Option<ProfileId>,
    permission_mode: String,
    model_mode: String,
    selections: Selections,
    session_values: SessionValues,
}

impl NewSessionDraft {
    pub fn new(machine_id: impl Into<MachineId>, directory: impl Into<PathBuf>) -> Self {
        let agent = AgentKind::default();
        Self {
            machine_id: machine_id.into(),
            directory: directory.into(),
            agent,
            profile_id: None,
            previous_profile_id: None,
            permission_mode: modes::permission_table(agent).default.to_string(),
            model_mode: modes::model_table(agent).default.to_string(),
            selections: Selections::new(),
            session_values: SessionValues::new(),
        }
    }

    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn agent(&self) -> AgentKind {
        self.agent
    }

    pub fn profile_id(&self) -> Option<&str> {
        self.profile_id.as_deref()
    }

    pub fn previous_profile_id(&self) -> Option<&str> {
        self.previous_profile_id.as_deref()
    }

    pub fn permission_mode(&self) -> &str {
        &self.permission_mode
    }

    pub fn model_mode(&self) -> &str {
        &self.model_mode
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn session_values(&self) -> &SessionValues {
        &self.session_values
    }

    pub fn select_machine(&mut self, machine_id: impl Into<MachineId>) {
        self.machine_id = machine_id.into();
        debug!(machine = %self.machine_id, "machine selected");
    }

    pub fn select_directory(&mut self, directory: impl Into<PathBuf>) {
        self.directory = directory.into();
    }

    /// Switch agent, carrying permission and model modes across
    pub fn select_agent(&mut self, agent: AgentKind) {
        if agent == self.agent {
            return;
        }
        let permission = modes::reconcile_permission(&self.permission_mode, self.agent, agent);
        let model = modes::reconcile_model(&self.model_mode, self.agent, agent);
        debug!(
            from = %self.agent,
            to = %agent,
            permission,
            model,
            "agent selected"
        );
        self.agent = agent;
        self.permission_mode = permission.to_string();
        self.model_mode = model.to_string();
    }

    /// Select a profile, remembering the previous one for cancel.
    ///
    /// Profile default modes apply when valid for the current agent.
    pub fn select_profile(&mut self, profile: &Profile) {
        if self.profile_id.as_deref() == Some(profile.id.as_str()) {
            return;
        }
        self.previous_profile_id = self.profile_id.replace(profile.id.clone());

        if let Some(mode) = profile
            .default_permission_mode
            .as_deref()
            .filter(|m| modes::permission_table(self.agent).is_valid(m))
        {
            self.permission_mode = mode.to_string();
        }
        if let Some(mode) = profile
            .default_model_mode
            .as_deref()
            .filter(|m| modes::model_table(self.agent).is_valid(m))
        {
            self.model_mode = mode.to_string();
        }

        debug!(
            profile = %profile.id,
            previous = ?self.previous_profile_id,
            "profile selected"
        );
    }

    /// Restore the previously selected profile; returns it
    pub fn revert_profile(&mut self) -> Option<ProfileId> {
        let previous = self.previous_profile_id.take();
        debug!(to = ?previous, "reverting profile");
        self.profile_id.clone_from(&previous);
        previous
    }

    /// Set the permission mode
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the current agent doesn't
    /// support `mode`.
    pub fn set_permission_mode(&mut self, mode: &str) -> Result<()> {
        let table = modes::permission_table(self.agent);
        if !table.is_valid(mode) {
            return Err(invalid_mode("permission_mode", mode, self.agent, table.names()));
        }
        self.permission_mode = mode.to_string();
        Ok(())
    }

    /// Set the model mode
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the current agent doesn't
    /// support `mode`.
    pub fn set_model_mode(&mut self, mode: &str) -> Result<()> {
        let table = modes::model_table(self.agent);
        if !table.is_valid(mode) {
            return Err(invalid_mode("model_mode", mode, self.agent, table.names()));
        }
        self.model_mode = mode.to_string();
        Ok(())
    }

    /// Record the user's answer to a resolution prompt.
    ///
    /// - `UseMachine` sets the "prefer machine" override.
    /// - `EnterOnce` stores a session-only value.
    /// - `SelectSaved` sets the override and, with `set_default`, remembers
    ///   the binding.
    /// - `Cancel` changes nothing; the caller restores `revert_to`.
    ///
    /// Choosing a source clears a conflicting session-only value so the
    /// choice takes effect.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyValue` for an empty `EnterOnce`.
    pub fn apply_resolution(
        &mut self,
        profile_id: &str,
        env_var: &str,
        action: ResolutionAction,
        bindings: &mut DefaultBindings,
    ) -> Result<ResolutionOutcome> {
        match action {
            ResolutionAction::Cancel => {
                debug!(profile = %profile_id, env_var = %env_var, "resolution cancelled");
                return Ok(ResolutionOutcome::Cancelled {
                    revert_to: self.previous_profile_id.clone(),
                });
            }
            ResolutionAction::UseMachine => {
                self.session_values.clear(profile_id, env_var);
                self.selections
                    .set(profile_id, env_var, Selection::PreferMachine);
            }
            ResolutionAction::EnterOnce { value } => {
                validate_value(env_var, &value)?;
                self.session_values.set(profile_id, env_var, value);
            }
            ResolutionAction::SelectSaved {
                secret_id,
                set_default,
            } => {
                self.session_values.clear(profile_id, env_var);
                if set_default {
                    bindings.remember(profile_id, env_var, &secret_id);
                }
                self.selections
                    .set(profile_id, env_var, Selection::Saved(secret_id));
            }
        }

        debug!(profile = %profile_id, env_var = %env_var, "resolution applied");
        Ok(ResolutionOutcome::Applied)
    }

    /// Clear selections pointing at a deleted credential; returns how many
    pub fn forget_credential(&mut self, credential_id: &str) -> usize {
        self.selections.forget_credential(credential_id)
    }

    /// Clear selections of `credential_id` in the saved draft at `path`.
    ///
    /// Does nothing when no draft or identity has been written yet. The
    /// draft is rewritten only if something changed. Returns how many
    /// selections were cleared.
    pub fn forget_credential_in_file(
        path: &Path,
        identity_path: &Path,
        credential_id: &str,
    ) -> Result<usize> {
        if !path.exists() || !identity_path.exists() {
            return Ok(0);
        }

        let identity = Identity::load(identity_path)?;
        let mut draft = Self::load_encrypted(path, &identity)?;
        let cleared = draft.forget_credential(credential_id);
        if cleared > 0 {
            draft.save_encrypted(path, &identity)?;
        }

        debug!(credential = %credential_id, cleared, "saved draft selections cleared");
        Ok(cleared)
    }

    /// Default location of the encrypted draft
    pub fn default_path(home: &Path) -> PathBuf {
        home.join(constants::DRAFT_FILE)
    }

    /// Encrypt the draft to `identity` and write it to `path` (mode 0600)
    pub fn save_encrypted(&self, path: &Path, identity: &Identity) -> Result<()> {
        let file = DraftFile::from(self);
        let plaintext =
            Zeroizing::new(toml::to_string(&file).map_err(ConfigError::Serialize)?);
        let sealed = cipher::seal(&plaintext, identity)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(StoreError::WriteFailed)?;
        }
        write_private(path, sealed.as_bytes())?;

        info!(path = %path.display(), "draft saved");
        Ok(())
    }

    /// Read and decrypt a draft written by [`Self::save_encrypted`]
    pub fn load_encrypted(path: &Path, identity: &Identity) -> Result<Self> {
        let sealed = std::fs::read_to_string(path).map_err(StoreError::ReadFailed)?;
        let plaintext = Zeroizing::new(cipher::open(&sealed, identity)?);
        let file: DraftFile = toml::from_str(&plaintext)
            .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;

        debug!(path = %path.display(), "draft loaded");
        Ok(file.into_draft())
    }
}

fn invalid_mode<'a>(
    field: &'static str,
    mode: &str,
    agent: AgentKind,
    valid: impl Iterator<Item = &'a str>,
) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: format!(
            "'{}' is not valid for {} (expected one of: {})",
            mode,
            agent,
            valid.collect::<Vec<_>>().join(", ")
        ),
    }
    .into()
}

/// On-disk draft shape
#[derive(Serialize, Deserialize)]
struct DraftFile {
    machine_id: MachineId,
    directory: PathBuf,
    agent: AgentKind,
    profile_id: Option<ProfileId>,
    previous_profile_id: Option<ProfileId>,
    permission_mode: String,
    model_mode: String,
    #[serde(default)]
    selections: Selections,
    #[serde(default)]
    session_values: BTreeMap<ProfileId, BTreeMap<EnvVarName, String>>,
}

impl From<&NewSessionDraft> for DraftFile {
    fn from(draft: &NewSessionDraft) -> Self {
        let mut session_values: BTreeMap<ProfileId, BTreeMap<EnvVarName, String>> =
            BTreeMap::new();
        for (profile, name, value) in draft.session_values.iter() {
            session_values
                .entry(profile.to_string())
                .or_default()
                .insert(name.to_string(), value.to_string());
        }

        Self {
            machine_id: draft.machine_id.clone(),
            directory: draft.directory.clone(),
            agent: draft.agent,
            profile_id: draft.profile_id.clone(),
            previous_profile_id: draft.previous_profile_id.clone(),
            permission_mode: draft.permission_mode.clone(),
            model_mode: draft.model_mode.clone(),
            selections: draft.selections.clone(),
            session_values,
        }
    }
}

impl DraftFile {
    fn into_draft(mut self) -> NewSessionDraft {
        let mut session_values = SessionValues::new();
        for (profile, vars) in &self.session_values {
            for (name, value) in vars {
                session_values.set(profile, name, Zeroizing::new(value.clone()));
            }
        }

        let agent = self.agent;
        let permission_mode = if modes::permission_table(agent).is_valid(&self.permission_mode) {
            std::mem::take(&mut self.permission_mode)
        } else {
            modes::permission_table(agent).default.to_string()
        };
        let model_mode = if modes::model_table(agent).is_valid(&self.model_mode) {
            std::mem::take(&mut self.model_mode)
        } else {
            modes::model_table(agent).default.to_string()
        };

        NewSessionDraft {
            machine_id: std::mem::take(&mut self.machine_id),
            directory: std::mem::take(&mut self.directory),
            agent,
            profile_id: self.profile_id.take(),
            previous_profile_id: self.previous_profile_id.take(),
            permission_mode,
            model_mode,
            selections: std::mem::take(&mut self.selections),
            session_values,
        }
    }
}

impl Drop for DraftFile {
    fn drop(&mut self) {
        for vars in self.session_values.values_mut() {
            for value in vars.values_mut() {
                value.zeroize();
            }
        }
    }
}
