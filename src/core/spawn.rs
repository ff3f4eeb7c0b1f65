//! Session spawning.
//!
//! [`prepare`] turns a draft into a [`SpawnRequest`] once every required
//! credential is satisfied. A [`Spawner`] carries the request to wherever
//! the agent runs; [`LocalSpawner`] launches it on this machine.

use std::path::PathBuf;
use std::process::{Child, Command};

use serde::Serialize;
use tracing::{debug, info};

use crate::core::bindings::DefaultBindings;
use crate::core::domain::{AgentKind, Profile, SatisfactionResult, SavedCredential};
use crate::core::draft::NewSessionDraft;
use crate::core::injector::{build_overlay, EnvOverlay, InjectInput};
use crate::core::probe::PresenceSnapshot;
use crate::core::requirements;
use crate::core::resolver::{resolve, ResolveInput};
use crate::core::types::{MachineId, ProfileId};
use crate::error::{ConfigError, CredentialError, ProbeError, Result, SpawnError};

/// Request handed to a [`Spawner`]
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnRequest {
    pub machine_id: MachineId,
    pub directory: PathBuf,
    pub agent: AgentKind,
    pub profile_id: ProfileId,
    pub permission_mode: String,
    pub model_mode: String,
    pub environment_variables: EnvOverlay,
}

impl SpawnRequest {
    /// JSON form with every environment value replaced by a placeholder
    pub fn redacted_json(&self) -> serde_json::Value {
        serde_json::json!({
            "machineId": self.machine_id,
            "directory": self.directory,
            "agent": self.agent,
            "profileId": self.profile_id,
            "permissionMode": self.permission_mode,
            "modelMode": self.model_mode,
            "environmentVariables": self.environment_variables.redacted(),
        })
    }
}

impl std::fmt::Debug for SpawnRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnRequest")
            .field("machine_id", &self.machine_id)
            .field("directory", &self.directory)
            .field("agent", &self.agent)
            .field("profile_id", &self.profile_id)
            .field("permission_mode", &self.permission_mode)
            .field("model_mode", &self.model_mode)
            .field("environment_variables", &self.environment_variables)
            .finish()
    }
}

/// Everything spawn preparation reads
#[derive(Debug, Clone, Copy)]
pub struct PrepareInput<'a> {
    pub draft: &'a NewSessionDraft,
    pub profile: &'a Profile,
    pub credentials: &'a [SavedCredential],
    pub bindings: &'a DefaultBindings,
    pub presence: &'a PresenceSnapshot,
}

/// Resolve the profile's secret requirements against the draft.
///
/// # Errors
///
/// Returns a validation error if the profile declares a malformed name.
pub fn evaluate(input: &PrepareInput<'_>) -> Result<SatisfactionResult> {
    let requirements = requirements::derive(input.profile)?;
    Ok(resolve(&ResolveInput {
        profile_id: &input.profile.id,
        requirements: &requirements,
        credentials: input.credentials,
        bindings: input.bindings,
        selections: input.draft.selections(),
        session_values: input.draft.session_values(),
        machine_env: &input.presence.presence,
    }))
}

/// Build the spawn request for the draft.
///
/// # Errors
///
/// - `ConfigError::IncompatibleProfile` if the profile doesn't support the
///   draft's agent
/// - `ProbeError::Pending` if a required item is unmet while presence is
///   still loading
/// - `CredentialError::MissingRequired` if a required item is unmet
pub fn prepare(input: &PrepareInput<'_>) -> Result<SpawnRequest> {
    let draft = input.draft;
    let profile = input.profile;

    if !profile.supports(draft.agent()) {
        return Err(ConfigError::IncompatibleProfile {
            profile: profile.id.clone(),
            agent: draft.agent().to_string(),
        }
        .into());
    }

    let result = evaluate(input)?;

    if let Some(missing) = result.first_unsatisfied_required() {
        if input.presence.is_loading {
            debug!(
                machine = %draft.machine_id(),
                env_var = %missing.env_var_name,
                "presence still loading"
            );
            return Err(ProbeError::Pending {
                machine: draft.machine_id().to_string(),
            }
            .into());
        }
        return Err(CredentialError::MissingRequired {
            name: missing.env_var_name.clone(),
        }
        .into());
    }

    let overlay = build_overlay(&InjectInput {
        result: &result,
        profile,
        session_values: draft.session_values(),
        credentials: input.credentials,
    })?;

    debug!(
        profile = %profile.id,
        agent = %draft.agent(),
        vars = overlay.len(),
        "spawn request prepared"
    );

    Ok(SpawnRequest {
        machine_id: draft.machine_id().to_string(),
        directory: draft.directory().to_path_buf(),
        agent: draft.agent(),
        profile_id: profile.id.clone(),
        permission_mode: draft.permission_mode().to_string(),
        model_mode: draft.model_mode().to_string(),
        environment_variables: overlay,
    })
}

/// A launched session
#[derive(Debug)]
pub struct SpawnedSession {
    pub session_id: String,
    child: Option<Child>,
}

impl SpawnedSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            child: None,
        }
    }

    /// Wait for a locally launched session; `None` for remote sessions
    pub fn wait(&mut self) -> Result<Option<i32>> {
        match self.child.as_mut() {
            Some(child) => {
                let status = child.wait()?;
                Ok(Some(status.code().unwrap_or(1)))
            }
            None => Ok(None),
        }
    }
}

/// Launches a prepared request
pub trait Spawner {
    /// # Errors
    ///
    /// Returns `SpawnError` if the session couldn't be started.
    fn spawn(&self, request: &SpawnRequest) -> Result<SpawnedSession>;
}

/// Runs the agent CLI as a child of this process
#[derive(Debug, Clone, Default)]
pub struct LocalSpawner;

impl Spawner for LocalSpawner {
    fn spawn(&self, request: &SpawnRequest) -> Result<SpawnedSession> {
        if !request.directory.is_dir() {
            return Err(SpawnError::InvalidDirectory(request.directory.display().to_string()).into());
        }

        let binary = which::which(request.agent.binary())
            .map_err(|_| SpawnError::AgentNotFound(request.agent.binary().to_string()))?;

        let args = agent_args(request.agent, &request.permission_mode, &request.model_mode);
        debug!(
            binary = %binary.display(),
            args = ?args,
            vars = ?request.environment_variables,
            "launching agent"
        );

        let child = Command::new(&binary)
            .args(&args)
            .current_dir(&request.directory)
            .envs(request.environment_variables.iter())
            .spawn()
            .map_err(|e| SpawnError::Rejected(format!("{}: {}", binary.display(), e)))?;

        let session_id = child.id().to_string();
        info!(session = %session_id, agent = %request.agent, "session started");

        Ok(SpawnedSession {
            session_id,
            child: Some(child),
        })
    }
}

/// Command-line flags expressing the modes for `agent`.
///
/// Default modes add no flags.
pub fn agent_args(agent: AgentKind, permission_mode: &str, model_mode: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();

    match (agent, permission_mode) {
        (_, "default") => {}
        (AgentKind::Claude, mode) => {
            args.extend(["--permission-mode".to_string(), mode.to_string()]);
        }
        (AgentKind::Codex, "read-only") => {
            args.extend(["--sandbox".to_string(), "read-only".to_string()]);
        }
        (AgentKind::Codex, "safe-yolo") => args.push("--full-auto".to_string()),
        (AgentKind::Codex, "yolo") => {
            args.push("--dangerously-bypass-approvals-and-sandbox".to_string());
        }
        (AgentKind::Gemini, "safe-yolo") => {
            args.extend(["--approval-mode".to_string(), "auto_edit".to_string()]);
        }
        (AgentKind::Gemini, "yolo") => args.push("--yolo".to_string()),
        _ => {}
    }

    match (agent, model_mode) {
        (_, "default") => {}
        (AgentKind::Codex, mode) => {
            // gpt-5-codex-<effort>
            let (model, effort) = mode.rsplit_once('-').unwrap_or((mode, ""));
            args.extend(["--model".to_string(), model.to_string()]);
            if !effort.is_empty() {
                args.extend([
                    "-c".to_string(),
                    format!("model_reasoning_effort={}", effort),
                ]);
            }
        }
        (_, mode) => args.extend(["--model".to_string(), mode.to_string()]),
    }

    args
}
