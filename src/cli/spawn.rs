//! Spawn command.
//!
//! Resolve every credential the profile needs (prompting when interactive),
//! then launch the agent with the resulting environment.

use tracing::{debug, info};

use crate::cli::session::{apply_sources, probe_local};
use crate::cli::{output, resolve, SpawnArgs};
use crate::core::config::Settings;
use crate::core::constants;
use crate::core::domain::{Identity, ResolutionAction};
use crate::core::draft::{NewSessionDraft, ResolutionOutcome};
use crate::core::probe::{local_machine_id, PresenceCache};
use crate::core::prompt::{AutoPromptController, PromptContext, PromptDecision};
use crate::core::spawn::{evaluate, prepare, LocalSpawner, PrepareInput, Spawner};
use crate::error::{ConfigError, Result};

/// Run the spawn flow; returns the agent's exit code.
pub fn execute(args: SpawnArgs) -> Result<i32> {
    let mut settings = Settings::load()?;
    let home = Settings::home_dir()?;
    let draft_path = NewSessionDraft::default_path(&home);
    let identity_path = home.join(constants::IDENTITY_FILE);

    let mut draft = if args.resume {
        let identity = Identity::load(&identity_path)?;
        NewSessionDraft::load_encrypted(&draft_path, &identity)?
    } else {
        NewSessionDraft::new(local_machine_id(), std::env::current_dir()?)
    };

    if let Some(dir) = &args.dir {
        draft.select_directory(dir);
    }
    if let Some(agent) = args.agent {
        draft.select_agent(agent);
    }

    let profile_id = args
        .profile
        .clone()
        .or_else(|| draft.profile_id().map(str::to_string))
        .ok_or(ConfigError::MissingField { field: "profile" })?;
    let profile = settings.profile(&profile_id)?;
    draft.select_profile(&profile);

    if args.agent.is_none() && !profile.supports(draft.agent()) {
        if let Some(agent) = profile.agents.first() {
            debug!(agent = %agent, "switching to an agent the profile supports");
            draft.select_agent(*agent);
        }
    }
    if let Some(mode) = &args.permission_mode {
        draft.set_permission_mode(mode)?;
    }
    if let Some(mode) = &args.model {
        draft.set_model_mode(mode)?;
    }
    apply_sources(&args.sources, &settings, &profile, &mut draft)?;

    let interactive =
        !args.no_input && atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stderr);
    let mut cache = PresenceCache::new(settings.probe_ttl());
    let mut controller = AutoPromptController::new();

    loop {
        let presence = probe_local(&mut cache, &draft, &profile)?;
        let result = evaluate(&PrepareInput {
            draft: &draft,
            profile: &profile,
            credentials: settings.list_credentials(),
            bindings: &settings.bindings,
            presence: &presence,
        })?;

        let decision = controller.evaluate(&PromptContext {
            machine_id: draft.machine_id(),
            profile_id: &profile.id,
            satisfaction: &result,
            presence_loading: presence.is_loading,
            previous_profile_id: draft.previous_profile_id(),
        });

        let request = match decision {
            PromptDecision::Open(request) if interactive => request,
            other => {
                debug!(decision = ?other, "resolution finished");
                break;
            }
        };

        let action = resolve::prompt(&mut settings, &profile, &request.env_var_name)?;
        let outcome = apply_answer(
            &mut settings,
            &mut draft,
            &profile.id,
            &request.env_var_name,
            action,
        )?;
        if let ResolutionOutcome::Cancelled { revert_to } = outcome {
            output::warn("cancelled");
            if let Some(previous) = revert_to {
                output::dimmed(&format!("profile reverted to {}", previous));
            }
            if args.save_draft {
                let identity = Identity::load_or_generate(&identity_path)?;
                draft.save_encrypted(&draft_path, &identity)?;
            }
            return Ok(1);
        }
    }

    let presence = probe_local(&mut cache, &draft, &profile)?;
    let request = prepare(&PrepareInput {
        draft: &draft,
        profile: &profile,
        credentials: settings.list_credentials(),
        bindings: &settings.bindings,
        presence: &presence,
    })?;

    if args.save_draft {
        let identity = Identity::load_or_generate(&identity_path)?;
        draft.save_encrypted(&draft_path, &identity)?;
        output::dimmed(&format!("draft saved to {}", draft_path.display()));
    }

    if args.dry_run {
        output::data(&serde_json::to_string_pretty(&request.redacted_json())?);
        return Ok(0);
    }

    let mut session = LocalSpawner.spawn(&request)?;
    info!(session = %session.session_id, "waiting for agent");
    output::success(&format!(
        "started {} with {} (session {})",
        request.agent,
        profile.name,
        session.session_id
    ));

    Ok(session.wait()?.unwrap_or(0))
}

/// Apply one prompt answer to the draft.
///
/// A default binding the user asked to keep is written to settings at once,
/// so cancelling a later prompt can't drop it. Cancel restores the profile
/// that was selected before this one.
pub(crate) fn apply_answer(
    settings: &mut Settings,
    draft: &mut NewSessionDraft,
    profile_id: &str,
    env_var: &str,
    action: ResolutionAction,
) -> Result<ResolutionOutcome> {
    let keep_default = matches!(
        action,
        ResolutionAction::SelectSaved {
            set_default: true,
            ..
        }
    );

    let outcome = draft.apply_resolution(profile_id, env_var, action, &mut settings.bindings)?;
    match &outcome {
        ResolutionOutcome::Applied if keep_default => {
            settings.save()?;
            debug!(profile = %profile_id, env_var = %env_var, "default binding saved");
        }
        ResolutionOutcome::Applied => {}
        ResolutionOutcome::Cancelled { .. } => {
            draft.revert_profile();
        }
    }

    Ok(outcome)
}
