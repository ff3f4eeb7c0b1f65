//! Helpers shared by `check` and `spawn`.

use tracing::debug;

use crate::cli::SourceArgs;
use crate::core::bindings::DefaultBindings;
use crate::core::config::Settings;
use crate::core::domain::{Profile, ResolutionAction};
use crate::core::draft::NewSessionDraft;
use crate::core::probe::{LocalPresence, PresenceCache, PresenceSnapshot};
use crate::core::requirements;
use crate::core::validation::{parse_assignment, validate_name};
use crate::error::Result;

/// Apply `--use`, `--prefer-machine`, and `--once` to the draft.
///
/// Command-line choices never become default bindings.
pub fn apply_sources(
    sources: &SourceArgs,
    settings: &Settings,
    profile: &Profile,
    draft: &mut NewSessionDraft,
) -> Result<()> {
    let mut scratch = DefaultBindings::new();

    for raw in &sources.use_saved {
        let (var, id) = parse_assignment(raw)?;
        let credential = settings.find_credential(&id)?;
        draft.apply_resolution(
            &profile.id,
            &var,
            ResolutionAction::select_saved(credential.id(), false),
            &mut scratch,
        )?;
    }

    for var in &sources.prefer_machine {
        validate_name(var)?;
        draft.apply_resolution(&profile.id, var, ResolutionAction::UseMachine, &mut scratch)?;
    }

    for raw in &sources.once {
        let (var, value) = parse_assignment(raw)?;
        draft.apply_resolution(
            &profile.id,
            &var,
            ResolutionAction::enter_once(value),
            &mut scratch,
        )?;
    }

    Ok(())
}

/// Names of the profile's secret requirements
pub fn secret_names(profile: &Profile) -> Result<Vec<String>> {
    let requirements = requirements::derive(profile)?;
    Ok(requirements::secret_requirements(&requirements)
        .into_iter()
        .map(|r| r.env_var_name)
        .collect())
}

/// Probe the local environment for the profile's secrets.
pub fn probe_local(
    cache: &mut PresenceCache,
    draft: &NewSessionDraft,
    profile: &Profile,
) -> Result<PresenceSnapshot> {
    let names = secret_names(profile)?;
    let source = LocalPresence::new(draft.machine_id());
    let snapshot = cache.refresh(&source, draft.machine_id(), &names);

    if let Some(reason) = cache.last_error(draft.machine_id()) {
        debug!(machine = %draft.machine_id(), reason, "presence check failed");
    }
    Ok(snapshot)
}
