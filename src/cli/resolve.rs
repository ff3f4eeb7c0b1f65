//! Interactive resolution prompt.
//!
//! Asks how to satisfy one missing credential and returns the choice as a
//! [`ResolutionAction`].

use dialoguer::{Confirm, Password, Select};
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::domain::{Profile, ResolutionAction};
use crate::error::Result;

enum Choice {
    Saved(String),
    SaveNew,
    EnterOnce,
    UseMachine,
    Cancel,
}

/// Prompt for `env_var` of `profile`.
///
/// "Save a new credential" stores the value in `settings` (and writes the
/// settings file) before selecting it.
pub fn prompt(settings: &mut Settings, profile: &Profile, env_var: &str) -> Result<ResolutionAction> {
    output::blank();
    output::warn(&format!(
        "{} needs {}",
        profile.name,
        output::key(env_var)
    ));

    let mut choices: Vec<Choice> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    for c in settings.list_credentials() {
        choices.push(Choice::Saved(c.id().to_string()));
        labels.push(format!("Use saved: {}", c));
    }
    choices.push(Choice::SaveNew);
    labels.push("Save a new credential".to_string());
    choices.push(Choice::EnterOnce);
    labels.push("Enter a value for this session only".to_string());
    choices.push(Choice::UseMachine);
    labels.push("Use the machine environment".to_string());
    choices.push(Choice::Cancel);
    labels.push("Cancel".to_string());

    let picked = Select::new()
        .with_prompt(format!("Provide {}", env_var))
        .items(&labels)
        .default(0)
        .interact_opt()?;

    let action = match picked.and_then(|i| choices.get(i)) {
        None | Some(Choice::Cancel) => ResolutionAction::Cancel,
        Some(Choice::UseMachine) => ResolutionAction::UseMachine,
        Some(Choice::EnterOnce) => ResolutionAction::EnterOnce {
            value: read_value(env_var)?,
        },
        Some(Choice::Saved(id)) => {
            ResolutionAction::select_saved(id.clone(), ask_default(profile, env_var)?)
        }
        Some(Choice::SaveNew) => {
            let value = read_value(env_var)?;
            let label = format!("{} {}", profile.id, env_var);
            let set_default = ask_default(profile, env_var)?;
            let id = settings.save_credential(&value, Some(label.as_str()))?;
            settings.save()?;
            output::success(&format!("saved {}", output::key(&id)));
            ResolutionAction::select_saved(id, set_default)
        }
    };

    debug!(env_var = %env_var, "resolution chosen");
    Ok(action)
}

fn read_value(env_var: &str) -> Result<Zeroizing<String>> {
    let value = Password::new()
        .with_prompt(format!("Value for {}", env_var))
        .interact()?;
    Ok(Zeroizing::new(value))
}

fn ask_default(profile: &Profile, env_var: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(format!(
            "Always use it for {} in {}?",
            env_var, profile.name
        ))
        .default(true)
        .interact()?)
}
