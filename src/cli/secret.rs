//! Secret commands.
//!
//! Save, list, edit, and delete user-level credentials.

use std::io;

use dialoguer::Password;
use tracing::info;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::constants;
use crate::core::draft::NewSessionDraft;
use crate::error::{Result, ValidationError};

/// Save a new credential.
///
/// Without VALUE, reads a line from piped stdin or prompts with hidden input.
pub fn add(label: Option<&str>, value: Option<String>) -> Result<()> {
    let mut settings = Settings::load()?;

    let value = Zeroizing::new(match value {
        Some(v) => v,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            input.trim().to_string()
        }
        None => Password::new().with_prompt("Credential value").interact()?,
    });

    if value.is_empty() {
        return Err(ValidationError::EmptyValue("credential".to_string()).into());
    }

    let id = settings.save_credential(&value, label)?;
    settings.save()?;

    info!(credential = %id, "credential saved");
    let saved = settings.credential(&id).map(|c| c.to_string()).unwrap_or_default();
    output::success(&format!("saved {}", saved));
    output::data(&id);
    Ok(())
}

/// List saved credentials without values.
pub fn list(json: bool) -> Result<()> {
    let settings = Settings::load()?;
    let credentials = settings.list_credentials();

    if json {
        let items: Vec<_> = credentials
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id(),
                    "label": c.label(),
                    "fingerprint": c.fingerprint(),
                    "created_at": c.created_at().to_rfc3339(),
                    "bound_to": settings
                        .bindings
                        .iter()
                        .filter(|(_, _, id)| *id == c.id())
                        .map(|(profile, var, _)| format!("{}:{}", profile, var))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        let result = serde_json::json!({
            "credentials": items,
            "count": credentials.len(),
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else if credentials.is_empty() {
        output::dimmed("no saved credentials");
    } else {
        output::blank();
        output::header(&format!(
            "{} saved credentials",
            output::count(credentials.len())
        ));
        output::rule();
        for c in credentials {
            output::kv(
                &output::key(c.short_id()),
                format!("{}  {}", c, c.created_at().format("%Y-%m-%d")),
            );
        }
    }

    Ok(())
}

/// Delete a credential and every binding that used it.
pub fn rm(id: &str) -> Result<()> {
    let mut settings = Settings::load()?;
    let (deleted, unbound) = settings.delete_credential(id)?;
    settings.save()?;

    let home = Settings::home_dir()?;
    let unselected = NewSessionDraft::forget_credential_in_file(
        &NewSessionDraft::default_path(&home),
        &home.join(constants::IDENTITY_FILE),
        &deleted,
    )?;

    output::success(&format!("removed {}", output::key(&deleted)));
    if unbound > 0 {
        output::dimmed(&format!("cleared {} default binding(s)", unbound));
    }
    if unselected > 0 {
        output::dimmed(&format!("cleared {} draft selection(s)", unselected));
    }
    Ok(())
}

/// Change a credential's label and/or value.
pub fn edit(id: &str, label: Option<&str>, value: Option<&str>) -> Result<()> {
    if label.is_none() && value.is_none() {
        output::warn("nothing to change");
        output::hint("pass --label and/or --value");
        return Ok(());
    }

    let mut settings = Settings::load()?;
    let id = settings.edit_credential(id, value, label)?;
    settings.save()?;

    let shown = settings.credential(&id).map(|c| c.to_string()).unwrap_or(id);
    output::success(&format!("updated {}", shown));
    Ok(())
}
