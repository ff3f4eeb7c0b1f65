//! Bind and unbind commands.

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::validation::validate_name;
use crate::error::Result;

/// Make a saved credential the default for `(profile, var)`.
pub fn bind(profile_id: &str, var: &str, id: &str) -> Result<()> {
    validate_name(var)?;

    let mut settings = Settings::load()?;
    let profile = settings.profile(profile_id)?;
    let credential_id = settings.find_credential(id)?.id().to_string();

    if !profile.env.iter().any(|d| d.name == var) {
        output::warn(&format!(
            "{} does not declare {}",
            profile.id,
            output::key(var)
        ));
    }

    settings.bindings.bind(&profile.id, var, &credential_id);
    settings.save()?;

    output::success(&format!(
        "{}:{} -> {}",
        profile.id,
        output::key(var),
        settings
            .credential(&credential_id)
            .map(|c| c.to_string())
            .unwrap_or(credential_id)
    ));
    Ok(())
}

/// Remove the default binding for `(profile, var)`.
pub fn unbind(profile_id: &str, var: &str) -> Result<()> {
    let mut settings = Settings::load()?;

    if settings.bindings.unbind(profile_id, var) {
        settings.save()?;
        output::success(&format!("unbound {}:{}", profile_id, output::key(var)));
    } else {
        output::dimmed(&format!("no binding for {}:{}", profile_id, var));
    }
    Ok(())
}
