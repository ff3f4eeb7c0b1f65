//! Profile commands.

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::domain::RequirementKind;
use crate::error::Result;

/// List every profile.
pub fn list(json: bool) -> Result<()> {
    let settings = Settings::load()?;
    let profiles = settings.all_profiles();

    if json {
        output::data(&serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    output::blank();
    output::header(&format!("{} profiles", output::count(profiles.len())));
    output::rule();
    for p in &profiles {
        let agents: Vec<&str> = p.agents.iter().map(|a| a.as_str()).collect();
        output::kv(
            &output::key(&p.id),
            format!("{}  [{}]", p.name, agents.join(", ")),
        );
    }
    Ok(())
}

/// Show one profile's variables and default bindings.
pub fn show(id: &str) -> Result<()> {
    let settings = Settings::load()?;
    let profile = settings.profile(id)?;

    output::blank();
    output::header(&format!("{} ({})", profile.name, output::key(&profile.id)));
    output::rule();
    if let Some(url) = &profile.base_url {
        output::kv("base url", url);
    }
    if let Some(model) = &profile.model {
        output::kv("model", model);
    }
    let agents: Vec<&str> = profile.agents.iter().map(|a| a.as_str()).collect();
    output::kv("agents", agents.join(", "));

    output::section("variables");
    for decl in &profile.env {
        let detail = match (decl.kind, &decl.value) {
            (RequirementKind::Secret, _) => {
                let binding = settings
                    .bindings
                    .get(&profile.id, &decl.name)
                    .map(|b| {
                        settings
                            .credential(b.credential_id)
                            .map(|c| format!("default: {}", c))
                            .unwrap_or_else(|| format!("default: {} (deleted)", b.credential_id))
                    })
                    .unwrap_or_else(|| "no default".to_string());
                let need = if decl.required { "required" } else { "optional" };
                match &decl.alias {
                    Some(alias) => format!("secret, {}, {}, also as {}", need, binding, alias),
                    None => format!("secret, {}, {}", need, binding),
                }
            }
            (RequirementKind::Plain, Some(value)) => value.clone(),
            (RequirementKind::Plain, None) => "(unset)".to_string(),
        };
        output::kv(&output::key(&decl.name), detail);
    }
    Ok(())
}
