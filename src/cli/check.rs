//! Check command.
//!
//! Report how each secret of a profile would be satisfied on this machine.

use crate::cli::session::{apply_sources, probe_local};
use crate::cli::{output, CheckArgs};
use crate::core::config::Settings;
use crate::core::domain::{SatisfactionItem, SatisfactionResult};
use crate::core::draft::NewSessionDraft;
use crate::core::probe::{local_machine_id, PresenceCache};
use crate::core::spawn::{evaluate, PrepareInput};
use crate::error::Result;

/// Print the satisfaction table; exit code 1 when unsatisfied.
pub fn execute(args: CheckArgs) -> Result<i32> {
    let settings = Settings::load()?;
    let profile = settings.profile(&args.profile)?;

    let mut draft = NewSessionDraft::new(local_machine_id(), std::env::current_dir()?);
    draft.select_profile(&profile);
    apply_sources(&args.sources, &settings, &profile, &mut draft)?;

    let mut cache = PresenceCache::new(settings.probe_ttl());
    let presence = probe_local(&mut cache, &draft, &profile)?;

    let result = evaluate(&PrepareInput {
        draft: &draft,
        profile: &profile,
        credentials: settings.list_credentials(),
        bindings: &settings.bindings,
        presence: &presence,
    })?;

    if args.json {
        let report = serde_json::json!({
            "profile": profile.id,
            "machine": draft.machine_id(),
            "result": result,
        });
        output::data(&serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&settings, &profile.id, &result);
    }

    Ok(if result.is_satisfied { 0 } else { 1 })
}

fn print_table(settings: &Settings, profile_id: &str, result: &SatisfactionResult) {
    if !result.has_secret_requirements {
        output::dimmed(&format!("{} needs no credentials", profile_id));
        return;
    }

    output::blank();
    output::header(&format!("credentials for {}", output::key(profile_id)));
    output::rule();
    for item in &result.items {
        println!(
            "  {} {}  {}",
            output::mark(item.is_satisfied || !item.required),
            output::key(&item.env_var_name),
            describe(settings, item)
        );
    }
    output::blank();

    if let Some(missing) = result.first_unsatisfied_required() {
        output::warn(&format!("{} is not set", missing.env_var_name));
        output::hint(&format!(
            "run: sesame check --profile {} --once {}=VALUE, or sesame secret add",
            profile_id, missing.env_var_name
        ));
    }
}

fn describe(settings: &Settings, item: &SatisfactionItem) -> String {
    match (item.satisfied_by, item.saved_secret_id.as_deref()) {
        (Some(source), Some(id)) => {
            let name = settings
                .credential(id)
                .map(|c| c.to_string())
                .unwrap_or_else(|| id.to_string());
            format!("{} ({})", source.describe(), name)
        }
        (Some(source), None) => source.describe().to_string(),
        (None, _) if item.required => "missing".to_string(),
        (None, _) => "not set (optional)".to_string(),
    }
}
