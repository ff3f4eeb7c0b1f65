//! Credential requirement derivation.
//!
//! Turns a profile's environment declarations into the requirement list the
//! resolver consumes. Malformed names are rejected here, never deeper.

use std::collections::BTreeMap;

use tracing::trace;

use crate::core::domain::{CredentialRequirement, Profile, RequirementKind};
use crate::core::types::EnvVarName;
use crate::core::validation::validate_name;
use crate::error::Result;

/// Derive the requirement list for a profile.
///
/// Every declared name and alias is validated. When a name is declared more than once
/// the last declaration wins but keeps the position of the first.
///
/// # Errors
///
/// Returns `ValidationError` if any declared name is empty or invalid.
pub fn derive(profile: &Profile) -> Result<Vec<CredentialRequirement>> {
    let mut requirements = Vec::with_capacity(profile.env.len());

    for decl in &profile.env {
        validate_name(&decl.name)?;
        if let Some(alias) = &decl.alias {
            validate_name(alias)?;
        }
        requirements.push(CredentialRequirement {
            env_var_name: decl.name.clone(),
            required: decl.required,
            kind: decl.kind,
        });
    }

    let requirements = dedupe_last_wins(requirements);
    trace!(
        profile = %profile.id,
        count = requirements.len(),
        "derived requirements"
    );

    Ok(requirements)
}

/// Only the `Secret` requirements, deduplicated.
pub fn secret_requirements(requirements: &[CredentialRequirement]) -> Vec<CredentialRequirement> {
    dedupe_last_wins(requirements.to_vec())
        .into_iter()
        .filter(CredentialRequirement::is_secret)
        .collect()
}

/// Collapse duplicate names: last value, first position.
pub fn dedupe_last_wins(requirements: Vec<CredentialRequirement>) -> Vec<CredentialRequirement> {
    let mut out: Vec<CredentialRequirement> = Vec::with_capacity(requirements.len());

    for req in requirements {
        match out
            .iter_mut()
            .find(|existing| existing.env_var_name == req.env_var_name)
        {
            Some(existing) => *existing = req,
            None => out.push(req),
        }
    }

    out
}

/// Plain values the profile supplies directly.
///
/// A plain declaration that is later redeclared as a secret is dropped, and
/// plain declarations without a value are skipped.
pub fn plain_values(profile: &Profile) -> BTreeMap<EnvVarName, String> {
    let mut values = BTreeMap::new();

    for decl in &profile.env {
        match (decl.kind, &decl.value) {
            (RequirementKind::Plain, Some(value)) => {
                values.insert(decl.name.clone(), value.clone());
            }
            _ => {
                values.remove(&decl.name);
            }
        }
    }

    values
}

/// Alias of the last declaration of `name`, if any.
pub fn alias_for<'a>(profile: &'a Profile, name: &str) -> Option<&'a str> {
    profile
        .env
        .iter()
        .rev()
        .find(|decl| decl.name == name)
        .and_then(|decl| decl.alias.as_deref())
}
