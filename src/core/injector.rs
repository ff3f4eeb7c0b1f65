//! Spawn-time environment injection.
//!
//! Builds the environment overlay sent with a spawn request from a
//! satisfaction verdict. Variables satisfied by the machine environment are
//! never injected: the daemon already has them.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::bindings::SessionValues;
use crate::core::domain::{Profile, SatisfactionResult, SatisfiedBy, SavedCredential};
use crate::core::requirements;
use crate::core::types::EnvVarName;
use crate::error::{CredentialError, Result};

/// Final environment variables for a session.
///
/// Values are wiped on drop and redacted from `Debug`. `Serialize` writes
/// real values, for the spawn call only.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct EnvOverlay {
    vars: BTreeMap<EnvVarName, Zeroizing<String>>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.vars
            .insert(name.to_string(), Zeroizing::new(value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|v| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Names mapped to `"<redacted>"`, for display
    pub fn redacted(&self) -> BTreeMap<String, String> {
        self.vars
            .keys()
            .map(|k| (k.clone(), "<redacted>".to_string()))
            .collect()
    }
}

impl std::fmt::Debug for EnvOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.vars.keys()).finish()
    }
}

impl Serialize for EnvOverlay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.vars.len()))?;
        for (k, v) in &self.vars {
            map.serialize_entry(k, v.as_str())?;
        }
        map.end()
    }
}

/// Sources the injector reads values from
#[derive(Debug, Clone, Copy)]
pub struct InjectInput<'a> {
    pub result: &'a SatisfactionResult,
    pub profile: &'a Profile,
    pub session_values: &'a SessionValues,
    pub credentials: &'a [SavedCredential],
}

/// Build the environment overlay for a spawn.
///
/// Plain profile values come first; satisfied secrets are layered on top,
/// except those satisfied by the machine environment. An injected secret is
/// also written under its declared alias. Unsatisfied optional secrets are
/// omitted.
///
/// # Errors
///
/// Returns `CredentialError::MissingRequired` for the first unsatisfied
/// required item, or `CredentialError::NotFound` if a saved credential named
/// by the verdict is gone.
pub fn build_overlay(input: &InjectInput<'_>) -> Result<EnvOverlay> {
    if let Some(missing) = input.result.first_unsatisfied_required() {
        return Err(CredentialError::MissingRequired {
            name: missing.env_var_name.clone(),
        }
        .into());
    }

    let mut overlay = EnvOverlay::new();
    for (name, value) in requirements::plain_values(input.profile) {
        overlay.insert(&name, &value);
    }

    for item in &input.result.items {
        let Some(source) = item.satisfied_by.filter(|_| item.is_satisfied) else {
            trace!(env_var = %item.env_var_name, "optional secret not set");
            continue;
        };

        match source {
            SatisfiedBy::SessionOnly => {
                let value = input
                    .session_values
                    .get(&input.profile.id, &item.env_var_name)
                    .ok_or_else(|| CredentialError::MissingRequired {
                        name: item.env_var_name.clone(),
                    })?;
                insert_secret(&mut overlay, input.profile, &item.env_var_name, value);
            }
            SatisfiedBy::SelectedSaved | SatisfiedBy::RememberedSaved | SatisfiedBy::DefaultSaved => {
                let id = item.saved_secret_id.as_deref().unwrap_or_default();
                let credential = input
                    .credentials
                    .iter()
                    .find(|c| c.id() == id)
                    .ok_or_else(|| {
                        let available: Vec<String> =
                            input.credentials.iter().map(|c| c.id().to_string()).collect();
                        CredentialError::not_found_with_suggestions(id.to_string(), &available)
                    })?;
                insert_secret(
                    &mut overlay,
                    input.profile,
                    &item.env_var_name,
                    credential.value(),
                );
            }
            SatisfiedBy::MachineEnv => {
                trace!(env_var = %item.env_var_name, "left to machine environment");
            }
        }
    }

    debug!(
        profile = %input.profile.id,
        vars = overlay.len(),
        "built environment overlay"
    );

    Ok(overlay)
}

fn insert_secret(overlay: &mut EnvOverlay, profile: &Profile, name: &str, value: &str) {
    overlay.insert(name, value);
    if let Some(alias) = requirements::alias_for(profile, name) {
        trace!(env_var = %name, alias = %alias, "exporting alias");
        overlay.insert(alias, value);
    }
}
