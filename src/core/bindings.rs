//! Credential source preferences.
//!
//! - [`DefaultBindings`]: persisted "always use this credential for this
//!   profile and variable" choices.
//! - [`Selections`]: per-session explicit choices (saved id or "prefer the
//!   machine environment").
//! - [`SessionValues`]: values typed for a single launch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::types::{CredentialId, EnvVarName, ProfileId};

/// Persisted shape: `profile -> variable -> credential id`.
pub type BindingTable = BTreeMap<ProfileId, BTreeMap<EnvVarName, CredentialId>>;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    credential_id: CredentialId,
    /// Created during this run rather than loaded from settings
    remembered: bool,
}

/// A default binding as seen by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingRef<'a> {
    pub credential_id: &'a str,
    pub remembered: bool,
}

/// Default credential bindings keyed by profile and variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BindingTable", into = "BindingTable")]
pub struct DefaultBindings {
    entries: BTreeMap<ProfileId, BTreeMap<EnvVarName, Binding>>,
}

impl DefaultBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding for `(profile, env_var)`, if any
    pub fn get(&self, profile_id: &str, env_var: &str) -> Option<BindingRef<'_>> {
        self.entries
            .get(profile_id)
            .and_then(|vars| vars.get(env_var))
            .map(|b| BindingRef {
                credential_id: &b.credential_id,
                remembered: b.remembered,
            })
    }

    /// Set a binding as if loaded from settings
    pub fn bind(&mut self, profile_id: &str, env_var: &str, credential_id: &str) {
        self.insert(profile_id, env_var, credential_id, false);
    }

    /// Set a binding chosen in the current resolution flow
    pub fn remember(&mut self, profile_id: &str, env_var: &str, credential_id: &str) {
        self.insert(profile_id, env_var, credential_id, true);
    }

    fn insert(&mut self, profile_id: &str, env_var: &str, credential_id: &str, remembered: bool) {
        debug!(
            profile = %profile_id,
            env_var = %env_var,
            remembered,
            "binding credential"
        );
        self.entries.entry(profile_id.to_string()).or_default().insert(
            env_var.to_string(),
            Binding {
                credential_id: credential_id.to_string(),
                remembered,
            },
        );
    }

    /// Remove a binding; returns whether one existed
    pub fn unbind(&mut self, profile_id: &str, env_var: &str) -> bool {
        let Some(vars) = self.entries.get_mut(profile_id) else {
            return false;
        };
        let removed = vars.remove(env_var).is_some();
        if vars.is_empty() {
            self.entries.remove(profile_id);
        }
        removed
    }

    /// Drop every binding pointing at `credential_id`; returns how many
    pub fn forget_credential(&mut self, credential_id: &str) -> usize {
        let mut removed = 0;
        for vars in self.entries.values_mut() {
            let before = vars.len();
            vars.retain(|_, b| b.credential_id != credential_id);
            removed += before - vars.len();
        }
        self.entries.retain(|_, vars| !vars.is_empty());
        removed
    }

    /// Every binding, as `(profile, variable, credential id)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.entries.iter().flat_map(|(profile, vars)| {
            vars.iter()
                .map(move |(name, b)| (profile.as_str(), name.as_str(), b.credential_id.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BindingTable> for DefaultBindings {
    fn from(table: BindingTable) -> Self {
        let entries = table
            .into_iter()
            .map(|(profile, vars)| {
                let vars = vars
                    .into_iter()
                    .map(|(name, credential_id)| {
                        (
                            name,
                            Binding {
                                credential_id,
                                remembered: false,
                            },
                        )
                    })
                    .collect();
                (profile, vars)
            })
            .collect();
        Self { entries }
    }
}

impl From<DefaultBindings> for BindingTable {
    fn from(bindings: DefaultBindings) -> Self {
        bindings
            .entries
            .into_iter()
            .map(|(profile, vars)| {
                let vars = vars
                    .into_iter()
                    .map(|(name, b)| (name, b.credential_id))
                    .collect();
                (profile, vars)
            })
            .collect()
    }
}

/// Explicit per-session choice for one variable.
///
/// Absence from [`Selections`] means "no explicit choice".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    /// Skip saved credentials and rely on the machine environment.
    /// Stored as the empty string.
    PreferMachine,
    /// Use this saved credential
    Saved(CredentialId),
}

impl From<String> for Selection {
    fn from(raw: String) -> Self {
        if raw.is_empty() {
            Self::PreferMachine
        } else {
            Self::Saved(raw)
        }
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::PreferMachine => String::new(),
            Selection::Saved(id) => id,
        }
    }
}

/// Per-profile, per-variable explicit selections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections {
    by_profile: BTreeMap<ProfileId, BTreeMap<EnvVarName, Selection>>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, profile_id: &str, env_var: &str) -> Option<&Selection> {
        self.by_profile
            .get(profile_id)
            .and_then(|vars| vars.get(env_var))
    }

    pub fn set(&mut self, profile_id: &str, env_var: &str, selection: Selection) {
        self.by_profile
            .entry(profile_id.to_string())
            .or_default()
            .insert(env_var.to_string(), selection);
    }

    /// Back to "no explicit choice"
    pub fn clear(&mut self, profile_id: &str, env_var: &str) {
        if let Some(vars) = self.by_profile.get_mut(profile_id) {
            vars.remove(env_var);
            if vars.is_empty() {
                self.by_profile.remove(profile_id);
            }
        }
    }

    /// Clear every selection pointing at `credential_id`; returns how many
    pub fn forget_credential(&mut self, credential_id: &str) -> usize {
        let mut removed = 0;
        for vars in self.by_profile.values_mut() {
            let before = vars.len();
            vars.retain(|_, s| !matches!(s, Selection::Saved(id) if id == credential_id));
            removed += before - vars.len();
        }
        self.by_profile.retain(|_, vars| !vars.is_empty());
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.by_profile.is_empty()
    }
}

/// Values entered for a single launch; never written to the credential list.
#[derive(Default, Clone)]
pub struct SessionValues {
    by_profile: BTreeMap<ProfileId, BTreeMap<EnvVarName, Zeroizing<String>>>,
}

impl SessionValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-empty value for `(profile, env_var)`
    pub fn get(&self, profile_id: &str, env_var: &str) -> Option<&str> {
        self.by_profile
            .get(profile_id)
            .and_then(|vars| vars.get(env_var))
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, profile_id: &str, env_var: &str, value: Zeroizing<String>) {
        self.by_profile
            .entry(profile_id.to_string())
            .or_default()
            .insert(env_var.to_string(), value);
    }

    pub fn clear(&mut self, profile_id: &str, env_var: &str) {
        if let Some(vars) = self.by_profile.get_mut(profile_id) {
            vars.remove(env_var);
            if vars.is_empty() {
                self.by_profile.remove(profile_id);
            }
        }
    }

    /// Every entry, as `(profile, variable, value)`
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.by_profile.iter().flat_map(|(profile, vars)| {
            vars.iter()
                .map(move |(name, v)| (profile.as_str(), name.as_str(), v.as_str()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.by_profile.is_empty()
    }
}

impl std::fmt::Debug for SessionValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .iter()
            .map(|(profile, name, _)| format!("{}:{}", profile, name))
            .collect();
        f.debug_struct("SessionValues").field("names", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_get() {
        let mut bindings = DefaultBindings::new();
        bindings.bind("deepseek", "DEEPSEEK_API_KEY", "c1");

        let binding = bindings.get("deepseek", "DEEPSEEK_API_KEY").unwrap();
        assert_eq!(binding.credential_id, "c1");
        assert!(!binding.remembered);
        assert!(bindings.get("deepseek", "OTHER").is_none());
        assert!(bindings.get("other", "DEEPSEEK_API_KEY").is_none());
    }

    #[test]
    fn test_remembered_flag_lost_on_persist() {
        let mut bindings = DefaultBindings::new();
        bindings.remember("p", "KEY", "c1");
        assert!(bindings.get("p", "KEY").unwrap().remembered);

        let text = toml::to_string(&Wrapper {
            bindings: bindings.clone(),
        })
        .unwrap();
        let reloaded: Wrapper = toml::from_str(&text).unwrap();

        let binding = reloaded.bindings.get("p", "KEY").unwrap();
        assert_eq!(binding.credential_id, "c1");
        assert!(!binding.remembered);
    }

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        bindings: DefaultBindings,
    }

    #[test]
    fn test_unbind_prunes_empty_profiles() {
        let mut bindings = DefaultBindings::new();
        bindings.bind("p", "KEY", "c1");

        assert!(bindings.unbind("p", "KEY"));
        assert!(!bindings.unbind("p", "KEY"));
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_forget_credential_cascades() {
        let mut bindings = DefaultBindings::new();
        bindings.bind("a", "KEY", "c1");
        bindings.bind("b", "KEY", "c1");
        bindings.bind("b", "OTHER", "c2");

        assert_eq!(bindings.forget_credential("c1"), 2);
        assert_eq!(bindings.len(), 1);
        assert!(bindings.get("a", "KEY").is_none());
        assert_eq!(bindings.get("b", "OTHER").unwrap().credential_id, "c2");
    }

    #[test]
    fn test_selection_string_encoding() {
        assert_eq!(Selection::from(String::new()), Selection::PreferMachine);
        assert_eq!(
            Selection::from("c1".to_string()),
            Selection::Saved("c1".to_string())
        );
        assert_eq!(String::from(Selection::PreferMachine), "");
    }

    #[test]
    fn test_selections_forget_credential() {
        let mut selections = Selections::new();
        selections.set("p", "A", Selection::Saved("c1".to_string()));
        selections.set("p", "B", Selection::PreferMachine);

        assert_eq!(selections.forget_credential("c1"), 1);
        assert!(selections.get("p", "A").is_none());
        assert_eq!(selections.get("p", "B"), Some(&Selection::PreferMachine));
    }

    #[test]
    fn test_session_values_ignore_empty() {
        let mut values = SessionValues::new();
        values.set("p", "A", Zeroizing::new(String::new()));
        values.set("p", "B", Zeroizing::new("sk".to_string()));

        assert_eq!(values.get("p", "A"), None);
        assert_eq!(values.get("p", "B"), Some("sk"));
    }

    #[test]
    fn test_session_values_debug_hides_values() {
        let mut values = SessionValues::new();
        values.set("p", "A", Zeroizing::new("sk-hidden".to_string()));

        let debug = format!("{:?}", values);
        assert!(debug.contains("p:A"));
        assert!(!debug.contains("sk-hidden"));
    }
}
