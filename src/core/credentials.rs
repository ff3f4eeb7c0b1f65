//! Credential store operations.
//!
//! CRUD over the saved credential list in [`Settings`]. Mutations are in
//! memory; callers persist with [`Settings::save`].

use tracing::debug;

use crate::core::config::Settings;
use crate::core::domain::SavedCredential;
use crate::core::types::CredentialId;
use crate::core::validation::validate_value;
use crate::error::{CredentialError, Result};

impl Settings {
    /// All saved credentials, in creation order
    pub fn list_credentials(&self) -> &[SavedCredential] {
        &self.credentials
    }

    /// Credential with exactly this id
    pub fn credential(&self, id: &str) -> Option<&SavedCredential> {
        self.credentials.iter().find(|c| c.id() == id)
    }

    /// Find a credential by full id or unique id prefix
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::NotFound` if nothing matches or
    /// `CredentialError::Ambiguous` if the prefix matches several ids.
    pub fn find_credential(&self, id_or_prefix: &str) -> Result<&SavedCredential> {
        if let Some(exact) = self.credential(id_or_prefix) {
            return Ok(exact);
        }

        let mut matches = self
            .credentials
            .iter()
            .filter(|c| !id_or_prefix.is_empty() && c.id().starts_with(id_or_prefix));

        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(found),
            (Some(_), Some(_)) => Err(CredentialError::Ambiguous(id_or_prefix.to_string()).into()),
            _ => Err(self.not_found(id_or_prefix).into()),
        }
    }

    /// Save a new credential and return its id
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyValue` if `value` is empty.
    pub fn save_credential(&mut self, value: &str, label: Option<&str>) -> Result<CredentialId> {
        validate_value("credential", value)?;

        let credential = SavedCredential::new(value.to_string(), clean_label(label));
        let id = credential.id().to_string();
        debug!(credential = %id, "saving credential");

        self.credentials.push(credential);
        Ok(id)
    }

    /// Replace a credential's value and/or label
    pub fn edit_credential(
        &mut self,
        id_or_prefix: &str,
        value: Option<&str>,
        label: Option<&str>,
    ) -> Result<CredentialId> {
        if let Some(value) = value {
            validate_value("credential", value)?;
        }
        let id = self.find_credential(id_or_prefix)?.id().to_string();

        let credential = self
            .credentials
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| CredentialError::NotFound {
                id: id.clone(),
                suggestions: Vec::new(),
            })?;

        if let Some(value) = value {
            credential.replace_value(value.to_string());
        }
        if label.is_some() {
            credential.set_label(clean_label(label));
        }

        debug!(credential = %id, "edited credential");
        Ok(id)
    }

    /// Delete a credential and every default binding that pointed at it
    ///
    /// Returns the id of the deleted credential and how many bindings were removed.
    pub fn delete_credential(&mut self, id_or_prefix: &str) -> Result<(CredentialId, usize)> {
        let id = self.find_credential(id_or_prefix)?.id().to_string();

        self.credentials.retain(|c| c.id() != id);
        let unbound = self.bindings.forget_credential(&id);

        debug!(credential = %id, unbound, "deleted credential");
        Ok((id, unbound))
    }

    fn not_found(&self, id: &str) -> CredentialError {
        let available: Vec<String> = self.credentials.iter().map(|c| c.id().to_string()).collect();
        CredentialError::not_found_with_suggestions(id.to_string(), &available)
    }
}

fn clean_label(label: Option<&str>) -> Option<String> {
    label
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::new("unused.toml")
    }

    #[test]
    fn test_save_and_list() {
        let mut s = settings();
        let id = s.save_credential("sk-1", Some(" work ")).unwrap();

        assert_eq!(s.list_credentials().len(), 1);
        let cred = s.credential(&id).unwrap();
        assert_eq!(cred.value(), "sk-1");
        assert_eq!(cred.label(), Some("work"));
    }

    #[test]
    fn test_save_rejects_empty_value() {
        let mut s = settings();
        assert!(s.save_credential("", None).is_err());
        assert!(s.list_credentials().is_empty());
    }

    #[test]
    fn test_find_by_prefix() {
        let mut s = settings();
        s.credentials
            .push(SavedCredential::with_id("abc123", "v1".to_string(), None));
        s.credentials
            .push(SavedCredential::with_id("abd456", "v2".to_string(), None));

        assert_eq!(s.find_credential("abc").unwrap().id(), "abc123");
        assert_eq!(s.find_credential("abd456").unwrap().id(), "abd456");
        assert!(matches!(
            s.find_credential("ab"),
            Err(crate::error::Error::Credential(CredentialError::Ambiguous(_)))
        ));
        assert!(matches!(
            s.find_credential("zz"),
            Err(crate::error::Error::Credential(CredentialError::NotFound { .. }))
        ));
        assert!(s.find_credential("").is_err());
    }

    #[test]
    fn test_edit() {
        let mut s = settings();
        let id = s.save_credential("old", None).unwrap();

        s.edit_credential(&id, Some("new"), Some("renamed")).unwrap();
        let cred = s.credential(&id).unwrap();
        assert_eq!(cred.value(), "new");
        assert_eq!(cred.label(), Some("renamed"));

        s.edit_credential(&id, None, Some("")).unwrap();
        assert_eq!(s.credential(&id).unwrap().label(), None);
        assert_eq!(s.credential(&id).unwrap().value(), "new");

        assert!(s.edit_credential(&id, Some(""), None).is_err());
    }

    #[test]
    fn test_delete_cascades_bindings() {
        let mut s = settings();
        let keep = s.save_credential("keep", None).unwrap();
        let gone = s.save_credential("gone", None).unwrap();
        s.bindings.bind("a", "KEY", &gone);
        s.bindings.bind("b", "KEY", &gone);
        s.bindings.bind("b", "OTHER", &keep);

        let (deleted, unbound) = s.delete_credential(&gone).unwrap();

        assert_eq!(deleted, gone);
        assert_eq!(unbound, 2);
        assert!(s.credential(&gone).is_none());
        assert_eq!(s.bindings.len(), 1);
    }

    #[test]
    fn test_delete_unknown() {
        let mut s = settings();
        assert!(s.delete_credential("nope").is_err());
    }
}
