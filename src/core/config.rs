//! Settings file management.
//!
//! Handles reading, writing, and validating `settings.toml`: saved
//! credentials, default bindings, user profiles, and probe tuning.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::bindings::DefaultBindings;
use crate::core::constants;
use crate::core::domain::{Profile, SavedCredential};
use crate::core::profiles;
use crate::core::validation::validate_name;
use crate::error::{ConfigError, Result};

/// User settings stored in `settings.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Metadata about the settings file
    pub sesame: Meta,
    /// Presence probe tuning
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Saved credentials, in creation order
    #[serde(default)]
    pub credentials: Vec<SavedCredential>,
    /// Default credential per profile and variable
    #[serde(default)]
    pub bindings: DefaultBindings,
    /// User-defined profiles; shadow built-ins with the same id
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(skip)]
    path: PathBuf,
}

/// Metadata section of the settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    /// Settings format version
    pub version: String,
}

/// `[probe]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// How long a presence result stays fresh
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    constants::DEFAULT_PROBE_TTL_SECS
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Settings {
    /// Empty settings bound to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            sesame: Meta {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            probe: ProbeConfig::default(),
            credentials: Vec::new(),
            bindings: DefaultBindings::new(),
            profiles: Vec::new(),
            path: path.into(),
        }
    }

    /// Directory holding settings, identity, and draft.
    ///
    /// `$SESAME_HOME` if set, otherwise `~/.sesame`.
    pub fn home_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(constants::HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(constants::HOME_DIR))
    }

    /// Default settings path
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join(constants::SETTINGS_FILE))
    }

    /// Load settings from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load settings from `path`; missing file yields empty settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the TOML is malformed, or a
    /// validation error if its contents are inconsistent.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading settings");

        if !path.exists() {
            debug!("no settings file, using defaults");
            return Ok(Self::new(path));
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut settings: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        settings.path = path.to_path_buf();

        debug!(
            credentials = settings.credentials.len(),
            bindings = settings.bindings.len(),
            profiles = settings.profiles.len(),
            "settings loaded"
        );

        settings.validate()?;
        Ok(settings)
    }

    /// Write settings back to their path with mode 0600
    pub fn save(&self) -> Result<()> {
        debug!(path = %self.path.display(), "saving settings");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_private(&self.path, contents.as_bytes())?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probe TTL as a duration
    pub fn probe_ttl(&self) -> Duration {
        Duration::from_secs(self.probe.ttl_secs)
    }

    /// Validate the settings structure and contents
    ///
    /// Checks:
    /// - Version field is present
    /// - Credential ids are non-empty and unique
    /// - Binding variable names are valid
    /// - User profile ids are non-empty and unique, with valid declarations
    pub fn validate(&self) -> Result<()> {
        if self.sesame.version.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "version" }.into());
        }

        let mut ids = HashSet::new();
        for cred in &self.credentials {
            if cred.id().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "credentials",
                    reason: "credential with empty id".to_string(),
                }
                .into());
            }
            if !ids.insert(cred.id()) {
                return Err(ConfigError::InvalidValue {
                    field: "credentials",
                    reason: format!("duplicate credential id '{}'", cred.id()),
                }
                .into());
            }
        }

        for (_, env_var, _) in self.bindings.iter() {
            validate_name(env_var)?;
        }

        let mut profile_ids = HashSet::new();
        for profile in &self.profiles {
            if profile.id.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "profiles",
                    reason: "profile with empty id".to_string(),
                }
                .into());
            }
            if !profile_ids.insert(profile.id.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "profiles",
                    reason: format!("duplicate profile id '{}'", profile.id),
                }
                .into());
            }
            for decl in &profile.env {
                validate_name(&decl.name)?;
            }
        }

        Ok(())
    }

    /// Built-in profiles merged with user profiles (user wins by id)
    pub fn all_profiles(&self) -> Vec<Profile> {
        let mut all: Vec<Profile> = profiles::builtin()
            .into_iter()
            .filter(|b| !self.profiles.iter().any(|p| p.id == b.id))
            .collect();
        all.extend(self.profiles.iter().cloned());
        all
    }

    /// Look up a profile by id
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownProfile` if no profile has that id.
    pub fn profile(&self, id: &str) -> Result<Profile> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .or_else(|| profiles::builtin_by_id(id))
            .ok_or_else(|| ConfigError::UnknownProfile(id.to_string()).into())
    }
}

/// Write a file readable only by the owner.
pub(crate) fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .mode(0o600)
            .open(path)?;
        file.write_all(contents)?;
        file.flush()?;

        // Tighten permissions when overwriting an existing file.
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    #[cfg(not(unix))]
    {
        std::fs::write(path, contents)?;
    }

    Ok(())
}
