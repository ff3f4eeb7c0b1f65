//! Constants used throughout sesame.
//!
//! Centralizes file names, environment variables, and defaults.

/// Directory under HOME holding settings, identity, and draft (`~/.sesame`).
pub const HOME_DIR: &str = ".sesame";

/// Environment variable overriding the settings directory.
pub const HOME_ENV: &str = "SESAME_HOME";

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "SESAME_LOG";

/// Settings file name.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Private key used to encrypt the session draft.
pub const IDENTITY_FILE: &str = "identity.key";

/// Encrypted new-session draft.
pub const DRAFT_FILE: &str = "draft.age";

/// Default time-to-live for environment presence results (5 minutes).
pub const DEFAULT_PROBE_TTL_SECS: u64 = 300;

/// Machine id used when the hostname cannot be determined.
pub const LOCAL_MACHINE: &str = "local";

/// Separator used when composing auto-prompt keys.
pub const PROMPT_KEY_SEPARATOR: char = ':';
