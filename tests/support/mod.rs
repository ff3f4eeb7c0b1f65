//! Test support utilities for sesame integration tests.
//!
//! Provides isolated settings homes and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Variables read by the built-in profiles; scrubbed from every child
/// process so the developer's own environment can't satisfy a test.
pub const PROFILE_VARS: &[&str] = &[
    "ANTHROPIC_API_KEY",
    "DEEPSEEK_API_KEY",
    "Z_AI_API_KEY",
    "OPENAI_API_KEY",
    "AZURE_OPENAI_API_KEY",
    "TEST_API_KEY",
];

/// Test environment with isolated temp directories.
///
/// Child processes get their own HOME and SESAME_HOME and run in `dir`,
/// so tests can run in parallel.
pub struct Test {
    /// Working directory for spawned commands
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Environment with saved credentials; returns their ids in order.
    pub fn with_credentials(values: &[&str]) -> (Self, Vec<String>) {
        let t = Self::new();
        let ids = values.iter().map(|v| t.add_secret(v, None)).collect();
        (t, ids)
    }

    /// Directory holding settings.toml
    pub fn sesame_home(&self) -> PathBuf {
        self.home.path().join(".sesame")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.sesame_home().join("settings.toml")
    }

    pub fn settings_text(&self) -> String {
        std::fs::read_to_string(self.settings_path()).unwrap_or_default()
    }

    /// Write a raw settings file (for user profiles)
    pub fn write_settings(&self, contents: &str) {
        std::fs::create_dir_all(self.sesame_home()).expect("failed to create sesame home");
        std::fs::write(self.settings_path(), contents).expect("failed to write settings");
    }
}
