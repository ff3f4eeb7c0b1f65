//! Command helper methods for Test.

use std::process::Output;

use assert_cmd::Command;

use super::{assert_success, stdout, Test, PROFILE_VARS};

impl Test {
    /// Create a sesame command with an isolated environment.
    ///
    /// - HOME and SESAME_HOME point into the temporary home
    /// - profile credential variables are removed
    /// - current directory is the test's working directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("sesame").expect("failed to find sesame binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("SESAME_HOME", self.sesame_home());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("SESAME_LOG");
        for var in PROFILE_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run sesame with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run sesame")
    }

    /// `sesame secret add`; returns the new id (last stdout line).
    pub fn add_secret(&self, value: &str, label: Option<&str>) -> String {
        let mut args = vec!["secret", "add"];
        if let Some(label) = label {
            args.extend(["--label", label]);
        }
        args.push(value);

        let output = self.run(&args);
        assert_success(&output);
        stdout(&output)
            .lines()
            .last()
            .expect("secret add printed nothing")
            .trim()
            .to_string()
    }

    /// `sesame secret list --json`, parsed.
    pub fn secret_list_json(&self) -> serde_json::Value {
        let output = self.run(&["secret", "list", "--json"]);
        assert_success(&output);
        serde_json::from_str(&stdout(&output)).expect("secret list --json is not JSON")
    }

    /// `sesame check --json` with extra args, parsed with its exit code.
    pub fn check_json(&self, profile: &str, extra: &[&str]) -> (serde_json::Value, Option<i32>) {
        let mut args = vec!["check", "--profile", profile, "--json"];
        args.extend_from_slice(extra);

        let output = self.run(&args);
        let json = serde_json::from_str(&stdout(&output)).unwrap_or_else(|e| {
            panic!(
                "check --json is not JSON ({}): {}",
                e,
                super::stderr(&output)
            )
        });
        (json, output.status.code())
    }

    /// `sesame spawn --dry-run --no-input` with extra args.
    pub fn spawn_dry_run(&self, profile: &str, extra: &[&str]) -> Output {
        let mut args = vec!["spawn", "--profile", profile, "--dry-run", "--no-input"];
        args.extend_from_slice(extra);
        self.run(&args)
    }
}
