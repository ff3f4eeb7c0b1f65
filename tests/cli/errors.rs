//! Error reporting and misc commands.

use crate::support::*;

#[test]
fn test_unknown_profile_hint() {
    let t = Test::new();

    let output = t.run(&["check", "--profile", "nope"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "unknown profile: nope");
    assert_stderr_contains(&output, "run: sesame profile list");
}

#[test]
fn test_invalid_assignment() {
    let t = Test::new();

    let output = t.run(&["check", "--profile", "deepseek", "--once", "NOVALUE"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "expected NAME=VALUE");
}

#[test]
fn test_empty_once_value_rejected() {
    let t = Test::new();

    let output = t.run(&["check", "--profile", "deepseek", "--once", "DEEPSEEK_API_KEY="]);
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot be empty");
}

#[test]
fn test_corrupt_settings() {
    let t = Test::new();
    t.write_settings("[sesame\nversion = ");

    let output = t.run(&["secret", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse settings");
}

#[test]
fn test_completions() {
    let t = Test::new();

    let output = t.run(&["completions", "bash"]);
    assert_success(&output);
    assert_stdout_contains(&output, "sesame");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::new();

    let output = t.run(&["--verbose", "secret", "list"]);
    assert_success(&output);
    assert_stderr_contains(&output, "loading settings");
}
