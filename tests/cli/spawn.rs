//! Tests for `sesame spawn`.

use crate::support::*;

fn request(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_str(&stdout(output))
        .unwrap_or_else(|e| panic!("dry run is not JSON ({}): {}", e, stderr(output)))
}

#[test]
fn test_missing_required_fails() {
    let t = Test::new();

    let output = t.spawn_dry_run("deepseek", &[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "missing required credential: DEEPSEEK_API_KEY");
    assert_stderr_contains(&output, "sesame secret add");
}

#[test]
fn test_dry_run_redacts_values() {
    let t = Test::new();

    let output = t.spawn_dry_run("deepseek", &["--once", "DEEPSEEK_API_KEY=sk-test-123"]);
    assert_success(&output);
    assert_not_contains(&output, "sk-test-123");

    let json = request(&output);
    assert_eq!(json["profileId"], "deepseek");
    assert_eq!(json["agent"], "claude");
    assert_eq!(
        json["environmentVariables"]["DEEPSEEK_API_KEY"],
        "<redacted>"
    );
    assert!(json["environmentVariables"]
        .get("ANTHROPIC_BASE_URL")
        .is_some());
    assert_eq!(
        json["environmentVariables"]["ANTHROPIC_AUTH_TOKEN"],
        "<redacted>"
    );
}

#[test]
fn test_machine_env_not_injected() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("DEEPSEEK_API_KEY", "sk-from-env")
        .args(["spawn", "--profile", "deepseek", "--dry-run", "--no-input"])
        .output()
        .unwrap();
    assert_success(&output);

    let json = request(&output);
    assert!(json["environmentVariables"]
        .get("DEEPSEEK_API_KEY")
        .is_none());
}

#[test]
fn test_saved_default_is_injected() {
    let (t, ids) = Test::with_credentials(&["sk-saved"]);
    assert_success(&t.run(&["bind", "openai", "OPENAI_API_KEY", &ids[0]]));

    let output = t.spawn_dry_run("openai", &[]);
    assert_success(&output);

    let json = request(&output);
    assert_eq!(json["agent"], "codex");
    assert!(json["environmentVariables"]
        .get("OPENAI_API_KEY")
        .is_some());
}

#[test]
fn test_incompatible_agent_fails() {
    let t = Test::new();

    let output = t.spawn_dry_run(
        "openai",
        &["--agent", "claude", "--once", "OPENAI_API_KEY=sk"],
    );
    assert_failure(&output);
    assert_stderr_contains(&output, "does not support agent 'claude'");
}

#[test]
fn test_modes_reconciled_and_validated() {
    let t = Test::new();

    let output = t.spawn_dry_run(
        "anthropic",
        &["--permission-mode", "plan", "--model", "opus"],
    );
    assert_success(&output);
    let json = request(&output);
    assert_eq!(json["permissionMode"], "plan");
    assert_eq!(json["modelMode"], "opus");

    let output = t.spawn_dry_run("anthropic", &["--permission-mode", "yolo"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not valid for claude");
}

#[test]
fn test_directory_in_request() {
    let t = Test::new();
    let work = t.dir.path().join("project");
    std::fs::create_dir_all(&work).unwrap();

    let output = t.spawn_dry_run("anthropic", &["--dir", work.to_str().unwrap()]);
    assert_success(&output);
    assert_eq!(request(&output)["directory"], work.to_str().unwrap());
}

#[test]
fn test_save_draft_and_resume() {
    let t = Test::new();

    let output = t.run(&[
        "spawn",
        "--profile",
        "deepseek",
        "--once",
        "DEEPSEEK_API_KEY=sk-session",
        "--permission-mode",
        "acceptEdits",
        "--save-draft",
        "--no-input",
        "--dry-run",
    ]);
    assert_success(&output);

    let draft = t.sesame_home().join("draft.age");
    let raw = std::fs::read_to_string(&draft).unwrap();
    assert!(raw.contains("BEGIN AGE ENCRYPTED FILE"));
    assert!(!raw.contains("sk-session"));
    assert!(t.sesame_home().join("identity.key").exists());

    let output = t.run(&["spawn", "--resume", "--no-input", "--dry-run"]);
    assert_success(&output);
    let json = request(&output);
    assert_eq!(json["profileId"], "deepseek");
    assert_eq!(json["permissionMode"], "acceptEdits");
    assert_eq!(
        json["environmentVariables"]["DEEPSEEK_API_KEY"],
        "<redacted>"
    );
}

#[test]
fn test_resume_without_draft_fails() {
    let t = Test::new();

    let output = t.run(&["spawn", "--resume", "--no-input", "--dry-run"]);
    assert_failure(&output);
}

#[test]
fn test_missing_agent_binary() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("PATH", "")
        .args([
            "spawn",
            "--profile",
            "deepseek",
            "--once",
            "DEEPSEEK_API_KEY=sk",
            "--no-input",
        ])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "agent binary not found: claude");
}
