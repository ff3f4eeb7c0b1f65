//! Tests for `sesame secret`.

use crate::support::*;

#[test]
fn test_add_and_list_json() {
    let t = Test::new();
    let id = t.add_secret("sk-live-123", Some("work"));

    let list = t.secret_list_json();
    assert_eq!(list["count"], 1);
    assert_eq!(list["credentials"][0]["id"], id.as_str());
    assert_eq!(list["credentials"][0]["label"], "work");
    assert_eq!(
        list["credentials"][0]["fingerprint"].as_str().unwrap().len(),
        8
    );
    assert!(!list.to_string().contains("sk-live-123"));
}

#[test]
fn test_list_never_prints_values() {
    let t = Test::new();
    t.add_secret("sk-hidden-value", Some("personal"));

    let output = t.run(&["secret", "list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "personal");
    assert_not_contains(&output, "sk-hidden-value");
}

#[test]
fn test_list_empty() {
    let t = Test::new();

    let output = t.run(&["secret", "list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "no saved credentials");
}

#[test]
fn test_add_from_stdin() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["secret", "add", "--label", "piped"])
        .write_stdin("sk-from-pipe\n")
        .output()
        .unwrap();
    assert_success(&output);

    assert!(t.settings_text().contains("sk-from-pipe"));
}

#[test]
fn test_add_empty_value_fails() {
    let t = Test::new();

    let output = t.run(&["secret", "add", ""]);
    assert_failure(&output);
    assert_stderr_contains(&output, "cannot be empty");
}

#[test]
fn test_edit_label_and_value() {
    let t = Test::new();
    let id = t.add_secret("old-value", Some("before"));

    let output = t.run(&["secret", "edit", &id, "--label", "after", "--value", "new-value"]);
    assert_success(&output);

    let list = t.secret_list_json();
    assert_eq!(list["credentials"][0]["label"], "after");
    let text = t.settings_text();
    assert!(text.contains("new-value"));
    assert!(!text.contains("old-value"));
}

#[test]
fn test_edit_by_prefix() {
    let t = Test::new();
    let id = t.add_secret("value", None);

    let output = t.run(&["secret", "edit", &id[..8], "--label", "short"]);
    assert_success(&output);
    assert_eq!(t.secret_list_json()["credentials"][0]["label"], "short");
}

#[test]
fn test_rm_cascades_to_bindings() {
    let t = Test::new();
    let id = t.add_secret("sk-ds", None);
    assert_success(&t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", &id]));
    assert!(t.settings_text().contains("DEEPSEEK_API_KEY"));

    let output = t.run(&["secret", "rm", &id]);
    assert_success(&output);
    assert_stdout_contains(&output, "cleared 1 default binding");

    assert_eq!(t.secret_list_json()["count"], 0);
    assert!(!t.settings_text().contains("DEEPSEEK_API_KEY"));
}

#[test]
fn test_rm_clears_saved_draft_selection() {
    use sesame::core::domain::Identity;
    use sesame::core::draft::NewSessionDraft;

    let t = Test::new();
    let id = t.add_secret("sk-abc", None);
    let pick = format!("DEEPSEEK_API_KEY={}", id);
    assert_success(&t.spawn_dry_run("deepseek", &["--use", &pick, "--save-draft"]));

    let output = t.run(&["secret", "rm", &id]);
    assert_success(&output);
    assert_stdout_contains(&output, "cleared 1 draft selection");

    let identity = Identity::load(&t.sesame_home().join("identity.key")).unwrap();
    let draft =
        NewSessionDraft::load_encrypted(&t.sesame_home().join("draft.age"), &identity).unwrap();
    assert!(draft
        .selections()
        .get("deepseek", "DEEPSEEK_API_KEY")
        .is_none());
}

#[test]
fn test_rm_without_draft_leaves_no_draft() {
    let t = Test::new();
    let id = t.add_secret("sk-abc", None);

    let output = t.run(&["secret", "rm", &id]);
    assert_success(&output);
    assert_not_contains(&output, "draft selection");
    assert!(!t.sesame_home().join("draft.age").exists());
}

#[test]
fn test_rm_unknown_fails() {
    let t = Test::new();

    let output = t.run(&["secret", "rm", "does-not-exist"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "credential not found");
}

#[cfg(unix)]
#[test]
fn test_settings_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::new();
    t.add_secret("sk-private", None);

    let mode = std::fs::metadata(t.settings_path())
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o600);
}
