//! Tests for `sesame profile`.

use crate::support::*;

#[test]
fn test_list_includes_builtins() {
    let t = Test::new();

    let output = t.run(&["profile", "list"]);
    assert_success(&output);
    for id in ["anthropic", "deepseek", "zai", "openai", "azure-openai"] {
        assert_stdout_contains(&output, id);
    }
}

#[test]
fn test_list_json() {
    let t = Test::new();

    let output = t.run(&["profile", "list", "--json"]);
    assert_success(&output);
    let profiles: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let openai = profiles
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == "openai")
        .expect("openai profile missing");
    assert_eq!(openai["agents"], serde_json::json!(["codex"]));
}

#[test]
fn test_show() {
    let t = Test::new();

    let output = t.run(&["profile", "show", "deepseek"]);
    assert_success(&output);
    assert_stdout_contains(&output, "DEEPSEEK_API_KEY");
    assert_stdout_contains(&output, "ANTHROPIC_BASE_URL");
    assert_stdout_contains(&output, "no default");
    assert_stdout_contains(&output, "also as ANTHROPIC_AUTH_TOKEN");
}

#[test]
fn test_show_reports_binding() {
    let t = Test::new();
    let id = t.add_secret("sk-ds", Some("team key"));
    assert_success(&t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", &id]));

    let output = t.run(&["profile", "show", "deepseek"]);
    assert_success(&output);
    assert_stdout_contains(&output, "default: team key");
}

#[test]
fn test_show_unknown() {
    let t = Test::new();

    let output = t.run(&["profile", "show", "nope"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "unknown profile: nope");
    assert_stderr_contains(&output, "sesame profile list");
}

#[test]
fn test_user_profile_from_settings() {
    let t = Test::new();
    t.write_settings(
        r#"
[sesame]
version = "0.1.0"

[[profiles]]
id = "local-llm"
name = "Local LLM"
agents = ["claude"]

[[profiles.env]]
name = "TEST_API_KEY"
kind = "secret"

[[profiles.env]]
name = "ANTHROPIC_BASE_URL"
value = "http://localhost:8080"
"#,
    );

    let output = t.run(&["profile", "show", "local-llm"]);
    assert_success(&output);
    assert_stdout_contains(&output, "TEST_API_KEY");
    assert_stdout_contains(&output, "http://localhost:8080");
}
