//! Tests for `sesame check`.

use crate::support::*;

#[test]
fn test_unsatisfied_exits_one() {
    let t = Test::new();

    let (json, code) = t.check_json("deepseek", &[]);
    assert_eq!(code, Some(1));
    assert_eq!(json["result"]["hasSecretRequirements"], true);
    assert_eq!(json["result"]["isSatisfied"], false);
    let item = &json["result"]["items"][0];
    assert_eq!(item["envVarName"], "DEEPSEEK_API_KEY");
    assert_eq!(item["required"], true);
    assert_eq!(item["isSatisfied"], false);
}

#[test]
fn test_table_output() {
    let t = Test::new();

    let output = t.run(&["check", "--profile", "deepseek"]);
    assert_eq!(output.status.code(), Some(1));
    assert_stdout_contains(&output, "DEEPSEEK_API_KEY");
    assert_stdout_contains(&output, "missing");
    assert_stderr_contains(&output, "DEEPSEEK_API_KEY is not set");
}

#[test]
fn test_once_satisfies_session_only() {
    let t = Test::new();

    let (json, code) = t.check_json("deepseek", &["--once", "DEEPSEEK_API_KEY=sk-once"]);
    assert_eq!(code, Some(0));
    assert_eq!(json["result"]["items"][0]["satisfiedBy"], "sessionOnly");
    assert!(!json.to_string().contains("sk-once"));
    assert!(!t.settings_text().contains("sk-once"));
}

#[test]
fn test_machine_env_detected() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("DEEPSEEK_API_KEY", "sk-from-env")
        .args(["check", "--profile", "deepseek", "--json"])
        .output()
        .unwrap();
    assert_success(&output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["result"]["items"][0]["satisfiedBy"], "machineEnv");
}

#[test]
fn test_default_binding_beats_machine_env() {
    let (t, ids) = Test::with_credentials(&["sk-saved"]);
    assert_success(&t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", &ids[0]]));

    let output = t
        .cmd()
        .env("DEEPSEEK_API_KEY", "sk-from-env")
        .args(["check", "--profile", "deepseek", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["result"]["items"][0]["satisfiedBy"], "defaultSaved");
}

#[test]
fn test_prefer_machine_skips_binding() {
    let (t, ids) = Test::with_credentials(&["sk-saved"]);
    assert_success(&t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", &ids[0]]));

    let output = t
        .cmd()
        .env("DEEPSEEK_API_KEY", "sk-from-env")
        .args([
            "check",
            "--profile",
            "deepseek",
            "--prefer-machine",
            "DEEPSEEK_API_KEY",
            "--json",
        ])
        .output()
        .unwrap();
    assert_success(&output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["result"]["items"][0]["satisfiedBy"], "machineEnv");
}

#[test]
fn test_prefer_machine_without_env_is_unsatisfied() {
    let (t, ids) = Test::with_credentials(&["sk-saved"]);
    assert_success(&t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", &ids[0]]));

    let (json, code) = t.check_json("deepseek", &["--prefer-machine", "DEEPSEEK_API_KEY"]);
    assert_eq!(code, Some(1));
    assert_eq!(json["result"]["items"][0]["isSatisfied"], false);
}

#[test]
fn test_use_selects_saved() {
    let (t, ids) = Test::with_credentials(&["sk-a", "sk-b"]);
    assert_success(&t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", &ids[0]]));

    let selection = format!("DEEPSEEK_API_KEY={}", ids[1]);
    let (json, code) = t.check_json("deepseek", &["--use", &selection]);
    assert_eq!(code, Some(0));
    let item = &json["result"]["items"][0];
    assert_eq!(item["satisfiedBy"], "selectedSaved");
    assert_eq!(item["savedSecretId"], ids[1].as_str());
}

#[test]
fn test_optional_secret_does_not_block() {
    let t = Test::new();

    let (json, code) = t.check_json("anthropic", &[]);
    assert_eq!(code, Some(0));
    assert_eq!(json["result"]["isSatisfied"], true);
    assert_eq!(json["result"]["items"][0]["required"], false);
}

#[test]
fn test_bindings_are_per_profile() {
    let (t, ids) = Test::with_credentials(&["sk-ds"]);
    assert_success(&t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", &ids[0]]));

    let (json, code) = t.check_json("zai", &[]);
    assert_eq!(code, Some(1));
    assert_eq!(json["result"]["items"][0]["envVarName"], "Z_AI_API_KEY");
}
