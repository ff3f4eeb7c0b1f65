//! Tests for `sesame bind` / `sesame unbind`.

use crate::support::*;

#[test]
fn test_bind_makes_default() {
    let (t, ids) = Test::with_credentials(&["sk-ds"]);

    assert_success(&t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", &ids[0]]));

    let (json, code) = t.check_json("deepseek", &[]);
    assert_eq!(code, Some(0));
    let item = &json["result"]["items"][0];
    assert_eq!(item["satisfiedBy"], "defaultSaved");
    assert_eq!(item["savedSecretId"], ids[0].as_str());
}

#[test]
fn test_bind_by_prefix() {
    let (t, ids) = Test::with_credentials(&["sk-ds"]);

    assert_success(&t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", &ids[0][..6]]));
    assert!(t.settings_text().contains(ids[0].as_str()));
}

#[test]
fn test_bind_unknown_credential_fails() {
    let t = Test::new();

    let output = t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", "missing"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "credential not found");
}

#[test]
fn test_bind_unknown_profile_fails() {
    let (t, ids) = Test::with_credentials(&["sk"]);

    let output = t.run(&["bind", "nope", "DEEPSEEK_API_KEY", &ids[0]]);
    assert_failure(&output);
    assert_stderr_contains(&output, "unknown profile");
}

#[test]
fn test_bind_invalid_name_fails() {
    let (t, ids) = Test::with_credentials(&["sk"]);

    let output = t.run(&["bind", "deepseek", "BAD-NAME", &ids[0]]);
    assert_failure(&output);
}

#[test]
fn test_unbind() {
    let (t, ids) = Test::with_credentials(&["sk-ds"]);
    assert_success(&t.run(&["bind", "deepseek", "DEEPSEEK_API_KEY", &ids[0]]));

    let output = t.run(&["unbind", "deepseek", "DEEPSEEK_API_KEY"]);
    assert_success(&output);
    assert_stdout_contains(&output, "unbound");

    let (json, code) = t.check_json("deepseek", &[]);
    assert_eq!(code, Some(1));
    assert_eq!(json["result"]["items"][0]["isSatisfied"], false);

    let output = t.run(&["unbind", "deepseek", "DEEPSEEK_API_KEY"]);
    assert_success(&output);
    assert_stdout_contains(&output, "no binding");
}
