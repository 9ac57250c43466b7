use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn trivia_version_contract() {
    let bin = assert_cmd::cargo::cargo_bin!("trivia");
    let out = std::process::Command::new(bin)
        .args(["version"])
        .env_remove("TRIVIA_ENV_FILE")
        .output()
        .expect("run trivia version");

    assert!(out.status.success(), "trivia version failed");
    let s = String::from_utf8_lossy(&out.stdout);
    let v: serde_json::Value = serde_json::from_str(&s).expect("parse version json");

    assert_eq!(v["schema_version"].as_u64(), Some(1));
    assert_eq!(v["name"].as_str(), Some("trivia"));
    assert!(!v["version"].as_str().unwrap_or("").is_empty());
    assert_eq!(v["tools"].as_array().map(|a| a.len()), Some(9));
}

#[test]
fn trivia_version_text_output_contract() {
    Command::new(assert_cmd::cargo::cargo_bin!("trivia"))
        .args(["version", "--output", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("trivia "));
}

#[test]
fn run_rejects_unknown_tool() {
    Command::new(assert_cmd::cargo::cargo_bin!("trivia"))
        .args(["run", "no_such_tool"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown tool"));
}

#[test]
fn run_bad_url_prints_usage_error_offline() {
    // Validation happens before any request, so unreachable endpoints are fine.
    Command::new(assert_cmd::cargo::cargo_bin!("trivia"))
        .args(["run", "fetch_trivia_from_url", "--arg", "url=not-a-url"])
        .env("TRIVIA_SEARCH_ENDPOINT", "http://127.0.0.1:9/html/")
        .env("TRIVIA_WIKIPEDIA_REST_ENDPOINT", "http://127.0.0.1:9/api/rest_v1")
        .env("TRIVIA_WIKIPEDIA_API_ENDPOINT", "http://127.0.0.1:9/w/api.php")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("❌ Error:"))
        .stdout(predicate::str::contains("invalid_url"));
}

#[test]
fn run_with_unreachable_upstreams_still_reports() {
    Command::new(assert_cmd::cargo::cargo_bin!("trivia"))
        .args(["run", "trivia_for_today", "--arg", "date_override=12-25"])
        .env("TRIVIA_SEARCH_ENDPOINT", "http://127.0.0.1:9/html/")
        .env("TRIVIA_WIKIPEDIA_REST_ENDPOINT", "http://127.0.0.1:9/api/rest_v1")
        .env("TRIVIA_WIKIPEDIA_API_ENDPOINT", "http://127.0.0.1:9/w/api.php")
        .env("TRIVIA_TIMEOUT_MS", "2000")
        .assert()
        .success()
        .stdout(predicate::str::contains("December 25"))
        .stdout(predicate::str::contains("No events found."));
}
