// CLI behavior tests: run the real binary, no network unless a mock server is up.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("property-review").unwrap();
    cmd.env_remove("RUST_LOG").env("PROPERTY_REVIEW_OBSERVABILITY__METRICS_ENABLED", "false");
    cmd
}

#[test]
fn test_no_command_shows_getting_started() {
    cli()
        .assert()
        .success()
        .stdout(predicate::str::contains("property-review queue"))
        .stdout(predicate::str::contains("RED -> YELLOW -> GREEN"));
}

#[test]
fn test_help_lists_review_commands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("set-status"))
        .stdout(predicate::str::contains("set-visibility"))
        .stdout(predicate::str::contains("queue"));
}

#[test]
fn test_invalid_status_is_rejected_before_any_request() {
    cli()
        .env("PROPERTY_REVIEW_API__BASE_URL", "http://127.0.0.1:9/api")
        .args(["set-status", "prop-1", "purple"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized verification status 'purple'"));
}

#[test]
fn test_invalid_visibility_filter_is_rejected() {
    cli()
        .env("PROPERTY_REVIEW_API__BASE_URL", "http://127.0.0.1:9/api")
        .args(["list", "--visibility", "hidden"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized visibility 'hidden'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_prints_record_and_actions_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/properties/prop-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "prop-1",
            "title": "Terrace in Ikoyi",
            "verification_status": "RED",
            "visibility": "PRIVATE",
            "created_at": "2026-02-01T10:00:00Z",
            "updated_at": "2026-02-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = format!("{}/api", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        cli()
            .env("PROPERTY_REVIEW_API__BASE_URL", base_url)
            .args(["--json", "show", "prop-1"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["property"]["verification_status"], "RED");
    assert_eq!(body["actions"]["status_targets"], json!(["YELLOW", "GREEN"]));
    assert_eq!(body["actions"]["visibility_target"], serde_json::Value::Null);
}

#[test]
fn test_malformed_env_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "this line is not an assignment\n").unwrap();

    cli()
        .current_dir(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring .env file"));
}
