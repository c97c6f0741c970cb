#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]
#![allow(clippy::indexing_slicing)]

use std::path::Path;

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

fn write_config(dir: &Path, api_base_url: &str) -> std::path::PathBuf {
    let path = dir.join("config.json");
    let config = serde_json::json!({
        "state_name": "West Bengal",
        "district_name": "Kolkata",
        "min_age": 18,
        "weeks_to_check": 2,
        "output_file": dir.join("vaccine_available.json"),
        "address_contains": ["sector 5"],
        "player_command": "cowin-alert-test-no-such-player",
        "api_base_url": api_base_url,
        "request_timeout_secs": 5
    });
    std::fs::write(&path, config.to_string()).unwrap();
    path
}

#[test]
fn test_help_lists_options() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cowin-alert");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--once"));
}

#[test]
fn test_unknown_flag_is_rejected() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cowin-alert");
    cmd.arg("--weeks")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--weeks"));
}

#[test]
fn test_unreachable_api_reports_fatal_error() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9/api/");

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cowin-alert");
    cmd.env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("RESTART THE PROGRAM"))
        .stderr(predicate::str::contains("failed to resolve region"));
    assert!(!dir.path().join("vaccine_available.json").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_once_writes_matching_centers() {
    // Arrange
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::path("/api/v2/admin/location/states"))
        .respond_with(
            wiremock::ResponseTemplate::new(200)
                .set_body_string(include_str!("../../../fixtures/cowin/states.json")),
        )
        .mount(&mock_server)
        .await;
    wiremock::Mock::given(wiremock::matchers::path("/api/v2/admin/location/districts/36"))
        .respond_with(
            wiremock::ResponseTemplate::new(200)
                .set_body_string(include_str!("../../../fixtures/cowin/districts_36.json")),
        )
        .mount(&mock_server)
        .await;
    wiremock::Mock::given(wiremock::matchers::path(
        "/api/v2/appointment/sessions/public/calendarByDistrict",
    ))
    .and(wiremock::matchers::query_param("district_id", "725"))
    .respond_with(
        wiremock::ResponseTemplate::new(200)
            .set_body_string(include_str!("../../../fixtures/cowin/calendar_725.json")),
    )
    .expect(2)
    .mount(&mock_server)
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &format!("{}/api", mock_server.uri()));

    // Act
    let output = tokio::task::spawn_blocking(move || {
        cargo_bin_cmd!("cowin-alert")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&config)
            .arg("--once")
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Vaccine available in Kolkata"));
    let written: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("vaccine_available.json")).unwrap(),
    )
    .unwrap();
    let centers = written.as_array().unwrap();
    assert_eq!(centers.len(), 1);
    assert_eq!(centers[0]["center_id"], 561_660);
}
