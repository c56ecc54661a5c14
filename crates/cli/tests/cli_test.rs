//! # CLI Command Tests
//!
//! Runs the real binary against `httpmock` stand-ins for the proxies.

use assert_cmd::prelude::*;
use httpmock::{Method::GET, Method::POST, MockServer};
use predicates::prelude::*;
use serde_json::json;
use std::{fs, path::Path, process::Command};
use tempfile::{tempdir, TempDir};

const PHOTO_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

/// A working directory holding a tiny JPEG and no config file.
fn workdir() -> (TempDir, String) {
    let dir = tempdir().unwrap();
    let photo = dir.path().join("site.jpg");
    fs::write(&photo, PHOTO_BYTES).unwrap();
    let photo = photo.to_str().unwrap().to_string();
    (dir, photo)
}

fn cli(dir: &Path, server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("sitelog-cli").unwrap();
    cmd.current_dir(dir)
        .env_remove("SITELOG_CONFIG")
        .env("SITELOG_VISION_API_ENDPOINT", server.url("/api/vision"))
        .env("SITELOG_TEXT_ANALYSIS_ENDPOINT", server.url("/api/text-analysis"))
        .env("SITELOG_SHEETS_API_ENDPOINT", server.url("/api/sheets"))
        .env("SITELOG_DRIVE_API_ENDPOINT", server.url("/api/drive"))
        .env("SITELOG_SHEET_NAME", "Sites")
        .env("SITELOG_STRATEGY", "heuristic");
    cmd
}

fn mock_vision(server: &MockServer) {
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/vision")
            .body_contains("TEXT_DETECTION");
        then.status(200).json_body(json!({
            "responses": [{
                "textAnnotations": [{ "description": "ACME BUILDERS\nCall 555-123-4567\ninfo@acme.com" }]
            }]
        }));
    });
}

fn mock_sheet(server: &MockServer, rows: serde_json::Value) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/sheets")
            .query_param("action", "read")
            .query_param("range", "Sites");
        then.status(200).json_body(json!({ "values": rows }));
    });
}

#[test]
fn test_submit_new_site_appends_and_archives() {
    let (dir, photo) = workdir();
    let server = MockServer::start();
    mock_vision(&server);
    mock_sheet(&server, json!([["Address", "Builder", "Picture taken"]]));
    let append = server.mock(|when, then| {
        when.method(POST)
            .path("/api/sheets")
            .query_param("action", "append")
            .query_param("range", "Sites!A:C")
            .json_body(json!({ "values": [["123 Main St", "Acme Builders", "Yes"]] }));
        then.status(200).json_body(json!({}));
    });
    let drive = server.mock(|when, then| {
        when.method(POST)
            .path("/api/drive")
            .body_contains("2024-07-04_123_Main_St.jpg")
            .body_contains("image/jpeg");
        then.status(200).json_body(json!({
            "success": true,
            "fileId": "file-1",
            "fileName": "2024-07-04_123_Main_St.jpg",
            "webViewLink": "https://drive.example/file-1"
        }));
    });

    cli(dir.path(), &server)
        .args(["submit", &photo, "--date", "2024-07-04"])
        .args(["--address", "123 Main St", "--company", "Acme Builders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New site added successfully!"))
        .stdout(predicate::str::contains("https://drive.example/file-1"));

    append.assert();
    drive.assert();
}

#[test]
fn test_resubmission_updates_existing_row_and_clears_blanked_field() {
    let (dir, photo) = workdir();
    let server = MockServer::start();
    mock_vision(&server);
    mock_sheet(
        &server,
        json!([
            ["Address", "Builder", "Picture taken", "Notes"],
            ["9 Elm Rd", "Other Co", "Yes", ""],
            ["123 MAIN ST ", "Acme", "", "gate code 42"]
        ]),
    );
    let update = server.mock(|when, then| {
        when.method(POST)
            .path("/api/sheets")
            .query_param("action", "update")
            .query_param("updateRange", "Sites!A3:D3")
            .json_body(json!({ "values": [["123 Main St", "", "Yes", "gate code 42"]] }));
        then.status(200).json_body(json!({}));
    });

    cli(dir.path(), &server)
        .args(["submit", &photo, "--date", "2024-07-04", "--no-archive"])
        .args(["--address", "123 Main St", "--company", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site updated successfully! (Row 3)"));

    update.assert();
}

#[test]
fn test_archive_failure_still_saves_the_site() {
    let (dir, photo) = workdir();
    let server = MockServer::start();
    mock_vision(&server);
    mock_sheet(&server, json!([["Address"]]));
    let append = server.mock(|when, then| {
        when.method(POST).path("/api/sheets").query_param("action", "append");
        then.status(200).json_body(json!({}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/api/drive");
        then.status(500).json_body(json!({
            "error": "Failed to upload file to Google Drive",
            "message": "Failed to upload file: quota exceeded"
        }));
    });

    cli(dir.path(), &server)
        .args(["submit", &photo, "--address", "1 A St"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New site added successfully!"))
        .stdout(predicate::str::contains("(Photo upload to Drive failed:"));

    append.assert();
}

#[test]
fn test_submit_without_address_fails() {
    let (dir, photo) = workdir();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/vision");
        then.status(200).json_body(json!({
            "responses": [{ "textAnnotations": [{ "description": "WET PAINT" }] }]
        }));
    });

    cli(dir.path(), &server)
        .args(["submit", &photo, "--no-archive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Submit failed: Address is required."));
}

#[test]
fn test_analyze_prints_json_fields() {
    let (dir, photo) = workdir();
    let server = MockServer::start();
    mock_vision(&server);

    cli(dir.path(), &server)
        .args(["analyze", &photo, "--json", "--prefill-address", "77 Pine Ct"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"email\": \"info@acme.com\""))
        .stdout(predicate::str::contains("\"address\": \"77 Pine Ct\""));
}

#[test]
fn test_analyze_rejects_non_image() {
    let (dir, _) = workdir();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "hello").unwrap();
    let server = MockServer::start();

    cli(dir.path(), &server)
        .args(["analyze", notes.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please select a valid image file."));
}

#[test]
fn test_find_reports_row() {
    let (dir, _) = workdir();
    let server = MockServer::start();
    mock_sheet(&server, json!([["Site Address"], ["1 A St"], ["2 B St"]]));

    cli(dir.path(), &server)
        .args(["find", "2 b st"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is on row 3 of 'Sites'"));
}

#[test]
fn test_config_check_reports_missing_settings() {
    let (dir, _) = workdir();
    let server = MockServer::start();

    cli(dir.path(), &server)
        .env_remove("SITELOG_VISION_API_ENDPOINT")
        .args(["config", "check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("vision_api_endpoint:    (not set)"))
        .stderr(predicate::str::contains(
            "Missing required settings: vision_api_endpoint",
        ));
}

#[test]
fn test_config_file_with_substitution() {
    let (dir, _) = workdir();
    let server = MockServer::start();
    let config_path = dir.path().join("custom.yml");
    fs::write(
        &config_path,
        "vision_api_endpoint: \"${TEST_SITELOG_PROXY}/api/vision?token=secret\"\n\
         sheets_api_endpoint: \"${TEST_SITELOG_PROXY}/api/sheets\"\n\
         strategy: heuristic\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("sitelog-cli").unwrap();
    cmd.current_dir(dir.path())
        .env("TEST_SITELOG_PROXY", server.base_url())
        .args(["--config", config_path.to_str().unwrap(), "config", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/api/vision?********"))
        .stdout(predicate::str::contains("secret").not())
        .stdout(predicate::str::contains("Configuration is complete."));
}

#[test]
fn test_missing_explicit_config_file() {
    let (dir, _) = workdir();

    Command::cargo_bin("sitelog-cli")
        .unwrap()
        .current_dir(dir.path())
        .args(["--config", "nope.yml", "config", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found at 'nope.yml'."));
}
