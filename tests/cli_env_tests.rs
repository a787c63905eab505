//! End-to-end tests for `ethelper env` and `ethelper doctor`.
//!
//! Setup jobs need docker-compose and are covered by the web API tests with
//! a mock runner.

use std::fs;

mod fixtures;
use fixtures::*;

#[test]
fn test_env_status_json() {
    let workspace = TestWorkspace::new().with_services();
    let output = workspace.run(&["env", "status", "--json"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let statuses = stdout_json(&output);
    let statuses = statuses.as_array().unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0]["service"], "etengine");
    assert_eq!(statuses[0]["directory_exists"], true);
    assert_eq!(statuses[0]["url"], "http://localhost:3000");
    assert_eq!(statuses[1]["service"], "etmodel");
}

#[test]
fn test_env_status_reports_missing_checkouts() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["env", "status"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("missing"));
}

#[test]
fn test_env_setup_unknown_service() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["env", "setup", "etlocal"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown service"));
}

#[test]
fn test_env_setup_missing_checkout() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["env", "setup", "etengine"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Service directory not found"));
}

#[test]
fn test_env_identity_updates_settings() {
    let workspace = TestWorkspace::new().with_services();
    let source = workspace.root().join("identity.txt");
    fs::write(&source, "client_id: id-1\nclient_secret: secret-1\n").unwrap();

    let output = workspace.run(&["env", "identity", "--from", source.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Updated 2 line(s)"));

    let settings = fs::read_to_string(workspace.settings_file()).unwrap();
    assert!(settings.contains("client_id: id-1"));
    assert!(settings.contains("client_secret: secret-1"));
}

#[test]
fn test_env_identity_without_credentials() {
    let workspace = TestWorkspace::new().with_services();
    let source = workspace.root().join("identity.txt");
    fs::write(&source, "nothing here\n").unwrap();

    let output = workspace.run(&["env", "identity", "--from", source.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let settings = fs::read_to_string(workspace.settings_file()).unwrap();
    assert!(settings.contains("client_id: CHANGEME"));
}

#[test]
fn test_env_identity_missing_settings_is_io_error() {
    let workspace = TestWorkspace::new();
    let source = workspace.root().join("identity.txt");
    fs::write(&source, "client_id: id-1\n").unwrap();

    let output = workspace.run(&["env", "identity", "--from", source.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Settings file not found"));
}

#[test]
fn test_doctor_json_lists_checks() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["doctor", "--json"]);

    // ETLocal and the services are missing in the fixture
    assert_eq!(output.status.code(), Some(1));

    let result = stdout_json(&output);
    let text = result.to_string();
    assert!(text.contains("Data root"));
    assert!(text.contains("ETLocal"));
    assert!(text.contains("ETEngine"));
}
