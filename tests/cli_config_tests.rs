//! End-to-end tests for `ethelper config` commands.

use std::fs;

mod fixtures;
use fixtures::*;

// ============================================================================
// Show Command Tests
// ============================================================================

#[test]
fn test_config_show_default() {
    let workspace = TestWorkspace::new();
    let output = isolated_command(&["config", "show"], workspace.config_dir())
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Show config should succeed. stderr: {}",
        stderr(&output)
    );

    let stdout = stdout(&output);
    assert!(stdout.contains("ETHelper Configuration"));
    assert!(stdout.contains("(not created)"));
    assert!(stdout.contains("http://localhost:3000"));
}

#[test]
fn test_config_show_json_schema() {
    let workspace = TestWorkspace::new();
    let output = isolated_command(&["config", "show", "--json"], workspace.config_dir())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let result = stdout_json(&output);
    assert!(result["paths"]["data_root"].is_string());
    assert_eq!(result["services"]["model_url"], "http://localhost:3001");
    assert!(result["server"]["port"].is_u64());
    assert!(result["resolved"]["migrate_dir"]
        .as_str()
        .unwrap()
        .ends_with("etlocal/db/migrate"));
    assert!(result["config_file"]
        .as_str()
        .unwrap()
        .ends_with("config.toml"));
}

// ============================================================================
// Set Command Tests
// ============================================================================

#[test]
fn test_config_set_requires_an_option() {
    let workspace = TestWorkspace::new();
    let output = isolated_command(&["config", "set"], workspace.config_dir())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("At least one configuration option"));
}

#[test]
fn test_config_set_persists_and_is_used() {
    let workspace = TestWorkspace::new();
    let data_root = workspace.data_root();

    let output = isolated_command(
        &[
            "config",
            "set",
            "--data-root",
            data_root.to_str().unwrap(),
            "--port",
            "9100",
        ],
        workspace.config_dir(),
    )
    .output()
    .unwrap();
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let saved = fs::read_to_string(workspace.config_dir().join("config.toml")).unwrap();
    assert!(saved.contains("port = 9100"));

    let show = isolated_command(&["config", "show", "--json"], workspace.config_dir())
        .output()
        .unwrap();
    let result = stdout_json(&show);
    assert_eq!(result["server"]["port"], 9100);
    assert_eq!(result["paths"]["data_root"], data_root.to_str().unwrap());

    // Commands without --data-root now use the configured one
    let presets = isolated_command(&["presets", "--json"], workspace.config_dir())
        .output()
        .unwrap();
    assert_eq!(presets.status.code(), Some(0), "stderr: {}", stderr(&presets));
    assert_eq!(stdout_json(&presets)[0]["name"], "fiji");
}

#[test]
fn test_config_set_rejects_invalid_values() {
    let workspace = TestWorkspace::new();

    let output = isolated_command(
        &["config", "set", "--data-root", "/nonexistent/ethelper"],
        workspace.config_dir(),
    )
    .output()
    .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Data root is not a directory"));

    let output = isolated_command(
        &[
            "config",
            "set",
            "--data-root",
            workspace.data_root().to_str().unwrap(),
            "--engine-url",
            "localhost:3000",
        ],
        workspace.config_dir(),
    )
    .output()
    .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("engine_url"));

    assert!(!workspace.config_dir().join("config.toml").exists());
}

#[test]
fn test_invalid_config_file_is_reported() {
    let workspace = TestWorkspace::new();
    fs::write(workspace.config_dir().join("config.toml"), "paths = 3\n").unwrap();

    let output = workspace.run(&["presets"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to load configuration"));
}
