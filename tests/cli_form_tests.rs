//! End-to-end tests for `ethelper presets`, `completion`, `generate` and `show`.

use std::fs;

mod fixtures;
use fixtures::*;

// ============================================================================
// Presets
// ============================================================================

#[test]
fn test_presets_json() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["presets", "--json"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let presets = stdout_json(&output);
    let presets = presets.as_array().expect("Should be an array");
    assert_eq!(presets.len(), 2);
    assert_eq!(presets[0]["name"], "fiji");
    assert_eq!(presets[0]["key_count"], 3);
    assert_eq!(presets[1]["name"], "tonga");
    assert_eq!(presets[1]["has_categories"], false);
}

#[test]
fn test_presets_human_readable() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["presets"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = stdout(&output);
    assert!(stdout.contains("fiji"));
    assert!(stdout.contains("defaults: fiji_defaults"));
    assert!(stdout.contains("no defaults"));
}

#[test]
fn test_data_root_must_exist() {
    let workspace = TestWorkspace::new();
    let output = isolated_command(
        &["presets", "--data-root", "/nonexistent/ethelper"],
        workspace.config_dir(),
    )
    .output()
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Data root is not a directory"));
}

// ============================================================================
// Completion
// ============================================================================

#[test]
fn test_completion_json() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["completion", "--preset", "fiji", "--set", "a=3", "--json"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let form = stdout_json(&output);
    assert_eq!(form["overall"]["completed"], 1);
    assert_eq!(form["overall"]["total"], 3);
    assert_eq!(form["overall"]["percent"], 33);
    assert_eq!(form["basic"]["percent"], 100);
    assert_eq!(form["keys_not_in_preset"][0], "d");
    assert_eq!(form["sections"].as_array().unwrap().len(), 3);
}

#[test]
fn test_completion_human_readable() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["completion", "-p", "fiji", "--level", "advanced", "--debug"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let stdout = stdout(&output);
    assert!(stdout.contains("Preset: fiji"));
    assert!(stdout.contains("Advanced / Heat (0/1)"));
    assert!(stdout.contains("Beta (b)"));
    assert!(!stdout.contains("Basic / Supply"));
    assert!(stdout.contains("1 keys hidden by filter"));
    assert!(stdout.contains("Keys not in preset: d"));
    assert!(stdout.contains("Trace:"));
}

#[test]
fn test_completion_values_file() {
    let workspace = TestWorkspace::new();
    let values = workspace.root().join("values.csv");
    fs::write(&values, "a,b,zz\n1,2,3\n").unwrap();

    let output = workspace.run(&[
        "completion",
        "--preset",
        "fiji",
        "--values",
        values.to_str().unwrap(),
        "--json",
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout_json(&output)["overall"]["completed"], 2);
    assert!(stderr(&output).contains("Warning: Skipping key 'zz'"));
}

#[test]
fn test_completion_rejects_unknown_inputs() {
    let workspace = TestWorkspace::new();

    let output = workspace.run(&["completion", "--preset", "fiji", "--set", "zz=1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("zz"));

    let output = workspace.run(&["completion", "--preset", "fiji", "--typology", "transport"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown typology"));

    let output = workspace.run(&["completion", "--preset", "fiji", "--set", "novalue"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_completion_missing_preset_warns() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["completion", "--preset", "samoa", "--json"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("samoa.csv"));
    assert_eq!(stdout_json(&output)["overall"]["total"], 0);
}

#[test]
fn test_completion_without_catalog_is_io_error() {
    let workspace = TestWorkspace::without_catalog();
    let output = workspace.run(&["completion", "--preset", "fiji"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Error:"));
}

// ============================================================================
// Generate and show
// ============================================================================

#[test]
fn test_generate_writes_dataset() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["generate", "--preset", "fiji", "--set", "c=5"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let stdout = stdout(&output);
    assert!(stdout.contains("DATASET GENERATED"));
    assert!(stdout.contains("Wrote 4 columns"));
    assert!(stdout.contains("Completion: 33% (1/3)"));

    let csv = fs::read_to_string(workspace.dataset_path()).unwrap();
    assert_eq!(csv, "a,b,c,d\n,,5,0\n");
}

#[test]
fn test_generate_fill_modes() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&[
        "generate",
        "--preset",
        "fiji",
        "--fill",
        "basic-defaults",
        "--fill",
        "zeros",
        "--json",
    ]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let result = stdout_json(&output);
    assert_eq!(result["columns"], 4);
    assert_eq!(result["completion"]["percent"], 100);
    assert_eq!(result["sha256"].as_str().unwrap().len(), 64);

    let csv = fs::read_to_string(workspace.dataset_path()).unwrap();
    assert_eq!(csv, "a,b,c,d\n1.5,0,0,0\n");
}

#[test]
fn test_generate_advanced_defaults_only_touch_advanced_keys() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["generate", "-p", "fiji", "--fill", "advanced-defaults"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let csv = fs::read_to_string(workspace.dataset_path()).unwrap();
    assert_eq!(csv, "a,b,c,d\n,42,,0\n");
}

#[test]
fn test_show_generated_dataset() {
    let workspace = TestWorkspace::new();
    let generate = workspace.run(&["generate", "--preset", "fiji", "--set", "a=7"]);
    assert_eq!(generate.status.code(), Some(0));

    let output = workspace.run(&["show"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("a  7"));
    assert!(stdout.contains("d  0"));

    let output = workspace.run(&["show", "--json"]);
    let contents = stdout_json(&output);
    assert_eq!(contents["rows"][0][0], "a");
    assert_eq!(contents["rows"][0][1], "7");
}

#[test]
fn test_show_without_dataset_fails() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["show"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No dataset generated yet"));
}
