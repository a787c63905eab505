//! Integration tests for the doctor module.
//!
//! These tests verify that the DependencyChecker can properly detect
//! external tools and validate the data root and sibling checkouts.

use ethelper::config::Config;
use ethelper::doctor::{DependencyChecker, DoctorFormatter, OutputFormat, ToolStatus};
use std::fs;
use tempfile::TempDir;

mod fixtures;
use fixtures::TestWorkspace;

#[test]
fn test_check_all_returns_expected_dependencies() {
    let workspace = TestWorkspace::new();
    let config = Config::with_data_root(workspace.data_root());

    let statuses = DependencyChecker::new().check_all(&config);

    let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["docker-compose", "Data root", "ETLocal", "ETEngine", "ETModel"]
    );

    for status in &statuses {
        assert!(
            !status.message.is_empty(),
            "Status for {} has empty message",
            status.name
        );
    }
}

#[test]
fn test_data_root_valid() {
    let workspace = TestWorkspace::new();
    let status = DependencyChecker::new().check_data_root(&workspace.data_root());

    assert_eq!(status.name, "Data root");
    assert_ne!(status.status, ToolStatus::Missing);
    assert!(status.message.contains("Valid data root"));
}

#[test]
fn test_data_root_missing_tables() {
    let workspace = TestWorkspace::without_catalog();
    let status = DependencyChecker::new().check_data_root(&workspace.data_root());

    assert_eq!(status.status, ToolStatus::Missing);
    assert!(status.message.contains("variables/keys.csv"));
    assert!(status.message.contains("variables/translations.csv"));
}

#[test]
fn test_data_root_not_a_directory() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("file.txt");
    fs::write(&file, "not a directory").unwrap();

    let status = DependencyChecker::new().check_data_root(&file);

    assert_eq!(status.status, ToolStatus::Missing);
    assert!(status.message.contains("does not exist"));
}

#[test]
fn test_etlocal_checks_migrate_dir() {
    let temp_dir = TempDir::new().unwrap();
    let etlocal = temp_dir.path().join("etlocal");
    let checker = DependencyChecker::new();

    assert_eq!(checker.check_etlocal(&etlocal).status, ToolStatus::Missing);

    fs::create_dir(&etlocal).unwrap();
    assert_eq!(checker.check_etlocal(&etlocal).status, ToolStatus::Unknown);

    fs::create_dir_all(etlocal.join("db/migrate")).unwrap();
    assert_ne!(checker.check_etlocal(&etlocal).status, ToolStatus::Missing);
    assert_ne!(checker.check_etlocal(&etlocal).status, ToolStatus::Unknown);
}

#[test]
fn test_service_repo_needs_compose_file() {
    let temp_dir = TempDir::new().unwrap();
    let etengine = temp_dir.path().join("etengine");
    fs::create_dir(&etengine).unwrap();
    let checker = DependencyChecker::new();

    let status = checker.check_service_repo("ETEngine", &etengine);
    assert_eq!(status.status, ToolStatus::Unknown);
    assert!(status.message.contains("docker-compose"));

    fs::write(etengine.join("docker-compose.yml"), "services: {}\n").unwrap();
    let status = checker.check_service_repo("ETEngine", &etengine);
    assert_ne!(status.status, ToolStatus::Unknown);
    assert_ne!(status.status, ToolStatus::Missing);
}

#[test]
fn test_json_report_lists_every_check() {
    let workspace = TestWorkspace::new();
    let config = Config::with_data_root(workspace.data_root());
    let statuses = DependencyChecker::new().check_all(&config);

    let json = DoctorFormatter::with_format(OutputFormat::Json).format_results(&statuses);
    let value: serde_json::Value = serde_json::from_str(&json).expect("Should be JSON");

    assert_eq!(value["checks"].as_array().unwrap().len(), 5);
    assert_eq!(value["status"], "missing_dependencies");
}
