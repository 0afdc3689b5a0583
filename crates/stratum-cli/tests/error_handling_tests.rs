//! Tests for error handling, suggestions and exit codes.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn stratum(dir: &Path) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("stratum");
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("STRATUM_TEMPLATES_DIR");
    cmd
}

fn templates(root: &Path) {
    fs::create_dir_all(root.join("templates/base")).unwrap();
    fs::write(root.join("templates/base/README.md"), "# dapp\n").unwrap();
}

#[test]
fn test_error_invalid_project_name() {
    let temp = TempDir::new().unwrap();
    templates(temp.path());
    stratum(temp.path())
        .args(["new", ".hidden"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid project name"));
}

#[test]
fn test_error_project_exists_suggests_force() {
    let temp = TempDir::new().unwrap();
    templates(temp.path());
    fs::create_dir(temp.path().join("taken")).unwrap();

    stratum(temp.path())
        .args(["new", "taken"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_error_templates_not_found() {
    let temp = TempDir::new().unwrap();
    stratum(temp.path())
        .args(["new", "dapp", "--templates-dir", "nowhere"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Templates directory not found"))
        .stderr(predicate::str::contains("STRATUM_TEMPLATES_DIR"));
}

#[test]
fn test_error_missing_dev_extension() {
    let temp = TempDir::new().unwrap();
    templates(temp.path());
    stratum(temp.path())
        .args(["new", "dapp", "-e", "ghost", "--dev"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ghost"));

    assert!(!temp.path().join("dapp").exists());
}

#[test]
fn test_error_malformed_selector() {
    let temp = TempDir::new().unwrap();
    templates(temp.path());
    stratum(temp.path())
        .args(["new", "dapp", "-e", "not a selector"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("owner/project"));
}

#[test]
fn test_error_unknown_slot_aborts_generation() {
    let temp = TempDir::new().unwrap();
    templates(temp.path());
    fs::write(
        temp.path().join("templates/base/.gitignore.template.toml"),
        "body = \"{{postContent}}\"\n\n[[slots]]\nname = \"postContent\"\n",
    )
    .unwrap();
    let extension = temp.path().join("externalExtensions/old/extension");
    fs::create_dir_all(&extension).unwrap();
    fs::write(extension.join(".gitignore.args.toml"), "extraContent = \"x\"\n").unwrap();

    stratum(temp.path())
        .args(["new", "dapp", "-s", "none", "-e", "old", "--dev"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("extraContent"))
        .stderr(predicate::str::contains("postContent"));
}

#[test]
fn test_error_unknown_config_key() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("stratum.toml"), "").unwrap();
    stratum(temp.path())
        .args(["--config", "stratum.toml", "config", "get", "nope.key"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_error_missing_explicit_config_file() {
    let temp = TempDir::new().unwrap();
    stratum(temp.path())
        .args(["--config", "absent.toml", "config", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_error_capture_outside_repository() {
    let temp = TempDir::new().unwrap();
    templates(temp.path());
    fs::create_dir(temp.path().join("project")).unwrap();

    stratum(temp.path())
        .args(["capture", "project", "--templates-dir", "templates"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not the root of a git repository"));
}

#[test]
fn test_error_usage_exit_code() {
    let temp = TempDir::new().unwrap();
    stratum(temp.path())
        .args(["new", "dapp", "--dev"])
        .assert()
        .code(2);
}
