//! Integration tests for the `sprout` binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// `sprout` running in `temp` with no tools on PATH and no user settings.
fn sprout(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("sprout"));
    cmd.current_dir(temp.path())
        .env("PATH", "")
        .env("HOME", temp.path())
        .env("NO_COLOR", "1")
        .env_remove("SPROUT_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("sprout"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--libraries"))
        .stdout(predicate::str::contains("--lic"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("sprout"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_project_name() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PROJECT_NAME"));
    Ok(())
}

#[test]
fn cli_single_dash_lic_picks_the_license() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .args(["demo", "--no-editor", "-lic=gpl"])
        .assert()
        .success();

    let root = temp.path().join("demo");
    let license = fs::read_to_string(root.join("LICENSE"))?;
    assert!(license.contains("GNU GENERAL PUBLIC LICENSE"));
    assert_eq!(fs::read_to_string(root.join("requirements.txt"))?, "");
    Ok(())
}

#[test]
fn cli_private_requires_github() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .args(["demo", "--private"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--github"));
    assert!(!temp.path().join("demo").exists());
    Ok(())
}

#[test]
fn cli_lists_templates() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("fastapi-react"))
        .stdout(predicate::str::contains("ai-ml-dl"));
    Ok(())
}

#[test]
fn cli_unknown_template_has_no_side_effects() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .args(["demo", "-t", "rails"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown template 'rails'"))
        .stdout(predicate::str::contains("basic, cli"));
    assert!(!temp.path().join("demo").exists());
    Ok(())
}

#[test]
fn cli_invalid_name_exits_one() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .arg("bad:name")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid project name"));
    Ok(())
}

#[test]
fn cli_creates_project_without_external_tools() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .args(["demo", "--no-editor", "--docker"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created demo"));

    let root = temp.path().join("demo");
    for file in [
        "main.py",
        "requirements.txt",
        "README.md",
        "LICENSE",
        "Dockerfile",
        "docker-compose.yml",
    ] {
        assert!(root.join(file).is_file(), "{} missing", file);
    }
    // git is not on PATH, so no ignore rules are written.
    assert!(!root.join(".gitignore").exists());
    Ok(())
}

#[test]
fn cli_fails_when_packages_cannot_be_installed() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .args(["demo", "-t", "flask", "--no-editor"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("installing failed"));

    // Files written before the failing stage stay on disk.
    assert!(temp.path().join("demo/app.py").is_file());
    assert!(!temp.path().join("demo/LICENSE").exists());
    Ok(())
}

#[test]
fn cli_github_without_token_fails_early() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .args(["demo", "--github", "--no-editor"])
        .env_remove("GITHUB_TOKEN")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
    assert!(!temp.path().join("demo").exists());
    Ok(())
}

#[test]
fn cli_target_file_is_not_a_directory() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("demo"), "")?;
    sprout(&temp)
        .args(["demo", "--no-editor"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a directory"));
    Ok(())
}

#[test]
fn cli_rejects_unknown_settings_keys() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let config = temp.path().join("sprout.yml");
    fs::write(&config, "editr: vim\n")?;
    sprout(&temp)
        .args(["demo", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse"));
    assert!(!temp.path().join("demo").exists());
    Ok(())
}

#[test]
fn cli_settings_file_in_home_is_used() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let sprout_dir = temp.path().join(".sprout");
    fs::create_dir_all(&sprout_dir)?;
    fs::write(sprout_dir.join("config.yml"), "author: Grace Hopper\n")?;

    sprout(&temp)
        .args(["demo", "--no-editor", "--lic", "bsd"])
        .assert()
        .success();

    let license = fs::read_to_string(temp.path().join("demo/LICENSE"))?;
    assert!(license.contains("Grace Hopper"));
    Ok(())
}

#[test]
fn cli_interactive_reads_prompt_overrides() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .args(["-i", "--no-editor"])
        .env("SPROUT_PROMPT_PROJECT_NAME", "guided")
        .env("SPROUT_PROMPT_LICENSE", "none")
        .assert()
        .success();

    assert!(temp.path().join("guided/main.py").is_file());
    assert!(!temp.path().join("guided/LICENSE").exists());
    Ok(())
}

#[test]
fn cli_interactive_without_answers_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    sprout(&temp)
        .arg("-i")
        .env_remove("SPROUT_PROMPT_PROJECT_NAME")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("project_name"));
    Ok(())
}
