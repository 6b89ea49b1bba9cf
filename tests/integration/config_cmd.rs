//! `mcp-provision config`

use super::common::Fixture;
use predicates::prelude::*;

#[test]
fn test_config_path_prints_override() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(fx.config.to_string_lossy().as_ref()));
}

#[test]
fn test_config_init_and_force() {
    let fx = Fixture::new();
    let path = fx.home.root().join("fresh/config.toml");

    fx.cmd()
        .args(["config", "init"])
        .env("MCP_PROVISION_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration at"));
    assert!(path.exists());

    fx.cmd()
        .args(["config", "init"])
        .env("MCP_PROVISION_CONFIG", &path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration file already exists"))
        .stderr(predicate::str::contains("--force"));

    fx.cmd()
        .args(["config", "init", "--force"])
        .env("MCP_PROVISION_CONFIG", &path)
        .assert()
        .success();
}

#[test]
fn test_config_show() {
    let fx = Fixture::new();

    fx.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[package]"))
        .stdout(predicate::str::contains("@openai/codex"));
}

#[test]
fn test_invalid_config_file_is_fatal() {
    let fx = Fixture::new();
    std::fs::write(&fx.config, "[package\n").unwrap();

    fx.install(&[]).assert().failure().code(1).stderr(predicate::str::contains(
        "Invalid configuration file",
    ));
}
