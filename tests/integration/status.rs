//! `mcp-provision status`

use super::common::Fixture;
use predicates::prelude::*;

#[test]
fn test_status_before_install() {
    let fx = Fixture::new();

    fx.cmd()
        .arg("status")
        .env("CONTEXT7_API_KEY", "abc")
        .assert()
        .success()
        .stdout(predicate::str::contains("CONTEXT7_API_KEY set: yes"))
        .stdout(predicate::str::contains("TAVILY_API_KEY set: no"))
        .stdout(predicate::str::contains("~/.codex/config.toml: missing"))
        .stdout(predicate::str::contains("none detected"));

    assert!(!fx.home.path(".codex").exists());
    assert!(!fx.home.path(".bashrc").exists());
}

#[test]
fn test_status_after_install() {
    let fx = Fixture::new();
    fx.install(&[("CONTEXT7_API_KEY", "abc")]).assert().success();

    fx.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("~/.codex/config.toml: exists"))
        .stdout(predicate::str::contains("context7, github"))
        .stdout(predicate::str::contains("~/.bashrc: PATH block yes"));
}

#[test]
fn test_status_does_not_run_registration_cli() {
    let fx = Fixture::new();
    fx.home.write_registration_cli("");

    fx.cmd().arg("status").env("CONTEXT7_API_KEY", "abc").assert().success();

    assert!(fx.home.registration_calls().is_empty());
}
