//! Registration through a fake `claude` CLI.

use super::common::Fixture;
use predicates::prelude::*;

const SECRET: &str = "sk-secret-7731";

#[test]
fn test_registers_each_keyed_server_once() {
    let fx = Fixture::new();
    fx.home.write_registration_cli("");

    fx.install(&[("CONTEXT7_API_KEY", SECRET), ("TAVILY_API_KEY", "tvly-1")])
        .assert()
        .success();
    fx.install(&[("CONTEXT7_API_KEY", SECRET), ("TAVILY_API_KEY", "tvly-1")])
        .assert()
        .success();

    let calls = fx.home.registration_calls();
    assert_eq!(calls.len(), 2, "{calls:?}");
    assert_eq!(
        calls[0],
        format!("mcp add --scope user context7 -- npx -y @upstash/context7-mcp --api-key {SECRET}")
    );
    assert_eq!(
        calls[1],
        "mcp add --scope user -e TAVILY_API_KEY=tvly-1 tavily -- npx -y tavily-mcp@latest"
    );
}

#[test]
fn test_listed_servers_are_not_added() {
    let fx = Fixture::new();
    fx.home.write_registration_cli("context7: npx -y @upstash/context7-mcp - ✓ Connected");

    fx.install(&[("CONTEXT7_API_KEY", SECRET), ("TAVILY_API_KEY", "tvly-1")])
        .assert()
        .success();

    let calls = fx.home.registration_calls();
    assert_eq!(calls.len(), 1, "{calls:?}");
    assert!(calls[0].contains(" tavily -- "));
}

#[test]
fn test_similar_names_do_not_count_as_listed() {
    let fx = Fixture::new();
    fx.home.write_registration_cli("context7-old: npx something");

    fx.install(&[("CONTEXT7_API_KEY", SECRET)]).assert().success();

    assert_eq!(fx.home.registration_calls().len(), 1);
}

#[test]
fn test_failing_add_is_fatal_and_masks_key() {
    let fx = Fixture::new();
    fx.home.write_failing_registration_cli("registry unavailable");

    fx.install(&[("CONTEXT7_API_KEY", SECRET)])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to register MCP server 'context7'"))
        .stderr(predicate::str::contains(SECRET).not());

    // Steps before registration keep their writes.
    assert!(fx.home.path(".codex/config.toml").exists());
    assert!(!fx.home.path(".config/Code/User/mcp.json").exists());
}

#[test]
fn test_missing_cli_is_soft_skip() {
    let fx = Fixture::new();

    fx.install(&[("CONTEXT7_API_KEY", SECRET)])
        .assert()
        .success()
        .stdout(predicate::str::contains("claude not on PATH"));

    assert!(fx.home.path(".config/Code/User/mcp.json").exists());
}

#[test]
fn test_no_keys_never_runs_cli() {
    let fx = Fixture::new();
    fx.home.write_registration_cli("");

    fx.install(&[]).assert().success();

    assert!(fx.home.registration_calls().is_empty());
}

#[test]
fn test_skip_register_flag() {
    let fx = Fixture::new();
    fx.home.write_registration_cli("");

    fx.install(&[("CONTEXT7_API_KEY", SECRET)])
        .arg("--skip-register")
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped (--skip-register)"));

    assert!(fx.home.registration_calls().is_empty());
}
