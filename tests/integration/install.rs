//! `mcp-provision install` end to end.

use super::common::Fixture;
use predicates::prelude::*;
use serde_json::Value;
use serial_test::serial;

const BOTH_KEYS: &[(&str, &str)] = &[("CONTEXT7_API_KEY", "abc"), ("TAVILY_API_KEY", "tvly-1")];

#[test]
fn test_second_run_is_byte_identical() {
    let fx = Fixture::new();
    fx.home.write_registration_cli("");

    fx.install(BOTH_KEYS).assert().success();
    let first = fx.snapshot();
    fx.install(BOTH_KEYS).assert().success().stdout(predicate::str::contains(
        "Everything was already up to date.",
    ));
    let second = fx.snapshot();

    assert_eq!(first, second);
    assert!(first.iter().all(|(_, content)| content.is_some()));
}

#[test]
fn test_context7_only() {
    let fx = Fixture::new();

    fx.install(&[("CONTEXT7_API_KEY", "abc")])
        .assert()
        .success()
        .stdout(predicate::str::contains("TAVILY_API_KEY not set; skipping tavily"));

    let toml_text = fx.home.read(".codex/config.toml");
    assert_eq!(toml_text.matches("[mcp_servers.context7]").count(), 1);
    assert!(!toml_text.contains("[mcp_servers.tavily]"));

    let doc: toml::Table = toml::from_str(&toml_text).unwrap();
    let args = doc["mcp_servers"]["context7"]["args"].as_array().unwrap();
    assert!(args.iter().any(|arg| arg.as_str() == Some("abc")));

    let json: Value = serde_json::from_str(&fx.home.read(".config/Code/User/mcp.json")).unwrap();
    let servers = json["servers"].as_object().unwrap();
    assert!(servers.contains_key("context7"));
    assert!(servers.contains_key("github"));
    assert!(!servers.contains_key("tavily"));
}

#[test]
fn test_no_keys_writes_no_toml() {
    let fx = Fixture::new();

    fx.install(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains("CONTEXT7_API_KEY not set; skipping context7"))
        .stdout(predicate::str::contains("npm not on PATH"));

    assert!(!fx.home.path(".codex/config.toml").exists());
    let json: Value = serde_json::from_str(&fx.home.read(".config/Code/User/mcp.json")).unwrap();
    assert_eq!(json["inputs"][0]["id"], "github_mcp_pat");
    assert_eq!(json["inputs"][0]["password"], true);
}

#[test]
fn test_blank_key_is_treated_as_missing() {
    let fx = Fixture::new();

    fx.install(&[("CONTEXT7_API_KEY", "   ")]).assert().success();

    assert!(!fx.home.path(".codex/config.toml").exists());
}

#[test]
fn test_existing_toml_is_appended_not_rewritten() {
    let fx = Fixture::new();
    let path = fx.home.path(".codex/config.toml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        "model = \"o3\"\n\n[mcp_servers.context7]\ncommand = \"custom\"\n",
    )
    .unwrap();

    fx.install(BOTH_KEYS).assert().success();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("model = \"o3\"\n\n[mcp_servers.context7]\ncommand = \"custom\"\n"));
    assert_eq!(text.matches("[mcp_servers.context7]").count(), 1);
    assert_eq!(text.matches("[mcp_servers.tavily]").count(), 1);
    assert!(text.contains("TAVILY_API_KEY = \"tvly-1\""));
}

#[test]
fn test_merge_preserves_unrelated_json() {
    let fx = Fixture::new();
    let path = fx.home.path(".config/Code/User/mcp.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{
  "theme": "solarized",
  "inputs": [{"type": "promptString", "id": "mine", "description": "x"}],
  "servers": {"local": {"type": "stdio", "command": "foo"}}
}"#,
    )
    .unwrap();

    fx.install(&[("TAVILY_API_KEY", "tvly-1")]).assert().success();

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["theme", "inputs", "servers"]);
    assert_eq!(json["theme"], "solarized");
    assert_eq!(json["inputs"].as_array().unwrap().len(), 2);
    assert_eq!(json["servers"]["local"]["command"], "foo");
    assert_eq!(
        json["servers"]["tavily"]["url"],
        "https://mcp.tavily.com/mcp/?tavilyApiKey=tvly-1"
    );
}

#[test]
fn test_unparsable_json_is_backed_up() {
    let fx = Fixture::new();
    let path = fx.home.path(".config/Code/User/mcp.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    fx.install(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains("could not be parsed"));

    let backups: Vec<_> = std::fs::read_dir(fx.home.path(".mcp-provision/backups"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(std::fs::read_to_string(&backups[0]).unwrap(), "{ not json");

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(json["servers"]["github"].is_object());
}

#[test]
fn test_profile_block_appended_once() {
    let fx = Fixture::new();
    std::fs::write(fx.home.path(".bashrc"), "export EDITOR=vim\n").unwrap();

    for _ in 0..3 {
        fx.install(&[]).assert().success();
    }

    let profile = fx.home.read(".bashrc");
    assert!(profile.starts_with("export EDITOR=vim\n"));
    assert_eq!(profile.matches("# >>> mcp-provision >>>").count(), 1);
    assert_eq!(profile.matches("# <<< mcp-provision <<<").count(), 1);
    assert!(profile.contains(&format!("{}", fx.home.path(".local/bin").display())));
}

#[test]
fn test_zsh_users_get_zshrc() {
    let fx = Fixture::new();

    fx.install(&[]).env("SHELL", "/usr/bin/zsh").assert().success();

    assert!(fx.home.path(".zshrc").exists());
    assert!(!fx.home.path(".bashrc").exists());
}

#[test]
fn test_workspace_flag_writes_workspace_config() {
    let fx = Fixture::new();
    let workspace = fx.home.root().join("project");
    std::fs::create_dir_all(&workspace).unwrap();

    fx.install(&[]).arg("--workspace").arg(&workspace).assert().success();

    let json: Value =
        serde_json::from_str(&std::fs::read_to_string(workspace.join(".vscode/mcp.json")).unwrap())
            .unwrap();
    assert!(json["servers"]["github"].is_object());
}

#[test]
fn test_workspace_from_env_var() {
    let fx = Fixture::new();
    let workspace = fx.home.root().join("ws");
    std::fs::create_dir_all(&workspace).unwrap();

    fx.install(&[("WORKSPACE_FOLDER", workspace.to_str().unwrap())]).assert().success();

    assert!(workspace.join(".vscode/mcp.json").exists());
}

#[test]
fn test_missing_workspace_flag_is_fatal() {
    let fx = Fixture::new();

    fx.install(&[])
        .arg("--workspace")
        .arg(fx.home.root().join("nope"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Workspace directory does not exist"))
        .stderr(predicate::str::contains("--workspace"));
}

#[test]
fn test_skip_flags_leave_files_alone() {
    let fx = Fixture::new();

    fx.install(&[("CONTEXT7_API_KEY", "abc")])
        .args(["--skip-editor", "--skip-profile", "--skip-register", "--skip-package"])
        .assert()
        .success();

    assert!(fx.home.path(".codex/config.toml").exists());
    assert!(!fx.home.path(".config/Code/User/mcp.json").exists());
    assert!(!fx.home.path(".bashrc").exists());
}

#[test]
fn test_package_installed_with_fake_npm() {
    let fx = Fixture::new();
    let log = fx.home.root().join("npm.log");
    mcp_provision::test_utils::write_fake_cli(
        &fx.home.bin_dir,
        "npm",
        &format!(
            "if [ \"$1\" = prefix ]; then echo '{}'; exit 0; fi\necho \"$@\" >> '{}'",
            fx.home.root().join("npm-global").display(),
            log.display()
        ),
    );

    fx.install(&[]).assert().success();

    assert_eq!(std::fs::read_to_string(&log).unwrap(), "install -g @openai/codex\n");
    let profile = fx.home.read(".bashrc");
    assert!(profile.contains(&format!("{}", fx.home.root().join("npm-global/bin").display())));
}

#[test]
fn test_quiet_prints_nothing_on_success() {
    let fx = Fixture::new();

    fx.install(&[]).arg("--quiet").assert().success().stdout(predicate::str::is_empty());
}

#[test]
#[serial]
fn test_concurrent_runs_are_serialised() {
    let fx = Fixture::new();
    fx.home.write_registration_cli("");

    let children: Vec<_> = (0..3).map(|_| fx.spawn_install(BOTH_KEYS)).collect();
    for child in children {
        let output = child.wait_with_output().unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    }

    let toml_text = fx.home.read(".codex/config.toml");
    assert_eq!(toml_text.matches("[mcp_servers.context7]").count(), 1);
    assert_eq!(toml_text.matches("[mcp_servers.tavily]").count(), 1);
    assert_eq!(fx.home.read(".bashrc").matches("# >>> mcp-provision >>>").count(), 1);
    assert_eq!(fx.home.registration_calls().len(), 2);
}

#[test]
fn test_symlinked_dotfiles_are_updated_in_place() {
    let fx = Fixture::new();
    let dotfiles = fx.home.root().join("dotfiles");
    std::fs::create_dir_all(&dotfiles).unwrap();
    std::fs::write(dotfiles.join("bashrc"), "export EDITOR=vim\n").unwrap();
    std::os::unix::fs::symlink(dotfiles.join("bashrc"), fx.home.path(".bashrc")).unwrap();
    std::fs::create_dir_all(fx.home.path(".codex")).unwrap();
    std::os::unix::fs::symlink(dotfiles.join("codex.toml"), fx.home.path(".codex/config.toml"))
        .unwrap();

    fx.install(&[("CONTEXT7_API_KEY", "abc")]).assert().success();
    fx.install(&[("CONTEXT7_API_KEY", "abc")]).assert().success();

    for link in [".bashrc", ".codex/config.toml"] {
        let metadata = std::fs::symlink_metadata(fx.home.path(link)).unwrap();
        assert!(metadata.file_type().is_symlink(), "{link} was replaced");
    }
    let profile = std::fs::read_to_string(dotfiles.join("bashrc")).unwrap();
    assert_eq!(profile.matches("# >>> mcp-provision >>>").count(), 1);
    let toml_text = std::fs::read_to_string(dotfiles.join("codex.toml")).unwrap();
    assert_eq!(toml_text.matches("[mcp_servers.context7]").count(), 1);
}

#[test]
fn test_non_utf8_editor_config_is_backed_up() {
    let fx = Fixture::new();
    let path = fx.home.path(".config/Code/User/mcp.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"{\"x\": \"\xff\xfe\"}").unwrap();

    fx.install(&[]).assert().success().stdout(predicate::str::contains("could not be parsed"));

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(json["servers"]["github"].is_object());
    assert_eq!(std::fs::read_dir(fx.home.path(".mcp-provision/backups")).unwrap().count(), 1);
}
