//! Shared fixture for driving the binary.

use assert_cmd::Command;
use mcp_provision::test_utils::TestHome;
use std::path::PathBuf;

/// A temporary home, its tool config, and a command factory.
pub struct Fixture {
    pub home: TestHome,
    pub config: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let home = TestHome::new();
        let config = home.write_tool_config();
        Self {
            home,
            config,
        }
    }

    /// `mcp-provision` with a scrubbed environment pointing at this fixture.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("mcp-provision").unwrap();
        cmd.env_clear()
            .env("PATH", &self.home.bin_dir)
            .env("SHELL", "/bin/bash")
            .env("NO_COLOR", "1")
            .env("MCP_PROVISION_HOME", &self.home.home)
            .env("MCP_PROVISION_CONFIG", &self.config);
        cmd
    }

    /// `mcp-provision install` with the given extra variables.
    pub fn install(&self, vars: &[(&str, &str)]) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("install");
        for (key, value) in vars {
            cmd.env(key, value);
        }
        cmd
    }

    /// Spawn `mcp-provision install` in the background with the same environment.
    pub fn spawn_install(&self, vars: &[(&str, &str)]) -> std::process::Child {
        std::process::Command::new(assert_cmd::cargo::cargo_bin("mcp-provision"))
            .arg("install")
            .arg("--quiet")
            .env_clear()
            .env("PATH", &self.home.bin_dir)
            .env("SHELL", "/bin/bash")
            .env("MCP_PROVISION_HOME", &self.home.home)
            .env("MCP_PROVISION_CONFIG", &self.config)
            .envs(vars.iter().copied())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .unwrap()
    }

    /// Contents of every file the installer may write, for byte comparisons.
    pub fn snapshot(&self) -> Vec<(String, Option<String>)> {
        [".codex/config.toml", ".config/Code/User/mcp.json", ".bashrc"]
            .iter()
            .map(|rel| (rel.to_string(), std::fs::read_to_string(self.home.path(rel)).ok()))
            .collect()
    }
}
