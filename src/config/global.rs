//! Tool configuration file (`~/.mcp-provision/config.toml`).
//!
//! The file is optional. Every field carries a default, so a missing file, an
//! empty file and a file naming only one section all behave sensibly. Paths
//! may start with `~`, which is expanded against the *effective* home (see
//! [`ProvisionContext`](crate::config::ProvisionContext)).
//!
//! # Example
//!
//! ```toml
//! [package]
//! manager = "npm"
//! name = "@openai/codex"
//! binary = "codex"
//!
//! [registration]
//! cli = "claude"
//! scope = "user"
//!
//! [paths]
//! codex_config = "~/.codex/config.toml"
//! editor_user_configs = ["~/.config/Code/User/mcp.json"]
//!
//! [workspace]
//! env_vars = ["WORKSPACE_FOLDER", "CODESPACE_VSCODE_FOLDER", "GITHUB_WORKSPACE"]
//! scan_roots = ["/workspaces"]
//!
//! [timeouts]
//! command_secs = 600
//! ```

use crate::constants::{CONFIG_FILE, DEFAULT_COMMAND_TIMEOUT, TOOL_DIR};
use crate::core::ProvisionError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root of the tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// CLI installed through the package manager.
    pub package: PackageConfig,

    /// CLI the MCP servers are registered with.
    pub registration: RegistrationConfig,

    /// Per-user file locations.
    pub paths: PathsConfig,

    /// Workspace detection rules.
    pub workspace: WorkspaceConfig,

    /// External command limits.
    pub timeouts: TimeoutConfig,
}

/// Package installed by step (b).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Package manager executable; must understand `install -g` and `prefix -g`.
    pub manager: String,
    /// Package to install globally.
    pub name: String,
    /// Executable the package provides; its presence means "already installed".
    pub binary: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            manager: "npm".to_string(),
            name: "@openai/codex".to_string(),
            binary: "codex".to_string(),
        }
    }
}

/// Registration CLI used by step (e).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Executable providing `mcp list` and `mcp add`.
    pub cli: String,
    /// Value passed to `mcp add --scope`.
    pub scope: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            cli: "claude".to_string(),
            scope: "user".to_string(),
        }
    }
}

/// Per-user file locations; `~` expands against the effective home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// TOML config receiving `[mcp_servers.*]` sections.
    pub codex_config: String,

    /// Shell profile receiving the PATH block. Derived from `$SHELL` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell_profile: Option<String>,

    /// Editor per-user `mcp.json` files.
    pub editor_user_configs: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let editor_user_config = if cfg!(target_os = "macos") {
            "~/Library/Application Support/Code/User/mcp.json"
        } else if cfg!(windows) {
            "~/AppData/Roaming/Code/User/mcp.json"
        } else {
            "~/.config/Code/User/mcp.json"
        };

        Self {
            codex_config: "~/.codex/config.toml".to_string(),
            shell_profile: None,
            editor_user_configs: vec![editor_user_config.to_string()],
        }
    }
}

/// Workspace detection rules for step (c).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Variables probed in order; the first naming an existing directory wins.
    pub env_vars: Vec<String>,
    /// Directories whose subdirectories are scanned when no variable matches.
    pub scan_roots: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            env_vars: vec![
                "WORKSPACE_FOLDER".to_string(),
                "CODESPACE_VSCODE_FOLDER".to_string(),
                "GITHUB_WORKSPACE".to_string(),
            ],
            scan_roots: vec!["/workspaces".to_string()],
        }
    }
}

/// External command limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Timeout for each external command in seconds; 0 disables the timeout.
    pub command_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            command_secs: DEFAULT_COMMAND_TIMEOUT.as_secs(),
        }
    }
}

impl TimeoutConfig {
    /// The configured timeout, `None` when disabled.
    #[must_use]
    pub const fn command_timeout(&self) -> Option<Duration> {
        if self.command_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.command_secs))
        }
    }
}

impl ProvisionConfig {
    /// Default location: `<home>/.mcp-provision/config.toml`.
    #[must_use]
    pub fn default_path(home: &Path) -> PathBuf {
        home.join(TOOL_DIR).join(CONFIG_FILE)
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(target: "provision::config", "No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load from `path`; the file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            ProvisionError::ConfigParse {
                path: path.display().to_string(),
                reason: e.message().to_string(),
            }
            .into()
        })
    }

    /// Write the configuration as pretty TOML.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        crate::utils::safe_write(path, &content)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_default() {
        let temp = tempdir().unwrap();
        let config = ProvisionConfig::load_or_default(&temp.path().join("none.toml")).unwrap();
        assert_eq!(config, ProvisionConfig::default());
        assert_eq!(config.package.binary, "codex");
        assert_eq!(config.registration.cli, "claude");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[registration]\ncli = \"/opt/bin/claude\"\n").unwrap();

        let config = ProvisionConfig::load_from(&path).unwrap();
        assert_eq!(config.registration.cli, "/opt/bin/claude");
        assert_eq!(config.registration.scope, "user");
        assert_eq!(config.package, PackageConfig::default());
        assert_eq!(config.workspace, WorkspaceConfig::default());
    }

    #[test]
    fn test_invalid_file_is_config_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[package\nname = 1").unwrap();

        let err = ProvisionConfig::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProvisionError>(),
            Some(ProvisionError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_save_then_load() {
        let temp = tempdir().unwrap();
        let path = ProvisionConfig::default_path(temp.path());

        let mut config = ProvisionConfig::default();
        config.paths.shell_profile = Some("~/.profile".to_string());
        config.timeouts.command_secs = 0;
        config.save_to(&path).unwrap();

        let loaded = ProvisionConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.timeouts.command_timeout(), None);
    }
}
