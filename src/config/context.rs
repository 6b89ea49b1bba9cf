//! Resolved inputs of one provisioning run.
//!
//! [`ProvisionContext`] binds together the effective home directory, the tool
//! configuration and the environment snapshot, and turns configured path
//! strings into concrete paths. Nothing below the CLI layer reads the real
//! process environment or `$HOME` directly.

use super::{EnvVars, ProvisionConfig};
use crate::constants::{BACKUP_DIR, LOCK_FILE, TOOL_DIR};
use crate::utils::platform::{expand_home, get_home_dir};
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remote-editor data directories that get their own per-user `mcp.json`
/// when they exist (VS Code Remote / Codespaces, VS Code Server).
const REMOTE_EDITOR_USER_DIRS: &[&str] = &[".vscode-remote/data/User", ".vscode-server/data/User"];

/// Everything a run needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct ProvisionContext {
    /// Effective home; all `~` paths expand against it.
    pub home: PathBuf,
    /// Location the configuration was loaded from (it may not exist).
    pub config_path: PathBuf,
    /// Tool configuration.
    pub config: ProvisionConfig,
    /// Environment snapshot.
    pub env: EnvVars,
}

impl ProvisionContext {
    /// Build a context from already-resolved parts.
    #[must_use]
    pub const fn new(
        home: PathBuf,
        config_path: PathBuf,
        config: ProvisionConfig,
        env: EnvVars,
    ) -> Self {
        Self {
            home,
            config_path,
            config,
            env,
        }
    }

    /// Resolve home and config path, then load the configuration.
    ///
    /// `home` falls back to the platform home directory; `config_path` falls
    /// back to `<home>/.mcp-provision/config.toml`.
    pub fn load(home: Option<PathBuf>, config_path: Option<PathBuf>, env: EnvVars) -> Result<Self> {
        let home = match home {
            Some(home) => home,
            None => get_home_dir()?,
        };
        let config_path = config_path.unwrap_or_else(|| ProvisionConfig::default_path(&home));
        let config = ProvisionConfig::load_or_default(&config_path)?;

        tracing::debug!(
            target: "provision::config",
            "home={} config={}",
            home.display(),
            config_path.display()
        );

        Ok(Self::new(home, config_path, config, env))
    }

    /// Expand a configured path string against the effective home.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        expand_home(path, &self.home)
    }

    /// `<home>/.mcp-provision`
    #[must_use]
    pub fn tool_dir(&self) -> PathBuf {
        self.home.join(TOOL_DIR)
    }

    /// Run lock file.
    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.tool_dir().join(LOCK_FILE)
    }

    /// Directory for backups of unparsable files.
    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.tool_dir().join(BACKUP_DIR)
    }

    /// TOML config receiving `[mcp_servers.*]` sections.
    #[must_use]
    pub fn codex_config_path(&self) -> PathBuf {
        self.resolve(&self.config.paths.codex_config)
    }

    /// Shell profile receiving the PATH block.
    ///
    /// The configured path wins; otherwise `~/.zshrc` for zsh users and
    /// `~/.bashrc` for everyone else.
    #[must_use]
    pub fn shell_profile_path(&self) -> PathBuf {
        if let Some(profile) = &self.config.paths.shell_profile {
            return self.resolve(profile);
        }
        let is_zsh = self
            .env
            .non_empty("SHELL")
            .and_then(|shell| Path::new(shell).file_name())
            .is_some_and(|name| name == "zsh");
        self.home.join(if is_zsh {
            ".zshrc"
        } else {
            ".bashrc"
        })
    }

    /// Editor per-user `mcp.json` targets.
    ///
    /// The configured list, followed by one file per remote-editor data
    /// directory that already exists under home.
    #[must_use]
    pub fn editor_user_config_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> =
            self.config.paths.editor_user_configs.iter().map(|p| self.resolve(p)).collect();

        for dir in REMOTE_EDITOR_USER_DIRS {
            let dir = self.home.join(dir);
            let candidate = dir.join("mcp.json");
            if dir.is_dir() && !paths.contains(&candidate) {
                paths.push(candidate);
            }
        }

        paths
    }

    /// Timeout applied to every external command.
    #[must_use]
    pub const fn command_timeout(&self) -> Option<Duration> {
        self.config.timeouts.command_timeout()
    }
}
