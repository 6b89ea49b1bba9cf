//! Command-line interface for mcp-provision.
//!
//! # Commands
//!
//! - `install` - run the provisioning steps (the normal entry point)
//! - `status` - show what is provisioned, without changing anything
//! - `config` - create, show or locate the tool configuration file
//!
//! # Global Options
//!
//! - `-v, --verbose` - debug logging
//! - `-q, --quiet` - errors and warnings only, no progress lines
//! - `-c, --config <path>` - configuration file (env: `MCP_PROVISION_CONFIG`)
//! - `--home <dir>` - treat `<dir>` as the home directory (env: `MCP_PROVISION_HOME`)
//!
//! `RUST_LOG`, when set, overrides the level chosen by `--verbose` / `--quiet`.
//!
//! # Examples
//!
//! ```bash
//! # Provision everything
//! CONTEXT7_API_KEY=... mcp-provision install
//!
//! # Only touch files, never run npm or the registration CLI
//! mcp-provision install --skip-package --skip-register
//!
//! # Dry look at the current state
//! mcp-provision status
//! ```

mod config;
mod install;
mod status;

pub use config::ConfigCommand;
pub use install::InstallCommand;
pub use status::{StatusCommand, StatusReport, collect_status};

use crate::config::{EnvVars, ProvisionConfig, ProvisionContext};
use crate::constants::{CONFIG_PATH_ENV, HOME_ENV};
use crate::utils::get_home_dir;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Suppress progress output.
    pub quiet: bool,
    /// Home directory override.
    pub home: Option<PathBuf>,
    /// Configuration file override.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the global tracing subscriber, writing to stderr.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.as_str()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Home directory: the override, else the platform home.
    pub fn resolve_home(&self) -> Result<PathBuf> {
        match &self.home {
            Some(home) => Ok(home.clone()),
            None => get_home_dir(),
        }
    }

    /// Configuration file: the override, else `<home>/.mcp-provision/config.toml`.
    pub fn resolve_config_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(ProvisionConfig::default_path(&self.resolve_home()?)),
        }
    }

    /// Load the full run context from the process environment.
    pub fn load_context(&self) -> Result<ProvisionContext> {
        ProvisionContext::load(
            Some(self.resolve_home()?),
            Some(self.resolve_config_path()?),
            EnvVars::from_process(),
        )
    }
}

/// Idempotent provisioning of MCP servers for AI coding tools.
#[derive(Parser)]
#[command(
    name = "mcp-provision",
    about = "Provision MCP servers for AI coding CLIs and editors",
    version,
    long_about = "Installs the coding CLI, declares MCP servers in its TOML config and in editor \
                  mcp.json files, registers them with the agent CLI and puts the tools on PATH. \
                  Every step is safe to repeat."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file.
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<PathBuf>,

    /// Directory to use as the home directory.
    #[arg(long, global = true, env = HOME_ENV)]
    home: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Install the CLI and provision MCP servers everywhere.
    Install(InstallCommand),

    /// Show the provisioning state without changing anything.
    Status(StatusCommand),

    /// Manage the configuration file.
    Config(ConfigCommand),
}

impl Cli {
    /// Execute the parsed command with settings from the global flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };

        CliConfig {
            log_level: log_level.to_string(),
            quiet: self.quiet,
            home: self.home.clone(),
            config_path: self.config.clone(),
        }
    }

    /// Dispatch to the subcommand.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Install(cmd) => cmd.execute(&config.load_context()?, config.quiet).await,
            Commands::Status(cmd) => cmd.execute(&config.load_context()?),
            Commands::Config(cmd) => cmd.execute(&config.resolve_config_path()?),
        }
    }
}
