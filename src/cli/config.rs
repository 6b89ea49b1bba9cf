//! `mcp-provision config`
//!
//! Manages the optional tool configuration file (default
//! `~/.mcp-provision/config.toml`). Every setting has a default, so the file
//! only needs to exist when something should differ.
//!
//! ```bash
//! mcp-provision config init          # write the defaults
//! mcp-provision config init --force  # overwrite an existing file
//! mcp-provision config show          # effective configuration
//! mcp-provision config path          # where it is read from
//! ```

use crate::config::ProvisionConfig;
use crate::core::ProvisionError;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::Path;

/// Manage the configuration file.
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommands,
}

#[derive(Subcommand, Debug)]
enum ConfigSubcommands {
    /// Write a configuration file with every default spelled out.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration.
    Show,

    /// Print the configuration file path.
    Path,
}

impl ConfigCommand {
    /// Run the subcommand against the file at `config_path`.
    pub fn execute(self, config_path: &Path) -> Result<()> {
        match self.command {
            ConfigSubcommands::Init {
                force,
            } => init(config_path, force),
            ConfigSubcommands::Show => show(config_path),
            ConfigSubcommands::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
        }
    }
}

fn init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        return Err(ProvisionError::ConfigExists {
            path: config_path.display().to_string(),
        }
        .into());
    }

    ProvisionConfig::default().save_to(config_path)?;
    println!("{} {}", "Created configuration at".green(), config_path.display());
    Ok(())
}

fn show(config_path: &Path) -> Result<()> {
    let config = ProvisionConfig::load_or_default(config_path)?;
    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        format!("{} (not present, showing defaults)", config_path.display())
    };

    println!("{} {}\n", "# Configuration:".bold(), source);
    print!("{}", toml::to_string_pretty(&config).context("Failed to serialize config")?);
    Ok(())
}
