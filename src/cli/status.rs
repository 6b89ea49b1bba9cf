//! `mcp-provision status`
//!
//! Read-only view of what an `install` run would find: which keys are set,
//! which servers each config file already declares, the detected workspace and
//! whether the shell profile carries the PATH block. Nothing is written and no
//! external program is run.

use crate::config::ProvisionContext;
use crate::constants::PROFILE_BEGIN_MARKER;
use crate::installer::{Workspace, WorkspaceSource, detect_workspace};
use crate::mcp::{CatalogEntry, editor_config, toml_config};
use crate::utils::platform::display_path;
use crate::utils::read_text_file_opt;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

/// Show the provisioning state.
#[derive(Args, Debug, Default)]
pub struct StatusCommand {}

/// One catalog server as seen on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    /// Server name
    pub name: &'static str,
    /// Gating variable and whether it is set; `None` for ungated servers
    pub key: Option<(&'static str, bool)>,
    /// Whether the TOML config declares it
    pub in_codex_config: bool,
}

/// Servers declared by one editor config; `None` when missing or unparsable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorStatus {
    /// File path
    pub path: PathBuf,
    /// Declared server names
    pub servers: Option<Vec<String>>,
}

/// Everything `status` reports.
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// Effective home, for display
    pub home: PathBuf,
    /// TOML config path
    pub codex_config: PathBuf,
    /// Whether the TOML config exists
    pub codex_config_exists: bool,
    /// Per-server state
    pub servers: Vec<ServerStatus>,
    /// Editor configs (user files, then the workspace file)
    pub editor_configs: Vec<EditorStatus>,
    /// Detected workspace
    pub workspace: Option<Workspace>,
    /// Shell profile path
    pub shell_profile: PathBuf,
    /// Whether the profile carries the PATH block
    pub profile_block: bool,
}

/// Gather the state without modifying anything.
pub fn collect_status(ctx: &ProvisionContext) -> Result<StatusReport> {
    let codex_config = ctx.codex_config_path();
    let configured = toml_config::read_configured_servers(&codex_config)?;

    let servers = CatalogEntry::ALL
        .iter()
        .map(|entry| ServerStatus {
            name: entry.name(),
            key: entry.key_var().map(|var| (var, ctx.env.non_empty(var).is_some())),
            in_codex_config: configured
                .as_ref()
                .is_some_and(|names| names.iter().any(|n| n == entry.name())),
        })
        .collect();

    let workspace = detect_workspace(ctx, None)?;

    let mut editor_paths = ctx.editor_user_config_paths();
    if let Some(ws) = &workspace {
        editor_paths.push(ws.editor_config_path());
    }
    let editor_configs = editor_paths
        .into_iter()
        .map(|path| {
            let servers = editor_config::read_configured_servers(&path)?;
            Ok(EditorStatus {
                path,
                servers,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let shell_profile = ctx.shell_profile_path();
    let profile_block = read_text_file_opt(&shell_profile)?
        .is_some_and(|content| content.contains(PROFILE_BEGIN_MARKER));

    Ok(StatusReport {
        home: ctx.home.clone(),
        codex_config_exists: configured.is_some(),
        codex_config,
        servers,
        editor_configs,
        workspace,
        shell_profile,
        profile_block,
    })
}

fn yes_no(value: bool) -> colored::ColoredString {
    if value {
        "yes".green()
    } else {
        "no".yellow()
    }
}

impl StatusReport {
    /// Print the report to stdout.
    pub fn print(&self) {
        let shown = |path: &std::path::Path| display_path(path, &self.home);

        println!("{}", "MCP servers".bold());
        for server in &self.servers {
            let key = match server.key {
                Some((var, set)) => format!("{var} set: {}", yes_no(set)),
                None => "no key needed".dimmed().to_string(),
            };
            println!(
                "  {} {}  codex config: {}",
                format!("{:<10}", server.name).cyan(),
                key,
                yes_no(server.in_codex_config)
            );
        }

        println!("\n{}", "Files".bold());
        let codex_state = if self.codex_config_exists {
            "exists".green()
        } else {
            "missing".yellow()
        };
        println!("  {}: {}", shown(&self.codex_config), codex_state);

        for editor in &self.editor_configs {
            let state = match &editor.servers {
                Some(names) if names.is_empty() => "no servers".dimmed().to_string(),
                Some(names) => names.join(", "),
                None => "missing or unreadable".yellow().to_string(),
            };
            println!("  {}: {}", shown(&editor.path), state);
        }

        println!("  {}: PATH block {}", shown(&self.shell_profile), yes_no(self.profile_block));

        println!("\n{}", "Workspace".bold());
        match &self.workspace {
            Some(ws) => {
                let source = match &ws.source {
                    WorkspaceSource::Flag => "--workspace".to_string(),
                    WorkspaceSource::EnvVar(var) => format!("${var}"),
                    WorkspaceSource::Scan(root) => format!("scan of {}", shown(root)),
                };
                println!("  {} (from {})", ws.dir.display(), source);
            }
            None => println!("  {}", "none detected".yellow()),
        }
    }
}

impl StatusCommand {
    /// Collect and print the status.
    pub fn execute(self, ctx: &ProvisionContext) -> Result<()> {
        collect_status(ctx)?.print();
        Ok(())
    }
}
