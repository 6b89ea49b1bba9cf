//! The provisioning run.
//!
//! [`Installer::run`] executes the steps below strictly in order, under the
//! run lock, and records one [`Outcome`] per step (per file for editor
//! configs):
//!
//! 1. **search path**: npm global bin + `~/.local/bin` + inherited `PATH`
//! 2. **package**: `npm install -g <package>` when its binary is missing
//! 3. **workspace**: `--workspace`, workspace env vars, then scan roots
//! 4. **codex config**: `[mcp_servers.<name>]` sections for keyed servers
//! 5. **registration**: `<cli> mcp add` for keyed servers not yet listed
//! 6. **editor config**: `mcp.json` merge for user and workspace files
//! 7. **shell profile**: the PATH block, appended once
//!
//! Missing optional inputs (a key, a program, a workspace) are soft-skips and
//! never fail the run. Everything else is fatal and propagates immediately,
//! leaving earlier steps' writes in place.

mod package;
mod profile;
mod report;
mod workspace;

pub use package::{SearchPath, build_search_path, ensure_package};
pub use profile::{ensure_profile_block, render_block};
pub use report::{InstallReport, Outcome, StepRecord};
pub use workspace::{Workspace, WorkspaceSource, detect_workspace};

use crate::config::ProvisionContext;
use crate::mcp::ServerPlan;
use crate::mcp::editor_config::merge_file;
use crate::mcp::registration::{Registrar, Registration};
use crate::mcp::toml_config::ensure_server_section;
use crate::utils::lock::RunLock;
use crate::utils::platform::display_path;
use anyhow::Result;
use std::path::PathBuf;

/// Step labels used in the report.
pub mod steps {
    /// Search path assembly
    pub const SEARCH_PATH: &str = "search path";
    /// Global package install
    pub const PACKAGE: &str = "package";
    /// Workspace detection
    pub const WORKSPACE: &str = "workspace";
    /// TOML sections
    pub const CODEX_CONFIG: &str = "codex config";
    /// CLI registration
    pub const REGISTRATION: &str = "registration";
    /// Editor `mcp.json` files (suffixed with the file when it runs)
    pub const EDITOR_CONFIG: &str = "editor config";
    /// Shell profile block
    pub const SHELL_PROFILE: &str = "shell profile";
}

/// Switches for one `install` run.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Do not install the package.
    pub skip_package: bool,
    /// Do not register servers with the CLI.
    pub skip_register: bool,
    /// Do not touch editor `mcp.json` files.
    pub skip_editor: bool,
    /// Do not touch the shell profile.
    pub skip_profile: bool,
    /// Workspace directory overriding detection.
    pub workspace: Option<PathBuf>,
    /// Suppress progress lines and the spinner.
    pub quiet: bool,
}

/// Runs the provisioning steps against one context.
pub struct Installer<'a> {
    ctx: &'a ProvisionContext,
    options: InstallOptions,
}

impl<'a> Installer<'a> {
    /// Create an installer.
    #[must_use]
    pub const fn new(ctx: &'a ProvisionContext, options: InstallOptions) -> Self {
        Self {
            ctx,
            options,
        }
    }

    /// Execute every step in order and return the report.
    pub async fn run(&self) -> Result<InstallReport> {
        let lock = RunLock::acquire(&self.ctx.lock_path()).await?;
        tracing::debug!(target: "provision::install", "holding {}", lock.path().display());

        let mut report = InstallReport::new(self.options.quiet);
        let plan = ServerPlan::resolve(&self.ctx.env);
        for skipped in &plan.skipped {
            report.note(format!("{} not set; skipping {}", skipped.key_var, skipped.entry.name()));
        }

        let search = build_search_path(self.ctx).await?;
        report.record(
            steps::SEARCH_PATH,
            match &search.global_bin {
                Some(_) => Outcome::Unchanged,
                None => Outcome::skipped(format!(
                    "{} not on PATH; using ~/.local/bin and inherited PATH",
                    self.ctx.config.package.manager
                )),
            },
        );

        let outcome = if self.options.skip_package {
            Outcome::skipped("--skip-package")
        } else {
            ensure_package(self.ctx, &search, !self.options.quiet).await?
        };
        report.record(steps::PACKAGE, outcome);

        let workspace = detect_workspace(self.ctx, self.options.workspace.as_deref())?;
        if let Some(ws) = &workspace {
            report.note(format!("workspace: {}", ws.dir.display()));
        }
        let outcome = match &workspace {
            Some(_) => Outcome::Unchanged,
            None => Outcome::skipped("no workspace found"),
        };
        report.record(steps::WORKSPACE, outcome);

        let outcome = self.write_codex_config(&plan)?;
        report.record(steps::CODEX_CONFIG, outcome);

        let outcome = self.register_servers(&plan, &search).await?;
        report.record(steps::REGISTRATION, outcome);

        self.merge_editor_configs(&plan, workspace.as_ref(), &mut report)?;

        let outcome = if self.options.skip_profile {
            Outcome::skipped("--skip-profile")
        } else {
            let dirs: Vec<PathBuf> =
                search.global_bin.iter().cloned().chain([search.local_bin.clone()]).collect();
            let change = ensure_profile_block(&self.ctx.shell_profile_path(), &dirs)?;
            Outcome::from_change(change.is_change())
        };
        report.record(steps::SHELL_PROFILE, outcome);

        Ok(report)
    }

    fn write_codex_config(&self, plan: &ServerPlan) -> Result<Outcome> {
        let path = self.ctx.codex_config_path();
        let mut outcome = Outcome::skipped("no API keys set");

        for (server, launch) in plan.stdio_servers() {
            let change = ensure_server_section(&path, server.name(), launch)?;
            outcome = outcome.combine(Outcome::from_change(change.is_change()));
        }

        Ok(outcome)
    }

    async fn register_servers(&self, plan: &ServerPlan, search: &SearchPath) -> Result<Outcome> {
        if self.options.skip_register {
            return Ok(Outcome::skipped("--skip-register"));
        }
        if plan.stdio_servers().next().is_none() {
            return Ok(Outcome::skipped("no API keys set"));
        }

        let registration = &self.ctx.config.registration;
        let Some(cli) = search.find(&registration.cli) else {
            return Ok(Outcome::skipped(format!("{} not on PATH", registration.cli)));
        };

        let registrar = Registrar::new(
            cli,
            registration.scope.clone(),
            search.value.clone(),
            self.ctx.command_timeout(),
        );
        let listing = registrar.list().await?;

        let mut outcome = Outcome::Unchanged;
        for (server, _) in plan.stdio_servers() {
            if registrar.ensure_registered(server, &listing).await? == Registration::Added {
                outcome = Outcome::Applied;
            }
        }
        Ok(outcome)
    }

    fn merge_editor_configs(
        &self,
        plan: &ServerPlan,
        workspace: Option<&Workspace>,
        report: &mut InstallReport,
    ) -> Result<()> {
        if self.options.skip_editor {
            report.record(steps::EDITOR_CONFIG, Outcome::skipped("--skip-editor"));
            return Ok(());
        }

        let mut targets = self.ctx.editor_user_config_paths();
        if let Some(ws) = workspace {
            targets.push(ws.editor_config_path());
        }

        let editor_plan = plan.editor_plan();
        let backup_dir = self.ctx.backup_dir();
        for path in targets {
            let merge = merge_file(&path, &editor_plan, &backup_dir)?;
            if let Some(backup) = &merge.backup {
                report.note(format!(
                    "{} could not be parsed; previous content saved to {}",
                    display_path(&path, &self.ctx.home),
                    backup.display()
                ));
            }
            report.record(
                format!("{} ({})", steps::EDITOR_CONFIG, display_path(&path, &self.ctx.home)),
                Outcome::from_change(merge.change.is_change()),
            );
        }
        Ok(())
    }
}
