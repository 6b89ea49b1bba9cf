//! `mcp-provision install`

use crate::config::ProvisionContext;
use crate::installer::{InstallOptions, Installer};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Run every provisioning step.
///
/// Servers gated by an API key (`CONTEXT7_API_KEY`, `TAVILY_API_KEY`) are
/// provisioned only when the key is set. Rerunning is always safe.
#[derive(Args, Debug, Default)]
pub struct InstallCommand {
    /// Do not install the coding CLI package.
    #[arg(long)]
    skip_package: bool,

    /// Do not register servers with the agent CLI.
    #[arg(long)]
    skip_register: bool,

    /// Do not modify editor mcp.json files.
    #[arg(long)]
    skip_editor: bool,

    /// Do not modify the shell profile.
    #[arg(long)]
    skip_profile: bool,

    /// Workspace directory, overriding detection.
    #[arg(long, value_name = "DIR")]
    workspace: Option<PathBuf>,
}

impl InstallCommand {
    /// Run the installer and print its summary.
    pub async fn execute(self, ctx: &ProvisionContext, quiet: bool) -> Result<()> {
        let options = InstallOptions {
            skip_package: self.skip_package,
            skip_register: self.skip_register,
            skip_editor: self.skip_editor,
            skip_profile: self.skip_profile,
            workspace: self.workspace,
            quiet,
        };

        let report = Installer::new(ctx, options).run().await?;
        report.print_summary();
        Ok(())
    }
}
