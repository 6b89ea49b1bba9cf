//! Search path assembly and the global package install.

use super::Outcome;
use crate::config::ProvisionContext;
use crate::process::ToolCommand;
use crate::utils::platform::is_windows;
use crate::utils::progress::Spinner;
use crate::utils::{find_program, join_search_path};
use anyhow::Result;
use std::ffi::OsString;
use std::path::PathBuf;

/// The `PATH` used for every lookup and child process in a run.
#[derive(Debug, Clone)]
pub struct SearchPath {
    /// Joined value handed to children as `PATH`
    pub value: OsString,
    /// Package manager executable, when found
    pub manager: Option<PathBuf>,
    /// Global bin directory reported by the package manager
    pub global_bin: Option<PathBuf>,
    /// `<home>/.local/bin`
    pub local_bin: PathBuf,
}

impl SearchPath {
    /// Resolve `program` on this search path.
    #[must_use]
    pub fn find(&self, program: &str) -> Option<PathBuf> {
        find_program(program, &self.value)
    }
}

/// Build the search path: npm global bin, `~/.local/bin`, inherited `PATH`.
///
/// A missing package manager is not an error; the path is assembled without
/// its bin directory. A failing `prefix -g` is fatal.
pub async fn build_search_path(ctx: &ProvisionContext) -> Result<SearchPath> {
    let local_bin = ctx.home.join(".local").join("bin");
    let initial = join_search_path(std::slice::from_ref(&local_bin), ctx.env.path())?;

    let manager = find_program(&ctx.config.package.manager, &initial);
    let global_bin = match &manager {
        Some(manager) => {
            let prefix = ToolCommand::new(manager)
                .args(["prefix", "-g"])
                .search_path(initial.clone())
                .with_timeout(ctx.command_timeout())
                .execute_stdout()
                .await?;
            let prefix = PathBuf::from(prefix);
            // npm puts global binaries directly in the prefix on Windows
            Some(if is_windows() {
                prefix
            } else {
                prefix.join("bin")
            })
        }
        None => None,
    };

    let mut prefix_dirs: Vec<PathBuf> = global_bin.iter().cloned().collect();
    prefix_dirs.push(local_bin.clone());
    let value = join_search_path(&prefix_dirs, ctx.env.path())?;

    tracing::debug!(
        target: "provision::path",
        "search path: {}",
        value.to_string_lossy()
    );

    Ok(SearchPath {
        value,
        manager,
        global_bin,
        local_bin,
    })
}

/// Install the configured package unless its binary is already on the path.
pub async fn ensure_package(
    ctx: &ProvisionContext,
    search: &SearchPath,
    show_progress: bool,
) -> Result<Outcome> {
    let package = &ctx.config.package;

    if let Some(existing) = search.find(&package.binary) {
        tracing::debug!(
            target: "provision::package",
            "{} found at {}",
            package.binary,
            existing.display()
        );
        return Ok(Outcome::Unchanged);
    }

    let Some(manager) = &search.manager else {
        return Ok(Outcome::skipped(format!("{} not on PATH", package.manager)));
    };

    let spinner = Spinner::start(format!("Installing {}...", package.name), show_progress);
    let result = ToolCommand::new(manager)
        .args(["install", "-g", package.name.as_str()])
        .search_path(search.value.clone())
        .with_timeout(ctx.command_timeout())
        .execute_success()
        .await;
    spinner.finish();
    result?;

    Ok(Outcome::Applied)
}
