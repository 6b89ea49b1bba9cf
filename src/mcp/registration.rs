//! Registering stdio servers with an agent CLI.
//!
//! The CLI (by default `claude`) owns its own server registry, reachable only
//! through its `mcp` subcommands:
//!
//! ```text
//! claude mcp list
//! claude mcp add --scope user [-e KEY=VALUE ...] <name> -- <command> <args...>
//! ```
//!
//! [`Registrar::ensure_registered`] lists first and adds only names that are
//! not already present, so a rerun never duplicates or overwrites an entry.

use super::{ManagedServer, StdioLaunch};
use crate::process::ToolCommand;
use anyhow::{Context, Result};
use regex::Regex;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

/// What [`Registrar::ensure_registered`] did for one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The name was already listed; nothing was run.
    AlreadyRegistered,
    /// `mcp add` ran successfully.
    Added,
}

/// Drives one registration CLI.
#[derive(Debug, Clone)]
pub struct Registrar {
    program: PathBuf,
    scope: String,
    search_path: OsString,
    timeout: Option<Duration>,
}

impl Registrar {
    /// Create a registrar for the resolved CLI at `program`.
    pub fn new(
        program: impl Into<PathBuf>,
        scope: impl Into<String>,
        search_path: impl Into<OsString>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            program: program.into(),
            scope: scope.into(),
            search_path: search_path.into(),
            timeout,
        }
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(&self.program)
            .search_path(self.search_path.clone())
            .with_timeout(self.timeout)
    }

    /// Output of `mcp list`, stdout followed by stderr.
    ///
    /// Some CLI versions print the listing to stderr, so both are searched.
    pub async fn list(&self) -> Result<String> {
        let output = self
            .command()
            .args(["mcp", "list"])
            .execute()
            .await
            .context("Failed to list registered MCP servers")?;
        Ok(format!("{}\n{}", output.stdout, output.stderr))
    }

    /// Whether `listing` contains a line starting with `<name>:`.
    #[must_use]
    pub fn is_listed(listing: &str, name: &str) -> bool {
        let pattern = format!(r"(?m)^\s*{}\s*:", regex::escape(name));
        Regex::new(&pattern).is_ok_and(|re| re.is_match(listing))
    }

    /// Arguments of the `mcp add` invocation for `name`.
    #[must_use]
    pub fn add_args(&self, name: &str, launch: &StdioLaunch) -> Vec<String> {
        let mut args =
            vec!["mcp".to_string(), "add".to_string(), "--scope".to_string(), self.scope.clone()];
        for (key, value) in &launch.env {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push(name.to_string());
        args.push("--".to_string());
        args.push(launch.command.clone());
        args.extend(launch.args.iter().cloned());
        args
    }

    /// Run `mcp add` for `name`, masking `secret` in logs and errors.
    pub async fn add(&self, name: &str, launch: &StdioLaunch, secret: Option<&str>) -> Result<()> {
        let mut command = self.command().args(self.add_args(name, launch));
        if let Some(secret) = secret {
            command = command.secret(secret);
        }
        command
            .execute_success()
            .await
            .with_context(|| format!("Failed to register MCP server '{name}'"))
    }

    /// Register `server` unless it is already listed.
    ///
    /// Servers without a stdio launch are editor-only and never registered;
    /// they report [`Registration::AlreadyRegistered`] without running
    /// anything.
    pub async fn ensure_registered(
        &self,
        server: &ManagedServer,
        listing: &str,
    ) -> Result<Registration> {
        let Some(launch) = &server.stdio else {
            return Ok(Registration::AlreadyRegistered);
        };

        if Self::is_listed(listing, server.name()) {
            tracing::debug!(target: "provision::register", "{} already registered", server.name());
            return Ok(Registration::AlreadyRegistered);
        }

        self.add(server.name(), launch, server.secret.as_deref()).await?;
        Ok(Registration::Added)
    }
}
