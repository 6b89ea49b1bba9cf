//! Builder for running external programs with consistent error handling
//!
//! Every subprocess this tool starts (`npm`, the registration CLI) goes through
//! [`ToolCommand`], which provides:
//!
//! - **Search path injection**: the `PATH` computed by the installer is passed
//!   to the child, so programs installed earlier in the run are found
//! - **Timeouts**: a hung `npm install` cannot stall provisioning forever
//! - **Secret masking**: API keys passed as arguments never reach the logs or
//!   error messages
//! - **Typed failures**: a non-zero exit becomes [`ProvisionError::CommandFailed`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use mcp_provision::process::ToolCommand;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let prefix = ToolCommand::new("npm")
//!     .args(["prefix", "-g"])
//!     .execute_stdout()
//!     .await?;
//! println!("npm global prefix: {prefix}");
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::DEFAULT_COMMAND_TIMEOUT;
use crate::core::ProvisionError;

/// Placeholder substituted for secret values in logs and errors.
const MASK: &str = "****";

/// Fluent builder for one external command invocation.
///
/// Defaults: output captured, stdin closed, 10-minute timeout, environment
/// inherited from the parent process.
pub struct ToolCommand {
    /// Program name or path
    program: PathBuf,

    /// Arguments in order
    args: Vec<String>,

    /// Environment overrides for the child
    env_vars: Vec<(String, OsString)>,

    /// Working directory (defaults to the current directory)
    current_dir: Option<PathBuf>,

    /// Maximum duration to wait for completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Values masked wherever the command line is displayed
    secrets: Vec<String>,
}

impl ToolCommand {
    /// Create a builder for `program`.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env_vars: Vec::new(),
            current_dir: None,
            timeout_duration: Some(DEFAULT_COMMAND_TIMEOUT),
            secrets: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Run the child with `search_path` as its `PATH`.
    pub fn search_path(self, search_path: impl Into<OsString>) -> Self {
        self.env("PATH", search_path)
    }

    /// Set the working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set a custom timeout (None for no timeout).
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Mask `value` wherever this command line is logged or reported.
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.secrets.push(value);
        }
        self
    }

    /// The program name used in logs and errors.
    fn program_display(&self) -> String {
        self.program.display().to_string()
    }

    /// The argument list with secrets masked.
    #[must_use]
    pub fn display_args(&self) -> String {
        let joined = self.args.join(" ");
        self.secrets.iter().fold(joined, |acc, secret| acc.replace(secret.as_str(), MASK))
    }

    /// Execute the command and return its captured output.
    pub async fn execute(self) -> Result<CommandOutput> {
        let start = std::time::Instant::now();
        let program = self.program_display();
        let shown_args = self.display_args();

        tracing::debug!(target: "provision::process", "Executing command: {} {}", program, shown_args);

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let output_future = cmd.output();

        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.with_context(|| format!("Failed to execute {program} {shown_args}"))?
            } else {
                tracing::warn!(
                    target: "provision::process",
                    "Command timed out after {} seconds: {} {}",
                    duration.as_secs(),
                    program,
                    shown_args
                );
                return Err(ProvisionError::CommandTimedOut {
                    program,
                    args: shown_args,
                    seconds: duration.as_secs(),
                }
                .into());
            }
        } else {
            output_future
                .await
                .with_context(|| format!("Failed to execute {program} {shown_args}"))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "provision::process",
                "Command failed with exit code: {:?}",
                output.status.code()
            );
            let message = if stderr.trim().is_empty() {
                stdout
            } else {
                stderr
            };
            let message = self
                .secrets
                .iter()
                .fold(message, |acc, secret| acc.replace(secret.as_str(), MASK));
            return Err(ProvisionError::CommandFailed {
                program,
                args: shown_args,
                code: output.status.code(),
                stderr: message,
            }
            .into());
        }

        if !stdout.trim().is_empty() {
            tracing::trace!(target: "provision::process", "{}", stdout.trim());
        }
        if !stderr.trim().is_empty() {
            tracing::trace!(target: "provision::process", "{}", stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::debug!(
                target: "provision::perf",
                "{} {} took {:.2}s",
                program,
                shown_args,
                elapsed.as_secs_f64()
            );
        }

        Ok(CommandOutput {
            stdout,
            stderr,
        })
    }

    /// Execute the command and return only stdout, trimmed.
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute the command, discarding its output.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Captured output of a successful command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}
