//! Error handling for mcp-provision
//!
//! Failures fall into two buckets:
//! 1. **Soft-skips**: an optional integration is unavailable or its input is
//!    missing. These are not errors at all; the installer records them as
//!    [`Outcome::Skipped`](crate::installer::Outcome::Skipped) and moves on.
//! 2. **Fatal errors**: anything else. They propagate with `?` and abort the
//!    run, exactly like a failing command under `set -e`.
//!
//! Fatal errors are typed as [`ProvisionError`] where the cause is known and
//! carried through [`anyhow::Error`] with `.with_context(...)` elsewhere. At the
//! top level [`user_friendly_error`] turns any error into an [`ErrorContext`]
//! with details and an actionable suggestion.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mcp_provision::core::{ProvisionError, user_friendly_error};
//!
//! let error = anyhow::Error::from(ProvisionError::HomeDirNotFound);
//! let context = user_friendly_error(error);
//! context.display(); // Prints a colored error with a suggestion to stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Fatal error cases of a provisioning run.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// An external program exited with a non-zero status.
    ///
    /// Covers `npm install -g`, `npm prefix -g` and the registration CLI's
    /// `mcp list` / `mcp add` subcommands.
    #[error("Command failed: {program} {args}")]
    CommandFailed {
        /// Program that was executed
        program: String,
        /// Space-joined arguments, secrets already masked
        args: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard error (or stdout when stderr was empty)
        stderr: String,
    },

    /// An external program did not finish within the configured timeout.
    #[error("Command timed out after {seconds} seconds: {program} {args}")]
    CommandTimedOut {
        /// Program that was executed
        program: String,
        /// Space-joined arguments, secrets already masked
        args: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// The workspace passed with `--workspace` is not a directory.
    #[error("Workspace directory does not exist: {path}")]
    InvalidWorkspace {
        /// The path as given on the command line
        path: String,
    },

    /// The tool configuration file exists but cannot be parsed.
    #[error("Invalid configuration file {path}: {reason}")]
    ConfigParse {
        /// Path of the configuration file
        path: String,
        /// Parser message
        reason: String,
    },

    /// The configuration file already exists and `--force` was not given.
    #[error("Configuration file already exists: {path}")]
    ConfigExists {
        /// Path of the existing configuration file
        path: String,
    },

    /// Neither `--home`, `MCP_PROVISION_HOME` nor the platform home is available.
    #[error("Could not determine home directory")]
    HomeDirNotFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// An error paired with optional details and a suggestion for the user.
///
/// ```rust,no_run
/// use mcp_provision::core::{ErrorContext, ProvisionError};
///
/// let context = ErrorContext::new(ProvisionError::HomeDirNotFound)
///     .with_suggestion("Pass --home <dir>")
///     .with_details("HOME is not set in this environment");
/// println!("{context}");
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ProvisionError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: ProvisionError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow,
    /// suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] for CLI display.
///
/// Recognises [`ProvisionError`] (even beneath `.context(...)` layers),
/// [`std::io::Error`] and [`toml::de::Error`]. Context layers added on the way
/// up are kept in the details so the user sees which file or command failed.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let chain = context_chain(&error);

    let context = match error.downcast::<ProvisionError>() {
        Ok(provision_error) => create_error_context(provision_error),
        Err(error) => generic_error_context(error),
    };

    match (chain, context.details.is_some()) {
        (Some(chain), false) => context.with_details(chain),
        (Some(chain), true) => {
            let details = format!("{}\n{chain}", context.details.as_deref().unwrap_or_default());
            ErrorContext {
                details: Some(details),
                ..context
            }
        }
        (None, _) => context,
    }
}

/// Outer context messages, outermost first, excluding the root cause.
fn context_chain(error: &anyhow::Error) -> Option<String> {
    let layers: Vec<String> = error.chain().map(ToString::to_string).collect();
    if layers.len() < 2 {
        return None;
    }
    let outer = &layers[..layers.len() - 1];
    Some(outer.join("\n  while: "))
}

fn generic_error_context(error: anyhow::Error) -> ErrorContext {
    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(ProvisionError::Other {
                    message: io_error.to_string(),
                })
                .with_suggestion("Check ownership of the file or directory named above");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(ProvisionError::Other {
                    message: io_error.to_string(),
                })
                .with_suggestion("Check that the path exists and is spelled correctly");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(ProvisionError::Other {
            message: toml_error.to_string(),
        })
        .with_suggestion("Fix the TOML syntax in the file named above");
    }

    let root = error.root_cause().to_string();
    ErrorContext::new(ProvisionError::Other {
        message: root,
    })
}

/// Map each [`ProvisionError`] variant to a tailored suggestion.
fn create_error_context(error: ProvisionError) -> ErrorContext {
    match error {
        ProvisionError::CommandFailed {
            ref stderr,
            code,
            ..
        } => {
            let details = match code {
                Some(code) if stderr.trim().is_empty() => format!("exit code {code}"),
                Some(code) => format!("exit code {code}: {}", stderr.trim()),
                None if stderr.trim().is_empty() => "terminated by signal".to_string(),
                None => format!("terminated by signal: {}", stderr.trim()),
            };
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Run the command by hand to see its full output, then re-run mcp-provision")
        }
        ProvisionError::CommandTimedOut {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check network connectivity or raise [timeouts] command_secs in the config file"),
        ProvisionError::InvalidWorkspace {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Pass an existing directory to --workspace, or omit it to auto-detect"),
        ProvisionError::ConfigParse {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Fix the file or regenerate it with 'mcp-provision config init --force'",
        ),
        ProvisionError::ConfigExists {
            ..
        } => ErrorContext::new(error).with_suggestion("Use --force to overwrite it"),
        ProvisionError::HomeDirNotFound => ErrorContext::new(error)
            .with_suggestion("Set HOME, or pass --home <dir> / MCP_PROVISION_HOME"),
        ProvisionError::Io(_) => {
            ErrorContext::new(error).with_suggestion("Check file permissions and free disk space")
        }
        ProvisionError::TomlDe(_) => {
            ErrorContext::new(error).with_suggestion("Fix the TOML syntax in the file named above")
        }
        ProvisionError::Json(_) => ErrorContext::new(error),
        ProvisionError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
