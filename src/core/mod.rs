//! Core types shared by every provisioning step.
//!
//! - [`error`]: the fatal error type and user-facing error rendering
//! - [`FileChange`]: what an idempotent file writer did to its target

pub mod error;

pub use error::{ErrorContext, ProvisionError, user_friendly_error};

use std::fmt;

/// Result of an idempotent write against a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    /// The file did not exist and was created.
    Created,
    /// The file existed and its content changed.
    Updated,
    /// The file already held the desired content; it was not touched.
    Unchanged,
}

impl FileChange {
    /// Whether the file on disk was modified.
    #[must_use]
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Updated => write!(f, "updated"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}
