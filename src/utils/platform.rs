//! Platform helpers: home directory, `~` expansion and program lookup.
//!
//! Program lookup never consults the inherited `PATH` directly. The installer
//! first builds a *search path* (npm's global bin dir, `~/.local/bin`, then the
//! inherited `PATH`) with [`join_search_path`] and resolves every program
//! against it with [`find_program`]. The same value is handed to child
//! processes so a CLI installed moments ago is visible to later steps.

use crate::core::ProvisionError;
use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Returns true when compiled for Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// The user's home directory as reported by the platform.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| ProvisionError::HomeDirNotFound.into())
}

/// Expand a leading `~` against `home`.
///
/// `~` is resolved against the effective home, not `$HOME`, so `--home`
/// redirects every per-user path. Paths without a tilde are returned as-is.
#[must_use]
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    let home = home.to_string_lossy().into_owned();
    PathBuf::from(shellexpand::tilde_with_context(path, || Some(home)).into_owned())
}

/// Render `path` with the home prefix replaced by `~` for display.
#[must_use]
pub fn display_path(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}

/// Build a search path from `prefix` directories followed by `inherited`.
///
/// Entries keep their first position; later duplicates are dropped.
pub fn join_search_path(prefix: &[PathBuf], inherited: Option<&OsStr>) -> Result<OsString> {
    let mut entries: Vec<PathBuf> = Vec::new();

    let inherited_entries = inherited.map(|value| std::env::split_paths(value).collect::<Vec<_>>());

    for entry in prefix.iter().cloned().chain(inherited_entries.into_iter().flatten()) {
        if entry.as_os_str().is_empty() || entries.contains(&entry) {
            continue;
        }
        entries.push(entry);
    }

    std::env::join_paths(entries).context("Search path entry contains a path separator")
}

/// Resolve `program` against `search_path`.
///
/// Names containing a path separator are checked as given (relative to the
/// current directory), so config values like `/opt/bin/claude` work too.
#[must_use]
pub fn find_program(program: &str, search_path: &OsStr) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    which::which_in(program, Some(search_path), cwd).ok()
}
