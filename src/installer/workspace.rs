//! Locating the active workspace.

use crate::config::ProvisionContext;
use crate::core::ProvisionError;
use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Markers identifying a directory as a project workspace.
const WORKSPACE_MARKERS: &[&str] = &[".git", ".vscode"];

/// How the workspace was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceSource {
    /// `--workspace`
    Flag,
    /// The named environment variable
    EnvVar(String),
    /// Subdirectory of the given scan root
    Scan(PathBuf),
}

/// A detected workspace directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Workspace root
    pub dir: PathBuf,
    /// Where it came from
    pub source: WorkspaceSource,
}

impl Workspace {
    /// `<workspace>/.vscode/mcp.json`
    #[must_use]
    pub fn editor_config_path(&self) -> PathBuf {
        self.dir.join(".vscode").join("mcp.json")
    }
}

/// Find the workspace: explicit flag, then env vars, then scan roots.
///
/// Only an explicit `--workspace` that is not a directory is an error; every
/// other miss yields `Ok(None)`.
pub fn detect_workspace(
    ctx: &ProvisionContext,
    explicit: Option<&Path>,
) -> Result<Option<Workspace>> {
    if let Some(dir) = explicit {
        if !dir.is_dir() {
            return Err(ProvisionError::InvalidWorkspace {
                path: dir.display().to_string(),
            }
            .into());
        }
        return Ok(Some(Workspace {
            dir: dir.to_path_buf(),
            source: WorkspaceSource::Flag,
        }));
    }

    for var in &ctx.config.workspace.env_vars {
        if let Some(value) = ctx.env.non_empty(var) {
            let dir = ctx.resolve(value);
            if dir.is_dir() {
                return Ok(Some(Workspace {
                    dir,
                    source: WorkspaceSource::EnvVar(var.clone()),
                }));
            }
            tracing::debug!(target: "provision::workspace", "{var}={value} is not a directory");
        }
    }

    for root in &ctx.config.workspace.scan_roots {
        let root = ctx.resolve(root);
        if let Some(dir) = scan_root(&root) {
            return Ok(Some(Workspace {
                dir,
                source: WorkspaceSource::Scan(root),
            }));
        }
    }

    Ok(None)
}

/// First subdirectory of `root`, by name, that carries a workspace marker.
fn scan_root(root: &Path) -> Option<PathBuf> {
    if !root.is_dir() {
        return None;
    }

    WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(target: "provision::workspace", "skipping entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .find(|dir| WORKSPACE_MARKERS.iter().any(|marker| dir.join(marker).exists()))
}
