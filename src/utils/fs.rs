//! File system helpers for idempotent configuration writes.
//!
//! Every writer in this crate funnels through [`atomic_write`]: content goes
//! to a temporary file next to the target, is synced, then renamed over the
//! target. A crash therefore leaves either the old or the new file, never a
//! half-appended one. A symlinked target (the usual dotfiles layout) is
//! resolved first, so the link survives and the file it points to changes.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mcp_provision::utils::fs::append_once;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let change = append_once(
//!     Path::new("/home/dev/.bashrc"),
//!     |content| content.contains("# >>> block >>>"),
//!     "# >>> block >>>\nexport FOO=1\n# <<< block <<<\n",
//!     None,
//! )?;
//! println!("profile {change}");
//! # Ok(())
//! # }
//! ```

use crate::core::FileChange;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Create a directory and all of its parents if missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Maximum number of symlink hops followed by [`resolve_symlinks`].
const MAX_SYMLINK_HOPS: usize = 40;

/// Follow `path` through any chain of symlinks to the file it names.
///
/// Relative link targets are resolved against the link's directory. A
/// dangling link resolves to its (missing) target, so writing through it
/// creates the target. Paths that are not symlinks are returned unchanged.
pub fn resolve_symlinks(path: &Path) -> Result<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_SYMLINK_HOPS {
        match fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                let target = fs::read_link(&current)
                    .with_context(|| format!("Failed to read symlink: {}", current.display()))?;
                current = match current.parent() {
                    Some(parent) if target.is_relative() => parent.join(target),
                    _ => target,
                };
            }
            _ => return Ok(current),
        }
    }
    anyhow::bail!("Too many levels of symbolic links: {}", path.display())
}

/// Atomically replace `path` with `content` using write-then-rename.
///
/// Parent directories are created. When `path` is a symlink the final target
/// is replaced and the link is kept. On Unix the permissions of an existing
/// target are carried over so rewriting `~/.bashrc` or a config holding API
/// keys does not widen its mode.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let path = &resolve_symlinks(path)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ensure_dir(&parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(&parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write temp file for: {}", path.display()))?;
    temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions()).with_context(|| {
            format!("Failed to copy permissions of: {}", path.display())
        })?;
    }

    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Convenience wrapper around [`atomic_write`] for string content.
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Read a text file, returning `None` when it does not exist.
pub fn read_text_file_opt(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file: {}", path.display())),
    }
}

/// Read a file's raw bytes, returning `None` when it does not exist.
pub fn read_bytes_opt(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file: {}", path.display())),
    }
}

/// Write `content` only when it differs from what is on disk.
///
/// The comparison is bytewise, so a target that is not valid UTF-8 is simply
/// replaced.
pub fn write_if_changed(path: &Path, content: &str) -> Result<FileChange> {
    match read_bytes_opt(path)? {
        Some(existing) if existing == content.as_bytes() => Ok(FileChange::Unchanged),
        Some(_) => {
            safe_write(path, content)?;
            Ok(FileChange::Updated)
        }
        None => {
            safe_write(path, content)?;
            Ok(FileChange::Created)
        }
    }
}

/// Append `block` to `path` unless `already_present` recognises it.
///
/// When the file does not exist it is created with `header` (if any) followed
/// by `block`. When it exists and `already_present` returns `false`, the block
/// is appended after a blank line. `block` is expected to end with a newline.
pub fn append_once<F>(
    path: &Path,
    already_present: F,
    block: &str,
    header: Option<&str>,
) -> Result<FileChange>
where
    F: Fn(&str) -> bool,
{
    let Some(existing) = read_text_file_opt(path)? else {
        let mut content = String::new();
        if let Some(header) = header {
            content.push_str(header);
            content.push('\n');
        }
        content.push_str(block);
        safe_write(path, &content)?;
        return Ok(FileChange::Created);
    };

    if already_present(&existing) {
        return Ok(FileChange::Unchanged);
    }

    let separator = if existing.is_empty() || existing.ends_with("\n\n") {
        ""
    } else if existing.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    };

    let content = format!("{existing}{separator}{block}");
    safe_write(path, &content)?;
    Ok(FileChange::Updated)
}

/// Copy `path` into `backup_dir` under a timestamped name and return the copy.
///
/// Used before replacing a file whose content could not be parsed, so nothing
/// the user wrote is ever lost.
pub fn backup_file(path: &Path, backup_dir: &Path) -> Result<PathBuf> {
    ensure_dir(backup_dir)?;

    let file_name = path.file_name().map_or_else(
        || "unnamed".to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S%.3f");

    let mut backup_path = backup_dir.join(format!("{file_name}.{stamp}.bak"));
    let mut counter = 1;
    while backup_path.exists() {
        backup_path = backup_dir.join(format!("{file_name}.{stamp}-{counter}.bak"));
        counter += 1;
    }

    fs::copy(path, &backup_path).with_context(|| {
        format!("Failed to back up {} to {}", path.display(), backup_path.display())
    })?;

    Ok(backup_path)
}
