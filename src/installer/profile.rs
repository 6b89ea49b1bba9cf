//! The PATH block in the user's shell profile.

use crate::constants::{PROFILE_BEGIN_MARKER, PROFILE_END_MARKER};
use crate::core::FileChange;
use crate::utils::append_once;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Render the marker-delimited block prepending `dirs` to `PATH`.
#[must_use]
pub fn render_block(dirs: &[PathBuf]) -> String {
    let mut entries: Vec<String> =
        dirs.iter().map(|dir| escape_double_quoted(&dir.to_string_lossy())).collect();
    entries.push("$PATH".to_string());
    let joined = entries.join(":");

    format!("{PROFILE_BEGIN_MARKER}\nexport PATH=\"{joined}\"\n{PROFILE_END_MARKER}\n")
}

/// Escape characters that are special inside a double-quoted shell string.
fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '$' | '\\' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append the block to `profile` unless the begin marker is already there.
pub fn ensure_profile_block(profile: &Path, dirs: &[PathBuf]) -> Result<FileChange> {
    let change = append_once(
        profile,
        |content| content.contains(PROFILE_BEGIN_MARKER),
        &render_block(dirs),
        None,
    )?;
    tracing::debug!(target: "provision::profile", "{}: {}", profile.display(), change);
    Ok(change)
}
