//! Process-level run lock.
//!
//! Two runs at once would race on appends to the same files. Each run holds an
//! exclusive advisory lock on `~/.mcp-provision/provision.lock`; a second run
//! blocks until the first finishes. The lock is released on drop.

use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Exclusive lock held for the duration of a provisioning run.
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Acquire the lock at `lock_path`, creating the file and its parent.
    pub async fn acquire(lock_path: &Path) -> Result<Self> {
        if let Some(parent) = lock_path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create lock directory: {}", parent.display())
            })?;
        }

        let path = lock_path.to_path_buf();
        let open_path = path.clone();

        // Blocking lock acquisition stays off the runtime's worker
        let file = tokio::task::spawn_blocking(move || -> Result<File> {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&open_path)
                .with_context(|| format!("Failed to open lock file: {}", open_path.display()))?;

            tracing::debug!(target: "provision::lock", "Waiting for {}", open_path.display());
            FileExt::lock_exclusive(&file)
                .with_context(|| format!("Failed to lock: {}", open_path.display()))?;

            Ok(file)
        })
        .await
        .context("Failed to spawn blocking task for lock acquisition")??;

        tracing::debug!(target: "provision::lock", "Acquired {}", path.display());
        Ok(Self {
            file,
            path,
        })
    }

    /// Path of the lock file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(target: "provision::lock", "Failed to unlock {}: {}", self.path.display(), e);
        }
    }
}
