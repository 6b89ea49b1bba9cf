//! Utility modules shared by the provisioning steps.
//!
//! - [`fs`]: atomic writes, append-once blocks, backups
//! - [`platform`]: home directory, `~` expansion, search path and program lookup
//! - [`lock`]: the process-level run lock
//! - [`progress`]: spinner for slow commands

pub mod fs;
pub mod lock;
pub mod platform;
pub mod progress;

pub use fs::{
    append_once, atomic_write, backup_file, ensure_dir, read_bytes_opt, read_text_file_opt,
    resolve_symlinks, safe_write, write_if_changed,
};
pub use platform::{expand_home, find_program, get_home_dir, join_search_path};
