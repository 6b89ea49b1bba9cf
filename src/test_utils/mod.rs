//! Test utilities for mcp-provision
//!
//! Tests never touch the real home directory or the real `claude` / `npm`
//! programs:
//! - [`TestHome`] is a temporary home plus a private `bin` directory that is
//!   the *only* entry on the test `PATH`
//! - [`write_fake_cli`] drops small `/bin/sh` scripts into that directory
//!
//! Fake scripts may only use shell builtins (`echo`, `read`, `[`, `exit`)
//! because nothing else is on their `PATH`.
//!
//! # Example
//!
//! ```rust,no_run
//! use mcp_provision::test_utils::TestHome;
//!
//! let home = TestHome::new();
//! home.write_registration_cli("context7: npx -y @upstash/context7-mcp");
//! let ctx = home.context(&[("CONTEXT7_API_KEY", "abc")]);
//! ```

use crate::config::{EnvVars, ProvisionConfig, ProvisionContext};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; does nothing when neither is
/// set.
///
/// ```bash
/// RUST_LOG=provision=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_ansi(true)
            .try_init();
    });
}

/// Write an executable `/bin/sh` script `name` into `dir`.
///
/// Returns the script path. `dir` is created when missing.
pub fn write_fake_cli(dir: &Path, name: &str, body: &str) -> PathBuf {
    std::fs::create_dir_all(dir).expect("create fake bin dir");
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake cli");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod fake cli");
    }

    path
}

/// Quote `value` as a single-quoted shell word.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// A throwaway home directory with an isolated `bin` directory.
pub struct TestHome {
    temp_dir: TempDir,
    /// Effective home
    pub home: PathBuf,
    /// Only entry on the test `PATH`
    pub bin_dir: PathBuf,
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHome {
    /// Create the temporary home and bin directories.
    #[must_use]
    pub fn new() -> Self {
        init_test_logging(None);

        let temp_dir = TempDir::new().expect("create temp dir");
        let home = temp_dir.path().join("home");
        let bin_dir = temp_dir.path().join("bin");
        std::fs::create_dir_all(&home).expect("create home");
        std::fs::create_dir_all(&bin_dir).expect("create bin");

        Self {
            temp_dir,
            home,
            bin_dir,
        }
    }

    /// Root of the temporary tree (parent of home and bin).
    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `<home>/<relative>`
    #[must_use]
    pub fn path(&self, relative: &str) -> PathBuf {
        self.home.join(relative)
    }

    /// Read `<home>/<relative>`, panicking when missing.
    #[must_use]
    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }

    /// Configuration with workspace scanning disabled.
    #[must_use]
    pub fn config(&self) -> ProvisionConfig {
        let mut config = ProvisionConfig::default();
        config.workspace.scan_roots = Vec::new();
        config.paths.editor_user_configs = vec!["~/.config/Code/User/mcp.json".to_string()];
        config
    }

    /// A context rooted at this home with `PATH` set to the bin dir only.
    #[must_use]
    pub fn context(&self, vars: &[(&str, &str)]) -> ProvisionContext {
        let env = vars.iter().fold(
            EnvVars::default()
                .with("PATH", self.bin_dir.to_string_lossy())
                .with("SHELL", "/bin/bash"),
            |env, (key, value)| env.with(*key, *value),
        );
        ProvisionContext::new(
            self.home.clone(),
            ProvisionConfig::default_path(&self.home),
            self.config(),
            env,
        )
    }

    /// File the fake registration CLI appends `mcp add` arguments to.
    #[must_use]
    pub fn registration_log(&self) -> PathBuf {
        self.root().join("claude.log")
    }

    /// File backing the fake registration CLI's `mcp list` output.
    #[must_use]
    pub fn registry_file(&self) -> PathBuf {
        self.root().join("claude.registry")
    }

    /// Install a fake `claude` that remembers registrations.
    ///
    /// `mcp list` prints the registry, seeded with `listing`. `mcp add` logs
    /// its arguments and appends `<name>: registered` to the registry, where
    /// `<name>` is the argument before `--`.
    pub fn write_registration_cli(&self, listing: &str) -> PathBuf {
        let registry = self.registry_file();
        let seeded = if listing.is_empty() {
            String::new()
        } else {
            format!("{listing}\n")
        };
        std::fs::write(&registry, seeded).expect("seed registry");

        let registry = shell_quote(&registry.to_string_lossy());
        let log = shell_quote(&self.registration_log().to_string_lossy());
        let body = format!(
            r#"if [ "$1" = mcp ] && [ "$2" = list ]; then
  while IFS= read -r line; do echo "$line"; done < {registry}
  exit 0
fi
echo "$@" >> {log}
name=""
for arg in "$@"; do
  if [ "$arg" = "--" ]; then break; fi
  name="$arg"
done
echo "$name: registered" >> {registry}"#
        );
        write_fake_cli(&self.bin_dir, "claude", &body)
    }

    /// Install a fake `claude` whose `mcp add` fails with `message` on stderr.
    pub fn write_failing_registration_cli(&self, message: &str) -> PathBuf {
        let body = format!(
            "if [ \"$1\" = mcp ] && [ \"$2\" = list ]; then\n  exit 0\nfi\necho {message} >&2\nexit 3",
            message = shell_quote(message),
        );
        write_fake_cli(&self.bin_dir, "claude", &body)
    }

    /// Write [`TestHome::config`] to `<root>/config.toml` and return its path.
    pub fn write_tool_config(&self) -> PathBuf {
        let path = self.root().join("config.toml");
        self.config().save_to(&path).expect("write tool config");
        path
    }

    /// Lines logged by the fake registration CLI.
    #[must_use]
    pub fn registration_calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.registration_log())
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
