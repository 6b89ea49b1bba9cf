//! Snapshot of the process environment.
//!
//! Provisioning decisions hinge on environment variables (API keys, workspace
//! hints, `SHELL`). They are read once into [`EnvVars`] and passed down, so
//! tests can build an environment without touching the real process state.

use std::collections::HashMap;
use std::ffi::OsString;

/// Immutable set of environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvVars {
    vars: HashMap<String, String>,
    path: Option<OsString>,
}

impl EnvVars {
    /// Capture the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are ignored, except
    /// `PATH`, which is kept verbatim.
    #[must_use]
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self {
            vars,
            path: std::env::var_os("PATH"),
        }
    }

    /// Builder-style setter, mainly for tests.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == "PATH" {
            self.path = Some(OsString::from(&value));
        }
        self.vars.insert(key, value);
        self
    }

    /// Raw value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value of `key` trimmed, or `None` when unset or blank.
    ///
    /// This is the presence test used for every optional input: an exported
    /// but empty API key counts as missing.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|value| !value.is_empty())
    }

    /// The inherited `PATH`.
    #[must_use]
    pub fn path(&self) -> Option<&std::ffi::OsStr> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_treats_blank_as_missing() {
        let env = EnvVars::default().with("A", "value").with("B", "   ").with("C", "");
        assert_eq!(env.non_empty("A"), Some("value"));
        assert_eq!(env.non_empty("B"), None);
        assert_eq!(env.non_empty("C"), None);
        assert_eq!(env.non_empty("D"), None);
    }

    #[test]
    fn test_non_empty_trims() {
        let env = EnvVars::default().with("KEY", "  abc\n");
        assert_eq!(env.non_empty("KEY"), Some("abc"));
        assert_eq!(env.get("KEY"), Some("  abc\n"));
    }

    #[test]
    fn test_with_path() {
        let env = EnvVars::default().with("PATH", "/usr/bin");
        assert_eq!(env.path(), Some(std::ffi::OsStr::new("/usr/bin")));
    }
}
