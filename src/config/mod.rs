//! Configuration for a provisioning run.
//!
//! Three inputs shape every run:
//!
//! - [`ProvisionConfig`]: the optional `~/.mcp-provision/config.toml` naming
//!   the package to install, the registration CLI and the file locations
//! - [`EnvVars`]: a snapshot of the environment (API keys, workspace hints)
//! - the effective home directory (`--home`, `MCP_PROVISION_HOME`, or the
//!   platform home)
//!
//! [`ProvisionContext`] binds them together and resolves concrete paths.

mod context;
mod env;
mod global;

pub use context::ProvisionContext;
pub use env::EnvVars;
pub use global::{
    PackageConfig, PathsConfig, ProvisionConfig, RegistrationConfig, TimeoutConfig,
    WorkspaceConfig,
};
