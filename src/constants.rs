//! Global constants used throughout the mcp-provision codebase.
//!
//! File names, marker strings, environment variable names and timeouts that
//! more than one module needs live here so they are defined exactly once.

use std::time::Duration;

/// Tag prefixed to every user-facing progress line.
pub const LOG_TAG: &str = "[mcp-provision]";

/// Per-user directory holding the tool's own config, lock file and backups.
pub const TOOL_DIR: &str = ".mcp-provision";

/// File name of the tool configuration inside [`TOOL_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// File name of the run lock inside [`TOOL_DIR`].
pub const LOCK_FILE: &str = "provision.lock";

/// Directory (inside [`TOOL_DIR`]) receiving backups of unparsable JSON files.
pub const BACKUP_DIR: &str = "backups";

/// Environment variable overriding the tool configuration path.
pub const CONFIG_PATH_ENV: &str = "MCP_PROVISION_CONFIG";

/// Environment variable overriding the home directory used for per-user paths.
pub const HOME_ENV: &str = "MCP_PROVISION_HOME";

/// First line of the shell-profile block. Its presence means the block exists.
pub const PROFILE_BEGIN_MARKER: &str = "# >>> mcp-provision >>>";

/// Last line of the shell-profile block.
pub const PROFILE_END_MARKER: &str = "# <<< mcp-provision <<<";

/// Top-level TOML table holding MCP server sections.
pub const MCP_SERVERS_TABLE: &str = "mcp_servers";

/// Header comment written when the TOML config file is created.
pub const TOML_FILE_HEADER: &str = "# MCP servers provisioned by mcp-provision.\n\
# Sections are appended once; edit them freely, they are never rewritten.\n";

/// Default timeout for external commands (10 minutes).
///
/// `npm install -g` on a cold cache is the slowest command we run.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);
