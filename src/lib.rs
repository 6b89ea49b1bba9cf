//! mcp-provision - idempotent provisioning of MCP servers for AI coding tools
//!
//! A single `mcp-provision install` sets up a development environment's
//! AI-tooling integrations:
//!
//! - installs a coding CLI through npm when it is missing
//! - declares MCP (Model Context Protocol) servers in the CLI's TOML config
//! - registers them with an agent CLI through `mcp list` / `mcp add`
//! - merges them into editor `mcp.json` files (per user and per workspace)
//! - puts npm's global bin dir and `~/.local/bin` on `PATH` in the shell profile
//!
//! Every step is an idempotent file mutation or external command, gated by
//! the presence of its inputs. Running twice leaves every file byte-identical
//! to the first run. Nothing is ever removed.
//!
//! # Modules
//!
//! - [`cli`] - clap command definitions (`install`, `status`, `config`)
//! - [`installer`] - the ordered provisioning steps and their report
//! - [`mcp`] - server catalog plus TOML, JSON and registration writers
//! - [`config`] - tool configuration, environment snapshot, path resolution
//! - [`process`] - external command builder with timeouts and secret masking
//! - [`core`] - error types and user-facing error rendering
//! - [`utils`] - atomic writes, run lock, platform helpers, spinner
//!
//! # Managed servers
//!
//! | Server | Needs | TOML / CLI | Editor |
//! |--------|-------|------------|--------|
//! | `context7` | `CONTEXT7_API_KEY` | `npx -y @upstash/context7-mcp --api-key <KEY>` | `https://mcp.context7.com/mcp` |
//! | `tavily` | `TAVILY_API_KEY` | `npx -y tavily-mcp@latest` | `https://mcp.tavily.com/mcp/` |
//! | `github` | - | - | `https://api.githubcopilot.com/mcp/` |
//!
//! A server whose key is unset or blank is skipped everywhere.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod installer;
pub mod mcp;
pub mod process;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
