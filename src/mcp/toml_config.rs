//! `[mcp_servers.<name>]` sections in the CLI's TOML config.
//!
//! Sections are append-only: a section is written the first time its server
//! is provisioned and never touched again, so user edits survive every rerun.
//! A section counts as present when its header line appears verbatim or, for
//! files that parse, when `mcp_servers.<name>` exists in any TOML spelling.

use super::StdioLaunch;
use crate::constants::{MCP_SERVERS_TABLE, TOML_FILE_HEADER};
use crate::core::FileChange;
use crate::utils::{append_once, read_text_file_opt};
use anyhow::Result;
use std::path::Path;
use toml_edit::{Array, DocumentMut, InlineTable, Item, Table, value};

/// `[mcp_servers.<name>]`, quoting `name` when it is not a bare key.
#[must_use]
pub fn section_header(name: &str) -> String {
    let is_bare =
        !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if is_bare {
        format!("[{MCP_SERVERS_TABLE}.{name}]")
    } else {
        let quoted = name.replace('\\', "\\\\").replace('"', "\\\"");
        format!("[{MCP_SERVERS_TABLE}.\"{quoted}\"]")
    }
}

/// Render the section for one server, ending with a newline.
#[must_use]
pub fn render_section(name: &str, launch: &StdioLaunch) -> String {
    let mut server = Table::new();
    server["command"] = value(launch.command.as_str());

    let args: Array = launch.args.iter().map(String::as_str).collect();
    server["args"] = value(args);

    if !launch.env.is_empty() {
        let mut env = InlineTable::new();
        for (key, val) in &launch.env {
            env.insert(key.as_str(), val.as_str().into());
        }
        server["env"] = value(env);
    }

    let mut servers = Table::new();
    servers.set_implicit(true);
    servers.insert(name, Item::Table(server));

    let mut doc = DocumentMut::new();
    doc.insert(MCP_SERVERS_TABLE, Item::Table(servers));
    doc.to_string()
}

/// Whether `content` already defines the section for `name`.
#[must_use]
pub fn has_section(content: &str, name: &str) -> bool {
    let header = section_header(name);
    if content.lines().any(|line| line.trim() == header) {
        return true;
    }

    content.parse::<DocumentMut>().ok().is_some_and(|doc| {
        doc.get(MCP_SERVERS_TABLE)
            .and_then(Item::as_table_like)
            .is_some_and(|servers| servers.contains_key(name))
    })
}

/// Names under `mcp_servers` in `content`; empty when it does not parse.
#[must_use]
pub fn configured_servers(content: &str) -> Vec<String> {
    let Ok(doc) = content.parse::<DocumentMut>() else {
        return Vec::new();
    };
    doc.get(MCP_SERVERS_TABLE)
        .and_then(Item::as_table_like)
        .map(|servers| servers.iter().map(|(key, _)| key.to_string()).collect())
        .unwrap_or_default()
}

/// Append the section for `name` to `path` unless it is already there.
///
/// The file is created with a header comment when missing.
pub fn ensure_server_section(path: &Path, name: &str, launch: &StdioLaunch) -> Result<FileChange> {
    let block = render_section(name, launch);
    let change =
        append_once(path, |content| has_section(content, name), &block, Some(TOML_FILE_HEADER))?;

    tracing::debug!(
        target: "provision::toml",
        "{} in {}: {}",
        section_header(name),
        path.display(),
        change
    );
    Ok(change)
}

/// Server names configured in the TOML file at `path`; `None` when missing.
pub fn read_configured_servers(path: &Path) -> Result<Option<Vec<String>>> {
    Ok(read_text_file_opt(path)?.map(|content| configured_servers(&content)))
}
