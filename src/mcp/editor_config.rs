//! Editor `mcp.json` merging.
//!
//! Editors keep MCP servers in a JSON document with two managed containers:
//!
//! ```json
//! {
//!   "inputs": [ { "type": "promptString", "id": "github_mcp_pat", ... } ],
//!   "servers": { "github": { "type": "http", "url": "..." } }
//! }
//! ```
//!
//! The merge is key-preserving: every top-level key other than `inputs` and
//! `servers` is carried over untouched, foreign inputs and servers stay, and
//! only entries this tool manages are replaced. Unlike the TOML sections,
//! managed JSON entries are overwritten on each run so a rotated key is picked
//! up. A file that cannot be parsed is backed up before being replaced.

use super::{HttpServer, PromptInput};
use crate::core::FileChange;
use crate::utils::{backup_file, read_bytes_opt, write_if_changed};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const INPUTS_KEY: &str = "inputs";
const SERVERS_KEY: &str = "servers";

/// Managed entries to merge into one editor config.
#[derive(Debug, Clone, Default)]
pub struct EditorMergePlan {
    /// Inputs replacing any existing input with the same id
    pub inputs: Vec<PromptInput>,
    /// Servers inserted or overwritten by name
    pub servers: Vec<(String, HttpServer)>,
}

/// Outcome of merging into one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorMerge {
    /// What happened to the target file
    pub change: FileChange,
    /// Copy of the previous content when it could not be parsed
    pub backup: Option<PathBuf>,
}

/// Merge `plan` into `existing`.
///
/// A non-object root, or a wrong-typed `inputs` / `servers` value, is replaced
/// by an empty container of the right type.
pub fn merge_value(existing: Value, plan: &EditorMergePlan) -> Result<Value> {
    let mut root = match existing {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    if !root.get(INPUTS_KEY).is_some_and(Value::is_array) {
        root.insert(INPUTS_KEY.to_string(), Value::Array(Vec::new()));
    }
    if let Some(Value::Array(inputs)) = root.get_mut(INPUTS_KEY) {
        let managed_ids: HashSet<&str> = plan.inputs.iter().map(|input| input.id.as_str()).collect();
        inputs.retain(|entry| {
            entry
                .get("id")
                .and_then(Value::as_str)
                .is_none_or(|id| !managed_ids.contains(id))
        });
        for input in &plan.inputs {
            inputs.push(serde_json::to_value(input)?);
        }
    }

    if !root.get(SERVERS_KEY).is_some_and(Value::is_object) {
        root.insert(SERVERS_KEY.to_string(), Value::Object(Map::new()));
    }
    if let Some(Value::Object(servers)) = root.get_mut(SERVERS_KEY) {
        for (name, server) in &plan.servers {
            servers.insert(name.clone(), serde_json::to_value(server)?);
        }
    }

    Ok(Value::Object(root))
}

/// Pretty-printed JSON with a trailing newline.
pub fn render(value: &Value) -> Result<String> {
    let mut text = serde_json::to_string_pretty(value).context("Failed to serialize editor config")?;
    text.push('\n');
    Ok(text)
}

/// Merge `plan` into the editor config at `path`.
///
/// A missing or empty file starts from `{}`. Content that does not parse as a
/// JSON object is copied into `backup_dir` first, then replaced. The file is
/// rewritten only when the merged text differs from what is on disk.
pub fn merge_file(path: &Path, plan: &EditorMergePlan, backup_dir: &Path) -> Result<EditorMerge> {
    let mut backup = None;

    let existing = match read_bytes_opt(path)?.map(String::from_utf8) {
        None => Value::Object(Map::new()),
        Some(Ok(text)) if text.trim().is_empty() => Value::Object(Map::new()),
        Some(Ok(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(value) if value.is_object() => value,
            Ok(_) => {
                tracing::warn!("{} is not a JSON object; replacing it", path.display());
                backup = Some(backup_file(path, backup_dir)?);
                Value::Object(Map::new())
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {e}; replacing it", path.display());
                backup = Some(backup_file(path, backup_dir)?);
                Value::Object(Map::new())
            }
        },
        Some(Err(e)) => {
            tracing::warn!("{} is not valid UTF-8 ({e}); replacing it", path.display());
            backup = Some(backup_file(path, backup_dir)?);
            Value::Object(Map::new())
        }
    };

    let merged = merge_value(existing, plan)?;
    let change = write_if_changed(path, &render(&merged)?)
        .with_context(|| format!("Failed to write editor config: {}", path.display()))?;

    tracing::debug!(target: "provision::editor", "{}: {}", path.display(), change);

    Ok(EditorMerge {
        change,
        backup,
    })
}

/// Server names in the editor config at `path`.
///
/// `None` when the file is missing or unparsable.
pub fn read_configured_servers(path: &Path) -> Result<Option<Vec<String>>> {
    let Some(bytes) = read_bytes_opt(path)? else {
        return Ok(None);
    };
    let Ok(value) = serde_json::from_slice::<Value>(&bytes) else {
        return Ok(None);
    };
    Ok(Some(
        value
            .get(SERVERS_KEY)
            .and_then(Value::as_object)
            .map(|servers| servers.keys().cloned().collect())
            .unwrap_or_default(),
    ))
}
