//! MCP (Model Context Protocol) server definitions and the writers that put
//! them into each tool's configuration.
//!
//! The set of managed servers is fixed: [`CatalogEntry`] lists them and
//! [`ServerPlan::resolve`] decides, from the environment, which ones this run
//! provisions. A server gated by an API-key variable is provisioned only when
//! that variable is set and non-blank; otherwise it is skipped everywhere, with
//! no placeholder written.
//!
//! The plan is then handed to three writers:
//! - [`toml_config`]: appends `[mcp_servers.<name>]` sections to the CLI's TOML config
//! - [`editor_config`]: merges `inputs` / `servers` into editor `mcp.json` files
//! - [`registration`]: registers stdio servers through `<cli> mcp add`

pub mod editor_config;
pub mod registration;
pub mod toml_config;

use crate::config::EnvVars;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Variable holding the Context7 API key.
pub const CONTEXT7_KEY_VAR: &str = "CONTEXT7_API_KEY";

/// Variable holding the Tavily API key.
pub const TAVILY_KEY_VAR: &str = "TAVILY_API_KEY";

/// Identifier of the managed editor prompt input.
pub const GITHUB_PAT_INPUT_ID: &str = "github_mcp_pat";

/// A server known to this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEntry {
    /// Context7 documentation lookup.
    Context7,
    /// Tavily web search.
    Tavily,
    /// GitHub's hosted MCP endpoint (editor only, no key needed).
    Github,
}

impl CatalogEntry {
    /// Every managed server, in provisioning order.
    pub const ALL: [Self; 3] = [Self::Context7, Self::Tavily, Self::Github];

    /// Server name used as the TOML section key, JSON key and CLI name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Context7 => "context7",
            Self::Tavily => "tavily",
            Self::Github => "github",
        }
    }

    /// Variable gating this server, if any.
    #[must_use]
    pub const fn key_var(self) -> Option<&'static str> {
        match self {
            Self::Context7 => Some(CONTEXT7_KEY_VAR),
            Self::Tavily => Some(TAVILY_KEY_VAR),
            Self::Github => None,
        }
    }

    /// Local stdio launch; `None` for editor-only servers.
    fn launch(self, key: Option<&str>) -> Option<StdioLaunch> {
        match (self, key) {
            (Self::Context7, Some(key)) => Some(StdioLaunch {
                command: "npx".to_string(),
                args: vec![
                    "-y".to_string(),
                    "@upstash/context7-mcp".to_string(),
                    "--api-key".to_string(),
                    key.to_string(),
                ],
                env: BTreeMap::new(),
            }),
            (Self::Tavily, Some(key)) => Some(StdioLaunch {
                command: "npx".to_string(),
                args: vec!["-y".to_string(), "tavily-mcp@latest".to_string()],
                env: BTreeMap::from([(TAVILY_KEY_VAR.to_string(), key.to_string())]),
            }),
            _ => None,
        }
    }

    /// Remote endpoint written to editor configs.
    fn http(self, key: Option<&str>) -> HttpServer {
        let url = match self {
            Self::Context7 => "https://mcp.context7.com/mcp".to_string(),
            Self::Tavily => format!(
                "https://mcp.tavily.com/mcp/?tavilyApiKey={}",
                urlencoding::encode(key.unwrap_or_default())
            ),
            Self::Github => "https://api.githubcopilot.com/mcp/".to_string(),
        };
        HttpServer {
            transport: "http".to_string(),
            url,
        }
    }
}

/// How a CLI starts a server as a local process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdioLaunch {
    /// Executable
    pub command: String,
    /// Arguments in order
    pub args: Vec<String>,
    /// Extra environment for the server process
    pub env: BTreeMap<String, String>,
}

/// Editor entry for a remote server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServer {
    /// Transport, always `"http"` for managed servers
    #[serde(rename = "type")]
    pub transport: String,
    /// Endpoint URL
    pub url: String,
}

/// Editor prompt-input descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptInput {
    /// Input kind, `"promptString"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Identifier referenced as `${input:<id>}`
    pub id: String,
    /// Prompt text
    pub description: String,
    /// Whether the editor masks and stores it as a secret
    pub password: bool,
}

impl PromptInput {
    /// The managed GitHub personal access token input.
    #[must_use]
    pub fn github_pat() -> Self {
        Self {
            kind: "promptString".to_string(),
            id: GITHUB_PAT_INPUT_ID.to_string(),
            description: "GitHub Personal Access Token".to_string(),
            password: true,
        }
    }
}

/// A server this run provisions.
#[derive(Debug, Clone)]
pub struct ManagedServer {
    /// Catalog entry it came from
    pub entry: CatalogEntry,
    /// Local launch, for the TOML config and CLI registration
    pub stdio: Option<StdioLaunch>,
    /// Remote endpoint, for editor configs
    pub http: HttpServer,
    /// API key value, masked in logs
    pub secret: Option<String>,
}

impl ManagedServer {
    /// Server name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.entry.name()
    }
}

/// A gated server left out because its key variable is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedServer {
    /// Catalog entry
    pub entry: CatalogEntry,
    /// Missing variable
    pub key_var: &'static str,
}

/// Servers to provision in this run, decided from the environment.
#[derive(Debug, Clone)]
pub struct ServerPlan {
    /// Servers whose prerequisites are met
    pub enabled: Vec<ManagedServer>,
    /// Servers soft-skipped for a missing key
    pub skipped: Vec<SkippedServer>,
}

impl ServerPlan {
    /// Decide which catalog servers are provisioned under `env`.
    #[must_use]
    pub fn resolve(env: &EnvVars) -> Self {
        let mut enabled = Vec::new();
        let mut skipped = Vec::new();

        for entry in CatalogEntry::ALL {
            let key = match entry.key_var() {
                Some(var) => match env.non_empty(var) {
                    Some(key) => Some(key),
                    None => {
                        skipped.push(SkippedServer {
                            entry,
                            key_var: var,
                        });
                        continue;
                    }
                },
                None => None,
            };

            enabled.push(ManagedServer {
                entry,
                stdio: entry.launch(key),
                http: entry.http(key),
                secret: key.map(str::to_string),
            });
        }

        Self {
            enabled,
            skipped,
        }
    }

    /// Enabled servers that run as local processes.
    pub fn stdio_servers(&self) -> impl Iterator<Item = (&ManagedServer, &StdioLaunch)> {
        self.enabled.iter().filter_map(|server| server.stdio.as_ref().map(|launch| (server, launch)))
    }

    /// What this plan merges into editor `mcp.json` files.
    #[must_use]
    pub fn editor_plan(&self) -> editor_config::EditorMergePlan {
        editor_config::EditorMergePlan {
            inputs: vec![PromptInput::github_pat()],
            servers: self
                .enabled
                .iter()
                .map(|server| (server.name().to_string(), server.http.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_without_keys_only_has_github() {
        let plan = ServerPlan::resolve(&EnvVars::default());

        let names: Vec<_> = plan.enabled.iter().map(ManagedServer::name).collect();
        assert_eq!(names, vec!["github"]);
        assert_eq!(plan.stdio_servers().count(), 0);
        assert_eq!(
            plan.skipped.iter().map(|s| s.key_var).collect::<Vec<_>>(),
            vec![CONTEXT7_KEY_VAR, TAVILY_KEY_VAR]
        );
    }

    #[test]
    fn test_context7_key_lands_in_args() {
        let env = EnvVars::default().with(CONTEXT7_KEY_VAR, "abc");
        let plan = ServerPlan::resolve(&env);

        let (server, launch) = plan.stdio_servers().next().unwrap();
        assert_eq!(server.name(), "context7");
        assert_eq!(launch.command, "npx");
        assert!(launch.args.contains(&"abc".to_string()));
        assert!(launch.env.is_empty());
        assert_eq!(server.secret.as_deref(), Some("abc"));
    }

    #[test]
    fn test_tavily_key_lands_in_env_and_url() {
        let env = EnvVars::default().with(TAVILY_KEY_VAR, "tvly-1");
        let plan = ServerPlan::resolve(&env);

        let tavily = plan.enabled.iter().find(|s| s.entry == CatalogEntry::Tavily).unwrap();
        let launch = tavily.stdio.as_ref().unwrap();
        assert_eq!(launch.env.get(TAVILY_KEY_VAR).map(String::as_str), Some("tvly-1"));
        assert!(tavily.http.url.ends_with("tavilyApiKey=tvly-1"));
    }

    #[test]
    fn test_tavily_url_encodes_key() {
        let env = EnvVars::default().with(TAVILY_KEY_VAR, "a&b#c d/=");
        let plan = ServerPlan::resolve(&env);

        let tavily = plan.enabled.iter().find(|s| s.entry == CatalogEntry::Tavily).unwrap();
        assert_eq!(
            tavily.http.url,
            "https://mcp.tavily.com/mcp/?tavilyApiKey=a%26b%23c%20d%2F%3D"
        );
        // The stdio env keeps the raw key.
        let launch = tavily.stdio.as_ref().unwrap();
        assert_eq!(launch.env.get(TAVILY_KEY_VAR).map(String::as_str), Some("a&b#c d/="));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let env = EnvVars::default().with(CONTEXT7_KEY_VAR, "  ");
        let plan = ServerPlan::resolve(&env);
        assert!(plan.enabled.iter().all(|s| s.entry != CatalogEntry::Context7));
    }

    #[test]
    fn test_editor_plan_contains_input_and_enabled_servers() {
        let env = EnvVars::default().with(CONTEXT7_KEY_VAR, "abc");
        let editor = ServerPlan::resolve(&env).editor_plan();

        assert_eq!(editor.inputs, vec![PromptInput::github_pat()]);
        let names: Vec<_> = editor.servers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["context7", "github"]);
    }
}
