//! Configuration options and builder pattern for Claude agent sessions
//!
//! This module provides `ClaudeAgentOptions` for configuring Claude agent behavior,
//! including prompt settings, tools, permissions, session management, and environment.
//!
//! # Example
//!
//! ```
//! use rusty_claw::options::{ClaudeAgentOptions, PermissionMode, SystemPrompt};
//!
//! let options = ClaudeAgentOptions::builder()
//!     .allowed_tools(vec!["Read".to_string(), "Bash".to_string()])
//!     .permission_mode(PermissionMode::AcceptEdits)
//!     .model("claude-sonnet-4")
//!     .build();
//! ```
//!
//! # Builder Pattern
//!
//! All fields have sensible defaults. Use the builder pattern for convenient configuration:
//!
//! ```
//! use rusty_claw::options::{ClaudeAgentOptions, SystemPrompt};
//!
//! let options = ClaudeAgentOptions::builder()
//!     .system_prompt(SystemPrompt::Custom("You are a helpful assistant".to_string()))
//!     .build();
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// System prompt configuration
#[derive(Debug, Clone)]
pub enum SystemPrompt {
    /// Custom system prompt text
    Custom(String),
    /// Named preset system prompt
    Preset {
        /// Preset name
        preset: String
    },
}

/// Permission mode for tool execution
///
/// These four variants are the complete set of `--permission-mode` choices the
/// CLI accepts. Finer-grained allow/deny policy lives in
/// [`crate::permissions::DefaultPermissionHandler`], which is registered as a
/// [`crate::control::handlers::CanUseToolHandler`] independent of this enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// Default permission mode
    Default,
    /// Accept all edit operations
    AcceptEdits,
    /// Bypass all permission checks
    BypassPermissions,
    /// Plan mode requiring approval
    Plan,
}

impl PermissionMode {
    /// Convert to CLI argument format (camelCase, matching CLI's allowed choices)
    pub fn to_cli_arg(&self) -> &str {
        match self {
            PermissionMode::Default => "default",
            PermissionMode::AcceptEdits => "acceptEdits",
            PermissionMode::BypassPermissions => "bypassPermissions",
            PermissionMode::Plan => "plan",
        }
    }
}

/// External MCP server configuration
///
/// Describes a server the CLI should launch itself (as opposed to an
/// SDK-hosted server, see [`SdkMcpServer`]). Serialized per-server into the
/// `--mcp-config` argument as `{"command": ..., "args": [...], "env": {...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// Executable to launch
    pub command: String,
    /// Arguments passed to the executable
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment variables for the server process
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// SDK-managed MCP server configuration
///
/// This struct represents the minimal configuration needed to register
/// an SDK-hosted MCP server with the Claude CLI during initialization.
/// The actual server implementation is in [`crate::mcp_server::SdkMcpServerImpl`].
///
/// # Example
///
/// ```
/// use rusty_claw::options::SdkMcpServer;
///
/// let config = SdkMcpServer {
///     name: "my_server".to_string(),
///     version: "1.0.0".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdkMcpServer {
    /// Server name (must be unique)
    pub name: String,
    /// Server version
    pub version: String,
}

/// Hook event type - triggers for lifecycle callbacks
///
/// # Examples
///
/// ```
/// use rusty_claw::prelude::*;
///
/// let event = HookEvent::PreToolUse;
/// assert_eq!(format!("{:?}", event), "PreToolUse");
/// ```
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum HookEvent {
    /// Before a tool is invoked
    PreToolUse,
    /// After a tool successfully completes
    PostToolUse,
    /// When user submits a prompt
    UserPromptSubmit,
    /// When session stops
    Stop,
    /// When a subagent stops
    SubagentStop,
    /// Before conversation compaction
    PreCompact,
    /// When a session starts (including resume/fork)
    SessionStart,
    /// When a session ends
    SessionEnd,
    /// System notification event
    Notification,
    /// Permission request from Claude
    PermissionRequest,
}

impl HookEvent {
    /// Whether this hook kind reports a `continue`/`decision` outcome that
    /// can halt the session, as opposed to one that only observes.
    pub fn is_decision_hook(&self) -> bool {
        matches!(self, HookEvent::Stop | HookEvent::SubagentStop)
    }

    /// Whether this hook kind can rewrite tool input via `updatedInput`.
    pub fn supports_input_rewrite(&self) -> bool {
        matches!(self, HookEvent::PreToolUse | HookEvent::PermissionRequest)
    }
}

/// Hook matcher for pattern-based hook triggering
///
/// The pattern (e.g. `"Bash"`, `"mcp__*"`, or `None` for all tools) is sent to
/// the CLI as-is; glob matching against tool names happens CLI-side, not here.
///
/// # Examples
///
/// ```
/// use rusty_claw::prelude::*;
///
/// let matcher = HookMatcher::all();
/// assert!(matcher.tool_name.is_none());
///
/// let matcher = HookMatcher::tool("Bash");
/// assert_eq!(matcher.tool_name.as_deref(), Some("Bash"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookMatcher {
    /// Tool name pattern to match (e.g., "Bash", "mcp__*", or None for all)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl HookMatcher {
    /// Create a matcher that matches all tools
    pub fn all() -> Self {
        Self { tool_name: None }
    }

    /// Create a matcher for a specific tool name pattern
    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            tool_name: Some(name.into()),
        }
    }
}

/// Agent definition for subagents (placeholder for future agent tasks)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Agent description
    pub description: String,
    /// Agent prompt
    pub prompt: String,
    /// Allowed tools
    pub tools: Vec<String>,
    /// Model override
    pub model: Option<String>,
}

/// Sandbox settings (placeholder for future sandbox tasks)
#[derive(Debug, Clone)]
pub struct SandboxSettings;

/// Configuration options for Claude agent sessions
///
/// This struct provides comprehensive configuration for Claude agent behavior,
/// including prompt settings, tool permissions, session management, and environment.
///
/// # Example
///
/// ```
/// use rusty_claw::options::ClaudeAgentOptions;
///
/// let options = ClaudeAgentOptions::builder()
///     .model("claude-sonnet-4")
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClaudeAgentOptions {
    // Prompt & behavior
    /// System prompt configuration
    pub system_prompt: Option<SystemPrompt>,
    /// Additional text to append to system prompt
    pub append_system_prompt: Option<String>,
    /// Model identifier (e.g., "claude-sonnet-4")
    pub model: Option<String>,

    // Tools & permissions
    /// Tools to explicitly allow
    pub allowed_tools: Vec<String>,
    /// Tools to explicitly disallow
    pub disallowed_tools: Vec<String>,
    /// Permission mode for tool execution
    pub permission_mode: Option<PermissionMode>,
    /// Skip all permission prompts entirely (`--dangerously-skip-permissions`)
    pub dangerously_skip_permissions: bool,
    /// Tools that require permission prompts
    pub permission_prompt_tool_allowlist: Vec<String>,

    // MCP
    /// External MCP server configurations, launched by the CLI
    pub mcp_servers: HashMap<String, McpServerConfig>,
    /// SDK-managed MCP servers, hosted in-process
    pub sdk_mcp_servers: Vec<SdkMcpServer>,
    /// Reject any MCP server config not explicitly listed here
    pub strict_mcp_config: bool,

    // Hooks
    /// Hook event handlers
    pub hooks: HashMap<HookEvent, Vec<HookMatcher>>,

    // Subagents
    /// Agent definitions
    pub agents: HashMap<String, AgentDefinition>,

    // Session
    /// Session ID to resume
    pub resume: Option<String>,
    /// Fork existing session
    pub fork_session: bool,
    /// Session name
    pub session_name: Option<String>,
    /// Enable file-based checkpointing
    pub enable_file_checkpointing: bool,
    /// Disable the CLI's own session persistence
    pub no_session_persistence: bool,

    // Environment
    /// Working directory
    pub cwd: Option<PathBuf>,
    /// Claude CLI executable path
    pub cli_path: Option<PathBuf>,
    /// Environment variables
    pub env: HashMap<String, String>,

    // Settings isolation
    /// Setting sources for configuration (`--setting-sources`)
    pub setting_sources: Option<Vec<String>>,

    // Output
    /// Include partial messages in output
    pub include_partial_messages: bool,

    // Advanced
    /// Beta features to enable
    pub betas: Vec<String>,
    /// Sandbox settings
    pub sandbox_settings: Option<SandboxSettings>,
}

impl ClaudeAgentOptions {
    /// Create a new options builder
    ///
    /// # Example
    ///
    /// ```
    /// use rusty_claw::options::ClaudeAgentOptions;
    ///
    /// let options = ClaudeAgentOptions::builder()
    ///     .model("claude-sonnet-4")
    ///     .build();
    /// ```
    pub fn builder() -> ClaudeAgentOptionsBuilder {
        ClaudeAgentOptionsBuilder::default()
    }

    /// Convert options to Claude CLI arguments
    ///
    /// Produces the argv the CLI subprocess is spawned with. Arguments are
    /// bit-exact two-element pairs (`--flag`, `value`) rather than
    /// `=`-joined, matching how the CLI's own argument parser expects them.
    /// The prompt itself is **not** included here: the prompt is written to
    /// the CLI's stdin as a streamed `user` message after connect, not baked
    /// into argv via `-p`.
    ///
    /// # Example
    ///
    /// ```
    /// use rusty_claw::options::{ClaudeAgentOptions, PermissionMode};
    ///
    /// let options = ClaudeAgentOptions::builder()
    ///     .permission_mode(PermissionMode::AcceptEdits)
    ///     .build();
    ///
    /// let args = options.to_cli_args();
    /// assert!(args.windows(2).any(|w| w == ["--permission-mode", "acceptEdits"]));
    /// ```
    pub fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--input-format".to_string(),
            "stream-json".to_string(),
            "--verbose".to_string(),
        ];

        if let Some(model) = &self.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }

        if let Some(mode) = &self.permission_mode {
            args.push("--permission-mode".to_string());
            args.push(mode.to_cli_arg().to_string());
        }

        if self.dangerously_skip_permissions {
            args.push("--dangerously-skip-permissions".to_string());
        }

        if !self.permission_prompt_tool_allowlist.is_empty() {
            args.push("--permission-prompt-tool".to_string());
            args.push("stdio".to_string());
        }

        if let Some(sys_prompt) = &self.system_prompt {
            match sys_prompt {
                SystemPrompt::Custom(text) => {
                    args.push("--system-prompt".to_string());
                    args.push(text.clone());
                }
                SystemPrompt::Preset { preset } => {
                    args.push("--system-prompt-preset".to_string());
                    args.push(preset.clone());
                }
            }
        }

        if let Some(append) = &self.append_system_prompt {
            args.push("--append-system-prompt".to_string());
            args.push(append.clone());
        }

        if !self.allowed_tools.is_empty() {
            args.push("--allowed-tools".to_string());
            args.push(self.allowed_tools.join(","));
        }

        if !self.disallowed_tools.is_empty() {
            args.push("--disallowed-tools".to_string());
            args.push(self.disallowed_tools.join(","));
        }

        for (name, server) in &self.mcp_servers {
            let config = serde_json::json!({ name.clone(): server });
            if let Ok(text) = serde_json::to_string(&config) {
                args.push("--mcp-config".to_string());
                args.push(text);
            }
        }

        if self.strict_mcp_config {
            args.push("--strict-mcp-config".to_string());
        }

        if let Some(resume) = &self.resume {
            args.push("--resume".to_string());
            args.push(resume.clone());
        }

        if self.fork_session {
            args.push("--fork-session".to_string());
        }

        if let Some(name) = &self.session_name {
            args.push("--session-name".to_string());
            args.push(name.clone());
        }

        if self.enable_file_checkpointing {
            args.push("--enable-file-checkpointing".to_string());
        }

        if self.no_session_persistence {
            args.push("--no-session-persistence".to_string());
        }

        if let Some(sources) = &self.setting_sources {
            args.push("--setting-sources".to_string());
            args.push(sources.join(","));
        }

        if self.include_partial_messages {
            args.push("--include-partial-messages".to_string());
        }

        for beta in &self.betas {
            args.push("--beta".to_string());
            args.push(beta.clone());
        }

        args
    }
}

/// Builder for [`ClaudeAgentOptions`]
///
/// Provides a fluent interface for constructing options with chainable setters.
///
/// # Example
///
/// ```
/// use rusty_claw::options::{ClaudeAgentOptions, PermissionMode};
///
/// let options = ClaudeAgentOptions::builder()
///     .model("claude-sonnet-4")
///     .permission_mode(PermissionMode::AcceptEdits)
///     .allowed_tools(vec!["Read".to_string(), "Bash".to_string()])
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ClaudeAgentOptionsBuilder {
    inner: ClaudeAgentOptions,
}

impl ClaudeAgentOptionsBuilder {
    /// Set system prompt
    pub fn system_prompt(mut self, prompt: SystemPrompt) -> Self {
        self.inner.system_prompt = Some(prompt);
        self
    }

    /// Set text to append to system prompt
    pub fn append_system_prompt(mut self, text: impl Into<String>) -> Self {
        self.inner.append_system_prompt = Some(text.into());
        self
    }

    /// Set model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.inner.model = Some(model.into());
        self
    }

    /// Set allowed tools
    pub fn allowed_tools(mut self, tools: Vec<String>) -> Self {
        self.inner.allowed_tools = tools;
        self
    }

    /// Set disallowed tools
    pub fn disallowed_tools(mut self, tools: Vec<String>) -> Self {
        self.inner.disallowed_tools = tools;
        self
    }

    /// Set permission mode
    pub fn permission_mode(mut self, mode: PermissionMode) -> Self {
        self.inner.permission_mode = Some(mode);
        self
    }

    /// Skip all permission prompts entirely
    pub fn dangerously_skip_permissions(mut self, skip: bool) -> Self {
        self.inner.dangerously_skip_permissions = skip;
        self
    }

    /// Reject MCP server configs not explicitly listed
    pub fn strict_mcp_config(mut self, strict: bool) -> Self {
        self.inner.strict_mcp_config = strict;
        self
    }

    /// Disable the CLI's own session persistence
    pub fn no_session_persistence(mut self, disable: bool) -> Self {
        self.inner.no_session_persistence = disable;
        self
    }

    /// Set permission prompt tool allowlist
    pub fn permission_prompt_tool_allowlist(mut self, tools: Vec<String>) -> Self {
        self.inner.permission_prompt_tool_allowlist = tools;
        self
    }

    /// Set MCP servers
    pub fn mcp_servers(mut self, servers: HashMap<String, McpServerConfig>) -> Self {
        self.inner.mcp_servers = servers;
        self
    }

    /// Set SDK MCP servers
    pub fn sdk_mcp_servers(mut self, servers: Vec<SdkMcpServer>) -> Self {
        self.inner.sdk_mcp_servers = servers;
        self
    }

    /// Set hooks
    pub fn hooks(mut self, hooks: HashMap<HookEvent, Vec<HookMatcher>>) -> Self {
        self.inner.hooks = hooks;
        self
    }

    /// Set agents
    pub fn agents(mut self, agents: HashMap<String, AgentDefinition>) -> Self {
        self.inner.agents = agents;
        self
    }

    /// Set session ID to resume
    pub fn resume(mut self, session_id: impl Into<String>) -> Self {
        self.inner.resume = Some(session_id.into());
        self
    }

    /// Enable session forking
    pub fn fork_session(mut self, fork: bool) -> Self {
        self.inner.fork_session = fork;
        self
    }

    /// Set session name
    pub fn session_name(mut self, name: impl Into<String>) -> Self {
        self.inner.session_name = Some(name.into());
        self
    }

    /// Enable file-based checkpointing
    pub fn enable_file_checkpointing(mut self, enable: bool) -> Self {
        self.inner.enable_file_checkpointing = enable;
        self
    }

    /// Set working directory
    pub fn cwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner.cwd = Some(path.into());
        self
    }

    /// Set Claude CLI executable path
    pub fn cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner.cli_path = Some(path.into());
        self
    }

    /// Set environment variables
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.inner.env = env;
        self
    }

    /// Set setting sources
    pub fn setting_sources(mut self, sources: Vec<String>) -> Self {
        self.inner.setting_sources = Some(sources);
        self
    }

    /// Enable partial messages in output
    pub fn include_partial_messages(mut self, include: bool) -> Self {
        self.inner.include_partial_messages = include;
        self
    }

    /// Set beta features
    pub fn betas(mut self, betas: Vec<String>) -> Self {
        self.inner.betas = betas;
        self
    }

    /// Set sandbox settings
    pub fn sandbox_settings(mut self, settings: SandboxSettings) -> Self {
        self.inner.sandbox_settings = Some(settings);
        self
    }

    /// Build the options
    pub fn build(self) -> ClaudeAgentOptions {
        self.inner
    }
}
