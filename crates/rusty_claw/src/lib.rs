//! Rusty Claw - Rust SDK for driving the Claude Code agent CLI
//!
//! This crate provides a Rust implementation of an agent-CLI control SDK,
//! architecturally inspired by Anthropic's Python SDK
//! ([claude-agent-sdk-python](https://github.com/anthropics/claude-agent-sdk-python))
//! licensed under MIT.
//!
//! # Overview
//!
//! Rusty Claw enables building Claude-powered agents in Rust with support for:
//! - Bidirectional JSONL transport over stdio
//! - Claude Control Protocol (CCP) message handling
//! - Model Context Protocol (MCP) tool integration
//! - Hook system for lifecycle events
//! - Procedural macros for ergonomic tool definitions
//!
//! # Architecture
//!
//! The SDK is organized into several key modules:
//! - [`transport`]: low-level JSONL message transport over stdio
//! - [`control`]: Claude Control Protocol implementation
//! - [`messages`]: the tagged-union message codec
//! - [`mcp_server`]: in-process MCP tool hosting
//! - [`hooks`]: lifecycle event hooks
//! - [`permissions`]: tool permission policy
//! - [`options`]: session configuration
//! - [`error`]: error types and handling
//!
//! # License
//!
//! Licensed under MIT. See LICENSE file for details.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export macros from rusty_claw_macros
pub use rusty_claw_macros::*;

/// Low-level transport layer for JSONL communication over stdio
pub mod transport;

/// Process abstraction underneath the subprocess transport
pub mod runner;

/// Claude Control Protocol (CCP) implementation
pub mod control;

/// Model Context Protocol (MCP) in-process tool hosting
pub mod mcp_server;

/// Hook system for lifecycle events
pub mod hooks;

/// Tool permission policy
pub mod permissions;

/// Message types for Claude Code CLI communication
pub mod messages;

/// Configuration options and builder for agent sessions
pub mod options;

/// Error types and utilities
pub mod error;

/// Shared control/non-control message classification used by client and query
mod pump;

/// High-level client for interactive, streamed sessions
pub mod client;

/// One-shot query API
pub mod query;

pub use client::ClaudeClient;
pub use query::query;

// Prelude module for common imports
pub mod prelude {
    //! Common imports for rusty_claw users
    //!
    //! Use `use rusty_claw::prelude::*;` to import commonly used types.

    pub use crate::client::ClaudeClient;
    pub use crate::control::handlers::{CanUseToolHandler, HookHandler, McpMessageHandler};
    pub use crate::control::messages::{ControlRequest, ControlResponse};
    pub use crate::control::ControlProtocol;
    pub use crate::error::ClawError;
    pub use crate::hooks::{HookCallback, HookContext, HookDecision, HookInput, HookResponse, PermissionDecision};
    pub use crate::messages::{ContentBlock, Message, ResultMessage, SystemMessage};
    pub use crate::options::{
        ClaudeAgentOptions, HookEvent, HookMatcher, PermissionMode, SystemPrompt,
    };
    pub use crate::permissions::DefaultPermissionHandler;
    pub use crate::runner::{ProcessRunner, Runner, RunnerExit, RunnerHandles};
    pub use crate::transport::{CliDiscovery, SubprocessCLITransport, Transport};
}
