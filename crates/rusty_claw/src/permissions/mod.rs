//! Permission management for tool usage control.
//!
//! This module provides a flexible permission system for controlling which tools
//! an agent can use during execution. It integrates with the `CanUseToolHandler`
//! control-protocol trait — permission mode (`--permission-mode`) is a CLI-side
//! prompting policy, not something the SDK evaluates locally.
//!
//! # Architecture
//!
//! [`DefaultPermissionHandler`] evaluates tool usage requests through two layers:
//!
//! 1. **Explicit deny** - `disallowed_tools` wins regardless of allowlist.
//! 2. **Explicit allow** - a non-empty `allowed_tools` acts as a strict allowlist.
//!
//! Anything beyond static lists (custom policy, prompting, hook-driven decisions)
//! is implemented by providing your own [`CanUseToolHandler`](crate::control::handlers::CanUseToolHandler).
//!
//! # Examples
//!
//! ## Basic Permission Configuration
//!
//! ```rust
//! use rusty_claw::permissions::DefaultPermissionHandler;
//!
//! let handler = DefaultPermissionHandler::builder()
//!     .allowed_tools(vec!["Bash".to_string(), "Read".to_string()])
//!     .build();
//! ```
//!
//! ## With Deny List
//!
//! ```rust
//! use rusty_claw::permissions::DefaultPermissionHandler;
//!
//! let handler = DefaultPermissionHandler::builder()
//!     .disallowed_tools(vec!["Bash".to_string(), "Write".to_string()])
//!     .build();
//! ```

mod handler;

pub use handler::DefaultPermissionHandler;
