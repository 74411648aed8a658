//! Control protocol for bidirectional communication with Claude CLI
//!
//! This module implements the control protocol that enables:
//! - **Request/response routing** - Send requests to CLI and await responses
//! - **Handler dispatch** - Route incoming requests to registered handlers
//! - **Initialization handshake** - Configure the session with hooks, agents, and MCP servers
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ControlProtocol                        │
//! │                                                             │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │               Request/Response Router                │  │
//! │  │  - request() sends and awaits response              │  │
//! │  │  - handle_incoming() routes to handlers             │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! │                          ↕                                  │
//! │  ┌──────────────────────┐      ┌─────────────────────┐   │
//! │  │  Pending Requests     │      │   Handlers          │   │
//! │  │  HashMap<String,      │      │   CanUseTool        │   │
//! │  │    oneshot::Sender>   │      │   HookCallbacks     │   │
//! │  │                       │      │   McpMessage        │   │
//! │  └──────────────────────┘      └─────────────────────┘   │
//! │                          ↕                                  │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │              Transport (Arc<dyn Transport>)         │  │
//! │  │  - write() sends messages to CLI stdin             │  │
//! │  │  - messages() receives from CLI stdout             │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rusty_claw::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Create and connect transport
//! let mut transport = SubprocessCLITransport::new(None, vec![]);
//! transport.connect().await?;
//! let transport = Arc::new(transport);
//!
//! // Create control protocol
//! let control = ControlProtocol::new(transport);
//!
//! // Initialize the session
//! let options = ClaudeAgentOptions::default();
//! control.initialize(&options).await?;
//!
//! // Send a control request
//! let response = control.request(ControlRequest::Interrupt).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::control::handlers::ControlHandlers;
use crate::control::messages::{ControlRequest, ControlResponse, IncomingControlRequest};
use crate::control::pending::PendingRequests;
use crate::error::ClawError;
use crate::options::ClaudeAgentOptions;
use crate::transport::Transport;

pub mod handlers;
pub mod messages;
pub mod pending;

/// Control protocol for bidirectional communication with Claude CLI
///
/// The `ControlProtocol` manages:
/// - **Outgoing requests** - SDK → CLI control messages with response tracking
/// - **Incoming requests** - CLI → SDK control messages with handler dispatch
/// - **Initialization** - Session setup with hooks, agents, and MCP servers
///
/// # Thread Safety
///
/// `ControlProtocol` is `Send + Sync` and can be safely shared across tasks.
/// All internal state is protected by appropriate synchronization primitives.
///
/// # Example
///
/// ```no_run
/// use rusty_claw::prelude::*;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut transport = SubprocessCLITransport::new(None, vec![]);
/// transport.connect().await?;
/// let transport = Arc::new(transport);
/// let control = ControlProtocol::new(transport);
///
/// // Send a control request
/// let response = control.request(ControlRequest::Interrupt).await?;
/// # Ok(())
/// # }
/// ```
pub struct ControlProtocol {
    /// Transport for sending/receiving messages
    transport: Arc<dyn Transport>,

    /// Pending outgoing requests awaiting responses
    pending: PendingRequests,

    /// Registered handlers for incoming requests
    handlers: Arc<Mutex<ControlHandlers>>,

    /// Monotonic counter for outgoing request IDs (`req_1`, `req_2`, ...)
    next_request_id: AtomicU64,
}

impl ControlProtocol {
    /// Create a new control protocol instance
    ///
    /// # Arguments
    ///
    /// * `transport` - Transport layer for communication with CLI
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rusty_claw::prelude::*;
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut transport = SubprocessCLITransport::new(None, vec![]);
    /// transport.connect().await?;
    /// let transport = Arc::new(transport);
    /// let control = ControlProtocol::new(transport);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            pending: PendingRequests::new(),
            handlers: Arc::new(Mutex::new(ControlHandlers::new())),
            next_request_id: AtomicU64::new(1),
        }
    }

    /// Get a mutable reference to the handler registry
    ///
    /// Use this to register handlers for can_use_tool, hooks, and MCP messages.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rusty_claw::prelude::*;
    /// use async_trait::async_trait;
    /// use std::sync::Arc;
    ///
    /// struct MyHandler;
    ///
    /// #[async_trait]
    /// impl CanUseToolHandler for MyHandler {
    ///     async fn can_use_tool(
    ///         &self,
    ///         _tool_name: &str,
    ///         _tool_input: &serde_json::Value,
    ///     ) -> Result<bool, ClawError> {
    ///         Ok(true)
    ///     }
    /// }
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut transport = SubprocessCLITransport::new(None, vec![]);
    /// transport.connect().await?;
    /// let transport = Arc::new(transport);
    /// let control = ControlProtocol::new(transport);
    ///
    /// let mut handlers = control.handlers().await;
    /// handlers.register_can_use_tool(Arc::new(MyHandler));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn handlers(&self) -> tokio::sync::MutexGuard<'_, ControlHandlers> {
        self.handlers.lock().await
    }

    /// Initialize the agent session
    ///
    /// Sends an `initialize` control request to the CLI with configuration
    /// from `ClaudeAgentOptions`. This must be called before the CLI can
    /// process user messages.
    ///
    /// # Arguments
    ///
    /// * `options` - Session configuration (hooks, agents, MCP servers, etc.)
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Initialization successful
    /// * `Err(ClawError::ControlError)` - CLI returned an error
    /// * `Err(ClawError::ControlTimeout)` - CLI did not respond in time
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rusty_claw::prelude::*;
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut transport = SubprocessCLITransport::new(None, vec![]);
    /// transport.connect().await?;
    /// let transport = Arc::new(transport);
    /// let control = ControlProtocol::new(transport);
    ///
    /// let options = ClaudeAgentOptions::builder()
    ///     .model("claude-sonnet-4")
    ///     .build();
    ///
    /// control.initialize(&options).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn initialize(&self, options: &ClaudeAgentOptions) -> Result<(), ClawError> {
        let request = ControlRequest::Initialize {
            hooks: options.hooks.clone(),
            agents: options.agents.clone(),
            sdk_mcp_servers: options
                .sdk_mcp_servers
                .iter()
                .map(|server| server.name.clone())
                .collect(),
        };

        match self.request(request).await? {
            ControlResponse::Success { .. } => Ok(()),
            ControlResponse::Error { error, .. } => {
                Err(ClawError::ControlError(format!(
                    "Initialization failed: {}",
                    error
                )))
            }
        }
    }

    /// Send a control request and wait for the response
    ///
    /// Generates a unique request ID, sends the request to the CLI, and waits
    /// up to 30 seconds for a response. The response is delivered via the
    /// [`handle_response`](Self::handle_response) method.
    ///
    /// # Arguments
    ///
    /// * `request` - Control request to send
    ///
    /// # Returns
    ///
    /// * `Ok(ControlResponse)` - CLI responded successfully
    /// * `Err(ClawError::ControlTimeout)` - CLI did not respond within 30 seconds
    /// * `Err(ClawError::ControlError)` - Response channel was closed
    /// * `Err(ClawError::Connection)` - Failed to write request to CLI
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rusty_claw::prelude::*;
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut transport = SubprocessCLITransport::new(None, vec![]);
    /// transport.connect().await?;
    /// let transport = Arc::new(transport);
    /// let control = ControlProtocol::new(transport);
    ///
    /// let response = control.request(ControlRequest::McpServerStatus).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request(&self, request: ControlRequest) -> Result<ControlResponse, ClawError> {
        let id = format!("req_{}", self.next_request_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.pending.insert(id.clone(), tx).await;

        // Construct the control_request message
        let msg = serde_json::json!({
            "type": "control_request",
            "request_id": id,
            "request": request,
        });

        // Send to CLI (NDJSON requires trailing newline)
        let mut bytes = serde_json::to_vec(&msg)?;
        bytes.push(b'\n');
        self.transport
            .write(&bytes)
            .await
            .map_err(|e| ClawError::Connection(format!("Failed to send control request: {}", e)))?;

        // Wait for response with timeout
        match tokio::time::timeout(Duration::from_secs(30), rx).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(ClawError::ControlError(
                "Response channel closed".to_string(),
            )),
            Err(_) => {
                // Timeout - clean up pending entry
                self.pending.cancel(&id).await;
                Err(ClawError::ControlTimeout {
                    subtype: "control_request".to_string(),
                })
            }
        }
    }

    /// Handle a control response from the CLI
    ///
    /// Routes the response to the waiting `request()` caller via the oneshot channel.
    /// Called by the message receiver loop when a `control_response` message arrives.
    ///
    /// # Arguments
    ///
    /// * `request_id` - UUID of the original request
    /// * `response` - Response from the CLI
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rusty_claw::prelude::*;
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut transport = SubprocessCLITransport::new(None, vec![]);
    /// transport.connect().await?;
    /// let transport = Arc::new(transport);
    /// let control = ControlProtocol::new(transport);
    ///
    /// // Called by message receiver when response arrives
    /// let response = ControlResponse::Success { data: json!({}) };
    /// control.handle_response("req_123", response).await;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn handle_response(&self, request_id: &str, response: ControlResponse) {
        self.pending.complete(request_id, response).await;
    }

    /// Handle an incoming control request from the CLI
    ///
    /// Routes the request to the appropriate registered handler:
    /// - **can_use_tool** → [`CanUseToolHandler`](handlers::CanUseToolHandler)
    /// - **hook_callback** → [`HookHandler`](handlers::HookHandler)
    /// - **mcp_message** → [`McpMessageHandler`](handlers::McpMessageHandler)
    ///
    /// If no handler is registered:
    /// - **can_use_tool**: Allow all tools (default: permissive)
    /// - **hook_callback**: Return error
    /// - **mcp_message**: Return error
    ///
    /// The response is sent back to the CLI as a `control_response` message.
    ///
    /// # Arguments
    ///
    /// * `request_id` - UUID of the incoming request
    /// * `request` - Incoming control request from CLI
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rusty_claw::prelude::*;
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut transport = SubprocessCLITransport::new(None, vec![]);
    /// transport.connect().await?;
    /// let transport = Arc::new(transport);
    /// let control = ControlProtocol::new(transport);
    ///
    /// // Called by message receiver when incoming request arrives
    /// let request = IncomingControlRequest::CanUseTool {
    ///     tool_name: "Bash".to_string(),
    ///     tool_input: json!({ "command": "ls" }),
    ///     tool_use_id: None,
    /// };
    /// control.handle_incoming("req_123", request).await;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn handle_incoming(&self, request_id: &str, request: IncomingControlRequest) {
        use serde_json::json;
        use tracing::error;

        let response = match request {
            IncomingControlRequest::CanUseTool {
                tool_name,
                tool_input,
                tool_use_id,
            } => {
                // Clone handler Arc and drop lock before awaiting to avoid deadlock
                let handler = {
                    let handlers = self.handlers.lock().await;
                    handlers.can_use_tool.clone()
                };
                let outcome = if let Some(handler) = handler {
                    match handler.can_use_tool(&tool_name, &tool_input).await {
                        Ok(decision) => Ok(serde_json::to_value(&decision).unwrap_or(json!({}))),
                        Err(e) => Err(e.to_string()),
                    }
                } else {
                    // Default: allow all tools, input unchanged
                    Ok(json!({ "behavior": "allow", "updatedInput": tool_input }))
                };
                match outcome {
                    Ok(mut data) => {
                        if let Some(obj) = data.as_object_mut() {
                            // `updatedInput` is mandatory on the wire even when the
                            // handler didn't rewrite the input.
                            if obj.get("behavior").and_then(|b| b.as_str()) == Some("allow")
                                && !obj.contains_key("updatedInput")
                            {
                                obj.insert("updatedInput".to_string(), tool_input.clone());
                            }
                            if let Some(id) = &tool_use_id {
                                obj.insert("toolUseID".to_string(), json!(id));
                            }
                        }
                        ControlResponse::Success { data }
                    }
                    Err(error) => ControlResponse::Error {
                        error,
                        extra: json!({}),
                    },
                }
            }

            IncomingControlRequest::HookCallback {
                hook_id,
                hook_event,
                hook_input,
            } => {
                // Clone handler Arc and drop lock before awaiting to avoid deadlock
                let handler = {
                    let handlers = self.handlers.lock().await;
                    handlers.hook_callbacks.get(&hook_id).cloned()
                };
                if let Some(handler) = handler {
                    match handler.call(hook_event.clone(), hook_input).await {
                        Ok(result) => ControlResponse::Success {
                            data: result.to_wire_json(hook_event),
                        },
                        Err(e) => ControlResponse::Error {
                            error: e.to_string(),
                            extra: json!({}),
                        },
                    }
                } else {
                    ControlResponse::Error {
                        error: format!("No handler registered for hook_id: {}", hook_id),
                        extra: json!({}),
                    }
                }
            }

            IncomingControlRequest::McpMessage {
                server_name,
                message,
            } => {
                // Clone handler Arc and drop lock before awaiting to avoid deadlock
                let handler = {
                    let handlers = self.handlers.lock().await;
                    handlers.mcp_message.clone()
                };
                if let Some(handler) = handler {
                    match handler.handle(&server_name, message).await {
                        Ok(result) => ControlResponse::Success {
                            data: json!({ "mcp_response": result }),
                        },
                        Err(e) => ControlResponse::Error {
                            error: e.to_string(),
                            extra: json!({}),
                        },
                    }
                } else {
                    ControlResponse::Error {
                        error: "No MCP message handler registered".to_string(),
                        extra: json!({}),
                    }
                }
            }
        };

        // Send response back to CLI
        let msg = json!({
            "type": "control_response",
            "request_id": request_id,
            "response": response,
        });

        match serde_json::to_vec(&msg) {
            Ok(mut bytes) => {
                bytes.push(b'\n'); // NDJSON requires trailing newline
                if let Err(e) = self.transport.write(&bytes).await {
                    error!("Failed to send control response: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize control response: {}", e);
            }
        }
    }
}
