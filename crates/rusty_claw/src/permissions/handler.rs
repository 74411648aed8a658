//! Default permission handler implementation.

use crate::control::handlers::{CanUseToolHandler, ToolPermissionDecision};
use crate::error::ClawError;
use async_trait::async_trait;
use serde_json::Value;

/// Default implementation of tool permission checking, driven by static
/// allow/deny lists rather than [`PermissionMode`](crate::options::PermissionMode) —
/// permission mode is a CLI-side prompting policy (`--permission-mode`), not
/// a local decision the SDK makes on its behalf.
///
/// Evaluation order:
///
/// 1. **Explicit deny** — `disallowed_tools` wins regardless of allowlist.
/// 2. **Explicit allow** — if `allowed_tools` is non-empty, only listed tools
///    are allowed; everything else is denied (strict allowlist).
/// 3. **No lists configured** — allow by default.
///
/// # Examples
///
/// ```rust
/// use rusty_claw::permissions::DefaultPermissionHandler;
///
/// let handler = DefaultPermissionHandler::builder()
///     .allowed_tools(vec!["Bash".to_string(), "Read".to_string()])
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct DefaultPermissionHandler {
    allowed_tools: Vec<String>,
    disallowed_tools: Vec<String>,
}

impl DefaultPermissionHandler {
    /// Create a new builder for configuring permission handler.
    pub fn builder() -> DefaultPermissionHandlerBuilder {
        DefaultPermissionHandlerBuilder::default()
    }

    fn is_allowed(&self, tool_name: &str) -> bool {
        self.allowed_tools.is_empty() || self.allowed_tools.iter().any(|t| t == tool_name)
    }

    fn is_denied(&self, tool_name: &str) -> bool {
        self.disallowed_tools.iter().any(|t| t == tool_name)
    }
}

#[async_trait]
impl CanUseToolHandler for DefaultPermissionHandler {
    async fn can_use_tool(
        &self,
        tool_name: &str,
        _tool_input: &Value,
    ) -> Result<ToolPermissionDecision, ClawError> {
        if self.is_denied(tool_name) {
            return Ok(ToolPermissionDecision::deny(format!(
                "{} is on the disallowed tools list",
                tool_name
            )));
        }

        if !self.is_allowed(tool_name) {
            return Ok(ToolPermissionDecision::deny(format!(
                "{} is not in the allowed tools list",
                tool_name
            )));
        }

        Ok(ToolPermissionDecision::allow())
    }
}

/// Builder for [`DefaultPermissionHandler`].
///
/// # Examples
///
/// ```rust
/// use rusty_claw::permissions::DefaultPermissionHandler;
///
/// let handler = DefaultPermissionHandler::builder()
///     .allowed_tools(vec!["Bash".to_string()])
///     .disallowed_tools(vec!["Write".to_string()])
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct DefaultPermissionHandlerBuilder {
    allowed_tools: Vec<String>,
    disallowed_tools: Vec<String>,
}

impl DefaultPermissionHandlerBuilder {
    /// Set the list of allowed tools.
    pub fn allowed_tools(mut self, tools: Vec<String>) -> Self {
        self.allowed_tools = tools;
        self
    }

    /// Set the list of disallowed tools.
    pub fn disallowed_tools(mut self, tools: Vec<String>) -> Self {
        self.disallowed_tools = tools;
        self
    }

    /// Build the permission handler.
    pub fn build(self) -> DefaultPermissionHandler {
        DefaultPermissionHandler {
            allowed_tools: self.allowed_tools,
            disallowed_tools: self.disallowed_tools,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_no_lists_allows_all() {
        let handler = DefaultPermissionHandler::builder().build();

        assert!(handler.can_use_tool("Bash", &Value::Null).await.unwrap().is_allowed());
        assert!(handler.can_use_tool("Read", &Value::Null).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn test_explicit_allow_restricts() {
        let handler = DefaultPermissionHandler::builder()
            .allowed_tools(vec!["Bash".to_string(), "Read".to_string()])
            .build();

        assert!(handler.can_use_tool("Bash", &Value::Null).await.unwrap().is_allowed());
        assert!(handler.can_use_tool("Read", &Value::Null).await.unwrap().is_allowed());
        assert!(!handler.can_use_tool("Write", &Value::Null).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn test_explicit_deny_overrides_allow() {
        let handler = DefaultPermissionHandler::builder()
            .allowed_tools(vec!["Bash".to_string()])
            .disallowed_tools(vec!["Bash".to_string()])
            .build();

        assert!(!handler.can_use_tool("Bash", &Value::Null).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn test_deny_list_without_allow_list() {
        let handler = DefaultPermissionHandler::builder()
            .disallowed_tools(vec!["Bash".to_string(), "Write".to_string()])
            .build();

        assert!(handler.can_use_tool("Read", &Value::Null).await.unwrap().is_allowed());
        assert!(!handler.can_use_tool("Bash", &Value::Null).await.unwrap().is_allowed());
        assert!(!handler.can_use_tool("Write", &Value::Null).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn test_tool_input_parameter_ignored() {
        let handler = DefaultPermissionHandler::builder().build();

        let complex_input = json!({
            "command": "rm -rf /",
            "dangerous": true
        });

        assert!(handler.can_use_tool("Bash", &complex_input).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn test_realistic_read_only_policy() {
        let handler = DefaultPermissionHandler::builder()
            .allowed_tools(vec![
                "Read".to_string(),
                "Glob".to_string(),
                "Grep".to_string(),
            ])
            .build();

        assert!(handler.can_use_tool("Read", &json!({})).await.unwrap().is_allowed());
        assert!(handler.can_use_tool("Glob", &json!({})).await.unwrap().is_allowed());
        assert!(handler.can_use_tool("Grep", &json!({})).await.unwrap().is_allowed());

        assert!(!handler.can_use_tool("Write", &json!({})).await.unwrap().is_allowed());
        assert!(!handler.can_use_tool("Bash", &json!({})).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn test_can_use_tool_trait_object() {
        let handler: Box<dyn CanUseToolHandler> =
            Box::new(DefaultPermissionHandler::builder().build());

        let result = handler.can_use_tool("Bash", &json!({})).await;
        assert!(result.is_ok());
        assert!(result.unwrap().is_allowed());
    }
}
