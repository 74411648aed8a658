//! Hook response types for permission decisions and context injection.

use crate::options::HookEvent;
use serde::Serialize;
use serde_json::Value;

/// Permission decision for tool use or other controlled actions
///
/// # Examples
///
/// ```
/// use rusty_claw::prelude::*;
///
/// let decision = PermissionDecision::Allow;
/// assert_eq!(serde_json::to_string(&decision).unwrap(), r#""allow""#);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionDecision {
    /// Allow the action to proceed
    Allow,
    /// Deny the action
    Deny,
    /// Ask the user for permission
    Ask,
}

/// Decision for `Stop`/`SubagentStop` hooks: whether the agent is allowed to stop.
///
/// # Examples
///
/// ```
/// use rusty_claw::prelude::*;
///
/// let decision = HookDecision::Block;
/// assert_eq!(serde_json::to_string(&decision).unwrap(), r#""block""#);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HookDecision {
    /// Block the stop; the agent must keep going
    Block,
    /// Approve the stop
    Approve,
}

/// Response from a hook callback
///
/// `Stop`/`SubagentStop` hooks answer with [`decision`](HookResponse::decision) instead of
/// `continue` — when `decision` is present, `continue` is omitted entirely from the wire
/// payload rather than sent alongside it, since the CLI treats the two as mutually exclusive
/// ways of expressing the same outcome.
///
/// # Examples
///
/// ```
/// use rusty_claw::prelude::*;
///
/// // Allow with reason
/// let response = HookResponse::allow("Safe operation");
///
/// // Deny with reason
/// let response = HookResponse::deny("Dangerous operation detected");
///
/// // Ask user
/// let response = HookResponse::ask("Confirm destructive operation?");
///
/// // Custom response with additional context
/// let response = HookResponse::default()
///     .with_permission(PermissionDecision::Allow)
///     .with_context("Additional context for Claude");
///
/// // Stop hook blocking termination
/// let response = HookResponse::block_stop("More work remains");
/// assert!(!serde_json::to_value(&response).unwrap().as_object().unwrap().contains_key("continue"));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct HookResponse {
    /// Stop/SubagentStop decision (Block/Approve)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<HookDecision>,

    /// Permission decision (Allow/Deny/Ask)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_decision: Option<PermissionDecision>,

    /// Reason for the permission decision (shown to user)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_decision_reason: Option<String>,

    /// Additional context to inject into Claude's prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_context: Option<String>,

    /// Whether to continue processing subsequent hooks
    ///
    /// `None` when [`decision`](Self::decision) is set: the two fields are mutually
    /// exclusive on the wire, and `decision` alone conveys the outcome.
    #[serde(rename = "continue", skip_serializing_if = "Option::is_none")]
    pub should_continue: Option<bool>,

    /// Modified tool input (if tool input should be transformed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_input: Option<Value>,
}

impl Default for HookResponse {
    fn default() -> Self {
        Self {
            decision: None,
            permission_decision: None,
            permission_decision_reason: None,
            additional_context: None,
            should_continue: Some(true),
            updated_input: None,
        }
    }
}

impl HookResponse {
    /// Create a response that allows the action
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            permission_decision: Some(PermissionDecision::Allow),
            permission_decision_reason: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Create a response that denies the action
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            permission_decision: Some(PermissionDecision::Deny),
            permission_decision_reason: Some(reason.into()),
            should_continue: Some(false),
            ..Default::default()
        }
    }

    /// Create a response that asks the user
    pub fn ask(prompt: impl Into<String>) -> Self {
        Self {
            permission_decision: Some(PermissionDecision::Ask),
            permission_decision_reason: Some(prompt.into()),
            ..Default::default()
        }
    }

    /// Create a `Stop`/`SubagentStop` response that blocks termination
    ///
    /// Sets `decision` and clears `continue`, since the CLI expects exactly one of
    /// the two on the wire for these hook events.
    pub fn block_stop(reason: impl Into<String>) -> Self {
        Self {
            decision: Some(HookDecision::Block),
            permission_decision_reason: Some(reason.into()),
            should_continue: None,
            ..Default::default()
        }
    }

    /// Create a `Stop`/`SubagentStop` response that approves termination
    pub fn approve_stop() -> Self {
        Self {
            decision: Some(HookDecision::Approve),
            should_continue: None,
            ..Default::default()
        }
    }

    /// Set permission decision
    pub fn with_permission(mut self, decision: PermissionDecision) -> Self {
        self.permission_decision = Some(decision);
        self
    }

    /// Set permission reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.permission_decision_reason = Some(reason.into());
        self
    }

    /// Add additional context for Claude
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }

    /// Set whether to continue processing hooks
    ///
    /// Clears any previously set `decision`, since the two are mutually exclusive.
    pub fn with_continue(mut self, should_continue: bool) -> Self {
        self.decision = None;
        self.should_continue = Some(should_continue);
        self
    }

    /// Set a `Stop`/`SubagentStop` decision, clearing `continue`
    pub fn with_decision(mut self, decision: HookDecision) -> Self {
        self.decision = Some(decision);
        self.should_continue = None;
        self
    }

    /// Set updated tool input
    pub fn with_updated_input(mut self, input: Value) -> Self {
        self.updated_input = Some(input);
        self
    }

    /// Render the wire shape a `hook_callback` response takes for a given event.
    ///
    /// `Stop`/`SubagentStop` answer with `decision`/`reason`/`systemMessage` and never
    /// `continue`. `PreToolUse` nests a rewritten input under `hookSpecificOutput.updatedInput`;
    /// `PermissionRequest` nests it one level deeper, under `decision.updatedInput`. Every other
    /// event serializes as-is, with top-level `continue`.
    pub fn to_wire_json(&self, event: HookEvent) -> Value {
        if event.is_decision_hook() {
            let mut obj = serde_json::Map::new();
            if let Some(decision) = &self.decision {
                obj.insert(
                    "decision".to_string(),
                    serde_json::to_value(decision).expect("HookDecision always serializes"),
                );
            }
            if let Some(reason) = &self.permission_decision_reason {
                obj.insert("reason".to_string(), Value::String(reason.clone()));
            }
            if let Some(ctx) = &self.additional_context {
                obj.insert("systemMessage".to_string(), Value::String(ctx.clone()));
            }
            return Value::Object(obj);
        }

        let mut obj = match serde_json::to_value(self).expect("HookResponse always serializes") {
            Value::Object(m) => m,
            _ => unreachable!("HookResponse always serializes to an object"),
        };
        obj.remove("updated_input");

        if event.supports_input_rewrite() {
            if let Some(input) = self.updated_input.clone() {
                let key = if matches!(event, HookEvent::PermissionRequest) {
                    "decision"
                } else {
                    "hookSpecificOutput"
                };
                let nested = obj
                    .entry(key.to_string())
                    .or_insert_with(|| Value::Object(serde_json::Map::new()));
                if let Value::Object(nested) = nested {
                    nested.insert("updatedInput".to_string(), input);
                }
            }
        }

        Value::Object(obj)
    }
}
