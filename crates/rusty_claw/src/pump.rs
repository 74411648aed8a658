//! Shared message pump: classifies control vs. non-control traffic coming off a
//! transport and routes each side appropriately.
//!
//! Both [`crate::client::ClaudeClient`] and [`crate::query::query`] need the same
//! split — control-plane envelopes (`control_request`/`control_response`/
//! `control_cancel_request`/`keep_alive`) are consumed here and never reach the
//! caller; everything else is parsed into a [`Message`] and forwarded.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use crate::control::messages::{ControlResponse, IncomingControlRequest};
use crate::control::ControlProtocol;
use crate::error::ClawError;
use crate::messages::Message;

/// `type` discriminants that the pump consumes internally rather than forwarding.
const CONTROL_TYPES: &[&str] = &[
    "control_request",
    "control_response",
    "control_cancel_request",
    "keep_alive",
];

/// All `type` discriminants the message codec recognizes. Anything else
/// yields `ClawError::UnknownMessageKind` instead of a parse failure.
const KNOWN_MESSAGE_KINDS: &[&str] = &[
    "system",
    "assistant",
    "user",
    "result",
    "control_request",
    "control_response",
    "control_cancel_request",
    "stream_event",
    "todo_update",
    "subagent_result",
    "tool_progress",
    "auth_status",
    "keep_alive",
    "control",
];

/// Drain `raw_rx`, dispatch control traffic into `control`, and forward everything
/// else onto `inbox_tx` as parsed [`Message`]s. Runs until `raw_rx` closes.
pub(crate) async fn run(
    mut raw_rx: mpsc::UnboundedReceiver<Result<Value, ClawError>>,
    control: Arc<ControlProtocol>,
    inbox_tx: mpsc::UnboundedSender<Result<Message, ClawError>>,
) {
    while let Some(item) = raw_rx.recv().await {
        match item {
            Ok(value) => dispatch(&control, &inbox_tx, value).await,
            Err(e) => {
                let _ = inbox_tx.send(Err(e));
            }
        }
    }
}

/// Spawn [`run`] as a background task and return its handle.
pub(crate) fn spawn(
    raw_rx: mpsc::UnboundedReceiver<Result<Value, ClawError>>,
    control: Arc<ControlProtocol>,
    inbox_tx: mpsc::UnboundedSender<Result<Message, ClawError>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(run(raw_rx, control, inbox_tx))
}

async fn dispatch(
    control: &Arc<ControlProtocol>,
    inbox_tx: &mpsc::UnboundedSender<Result<Message, ClawError>>,
    value: Value,
) {
    let kind = value
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    if CONTROL_TYPES.contains(&kind.as_str()) {
        handle_control(control, &kind, value).await;
        return;
    }

    if !KNOWN_MESSAGE_KINDS.contains(&kind.as_str()) {
        let _ = inbox_tx.send(Err(ClawError::UnknownMessageKind { kind }));
        return;
    }

    let raw = value.to_string();
    match serde_json::from_value::<Message>(value) {
        Ok(message) => {
            let _ = inbox_tx.send(Ok(message));
        }
        Err(e) => {
            let _ = inbox_tx.send(Err(ClawError::MessageParse {
                reason: e.to_string(),
                raw,
            }));
        }
    }
}

async fn handle_control(control: &Arc<ControlProtocol>, kind: &str, value: Value) {
    match kind {
        "control_response" => {
            let request_id = value
                .get("request_id")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            match serde_json::from_value::<ControlResponse>(
                value.get("response").cloned().unwrap_or(Value::Null),
            ) {
                Ok(response) => control.handle_response(&request_id, response).await,
                Err(e) => warn!("malformed control_response from CLI: {}", e),
            }
        }
        "control_request" => {
            let request_id = value
                .get("request_id")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            match serde_json::from_value::<IncomingControlRequest>(
                value.get("request").cloned().unwrap_or(Value::Null),
            ) {
                Ok(request) => control.handle_incoming(&request_id, request).await,
                Err(e) => warn!("malformed control_request from CLI: {}", e),
            }
        }
        // The CLI withdrawing a request it sent us - handle_incoming already
        // replies synchronously, so there is nothing in-flight to cancel.
        "control_cancel_request" => {}
        "keep_alive" => {}
        _ => unreachable!("kind already filtered into the control set"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::SubprocessCLITransport;
    use serde_json::json;

    fn new_control() -> Arc<ControlProtocol> {
        let transport: Arc<dyn crate::transport::Transport> =
            Arc::new(SubprocessCLITransport::new(None, vec![]));
        Arc::new(ControlProtocol::new(transport))
    }

    #[tokio::test]
    async fn test_pump_forwards_user_facing_message() {
        let control = new_control();
        let (inbox_tx, mut inbox_rx) = mpsc::unbounded_channel();
        dispatch(
            &control,
            &inbox_tx,
            json!({"type": "result", "subtype": "success", "is_error": false, "result": "done"}),
        )
        .await;
        let msg = inbox_rx.try_recv().unwrap().unwrap();
        assert!(matches!(msg, Message::Result(_)));
    }

    #[tokio::test]
    async fn test_pump_swallows_keep_alive() {
        let control = new_control();
        let (inbox_tx, mut inbox_rx) = mpsc::unbounded_channel();
        dispatch(&control, &inbox_tx, json!({"type": "keep_alive"})).await;
        assert!(inbox_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_pump_routes_control_response_without_forwarding() {
        let control = new_control();
        let (inbox_tx, mut inbox_rx) = mpsc::unbounded_channel();
        dispatch(
            &control,
            &inbox_tx,
            json!({
                "type": "control_response",
                "request_id": "req_does_not_exist",
                "response": {"subtype": "success", "data": {}},
            }),
        )
        .await;
        assert!(inbox_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_pump_surfaces_unknown_kind() {
        let control = new_control();
        let (inbox_tx, mut inbox_rx) = mpsc::unbounded_channel();
        dispatch(&control, &inbox_tx, json!({"type": "something_new"})).await;
        match inbox_rx.try_recv().unwrap() {
            Err(ClawError::UnknownMessageKind { kind }) => assert_eq!(kind, "something_new"),
            other => panic!("expected UnknownMessageKind, got {:?}", other),
        }
    }
}
