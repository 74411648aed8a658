//! Simple query API for one-shot Claude interactions
//!
//! The `query()` function provides a convenient way to send a prompt to Claude
//! and receive a stream of response messages.
//!
//! # Example
//!
//! ```ignore
//! use rusty_claw::query;
//! use rusty_claw::options::{ClaudeAgentOptions, PermissionMode};
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ClaudeAgentOptions::builder()
//!         .permission_mode(PermissionMode::AcceptEdits)
//!         .build();
//!
//!     let mut stream = query("What files are in this directory?", Some(options)).await?;
//!
//!     while let Some(result) = stream.next().await {
//!         match result {
//!             Ok(msg) => println!("{:?}", msg),
//!             Err(e) => eprintln!("Error: {}", e),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;

use crate::control::ControlProtocol;
use crate::error::ClawError;
use crate::messages::{ApiMessage, ContentBlock};
use crate::messages::Message;
use crate::options::ClaudeAgentOptions;
use crate::pump;
use crate::transport::{SubprocessCLITransport, Transport};

/// A stream wrapper that owns the transport and control protocol to ensure
/// proper lifetime management.
///
/// This struct ensures that the transport (and the `ControlProtocol` driving
/// it) stays alive as long as the message stream is being consumed. When the
/// stream is dropped, the transport is also dropped, which gracefully shuts
/// down the CLI subprocess.
pub struct QueryStream<S> {
    /// The underlying message stream
    inner: S,
    /// Transport instance (must outlive the stream)
    #[allow(dead_code)]
    transport: Arc<dyn Transport>,
    /// Control protocol driving the pump task (must outlive the stream)
    #[allow(dead_code)]
    control: Arc<ControlProtocol>,
}

impl<S> QueryStream<S>
where
    S: Stream<Item = Result<Message, ClawError>>,
{
    /// Create a new query stream wrapping a transport, its control protocol, and
    /// the already-filtered message stream
    fn new(transport: Arc<dyn Transport>, control: Arc<ControlProtocol>, inner: S) -> Self {
        Self {
            inner,
            transport,
            control,
        }
    }
}

impl<S> Stream for QueryStream<S>
where
    S: Stream<Item = Result<Message, ClawError>> + Unpin,
{
    type Item = Result<Message, ClawError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// Execute a one-shot query to Claude and return a stream of messages
///
/// This function:
/// 1. Creates a SubprocessCLITransport (discovers CLI automatically)
/// 2. Connects to the CLI process and spawns the control/message pump
/// 3. Initializes the session, then sends the prompt as the only user turn
/// 4. Returns a stream of parsed, user-facing Message structs
///
/// # Arguments
///
/// * `prompt` - The prompt string to send to Claude
/// * `options` - Optional configuration using `ClaudeAgentOptions`
///
/// # Returns
///
/// A stream of `Result<Message, ClawError>` that yields messages until the CLI closes.
/// The stream owns the transport, ensuring the CLI process stays alive while consuming messages.
///
/// # Errors
///
/// - `ClawError::CliNotFound` if Claude CLI is not found
/// - `ClawError::InvalidCliVersion` if CLI version < 2.0.0
/// - `ClawError::Connection` if transport fails to connect
/// - `ClawError::JsonDecode` if message parsing fails
/// - `ClawError::MessageParse` if message structure is invalid
///
/// # Example
///
/// ```ignore
/// use rusty_claw::query;
/// use rusty_claw::options::{ClaudeAgentOptions, PermissionMode};
/// use tokio_stream::StreamExt;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let options = ClaudeAgentOptions::builder()
///         .permission_mode(PermissionMode::AcceptEdits)
///         .build();
///
///     let mut stream = query("What files are in this directory?", Some(options)).await?;
///
///     while let Some(result) = stream.next().await {
///         match result {
///             Ok(msg) => println!("{:?}", msg),
///             Err(e) => eprintln!("Error: {}", e),
///         }
///     }
///     Ok(())
/// }
/// ```
pub async fn query(
    prompt: impl Into<String>,
    options: Option<ClaudeAgentOptions>,
) -> Result<impl Stream<Item = Result<Message, ClawError>>, ClawError> {
    let prompt = prompt.into();
    let options = options.unwrap_or_default();
    let args = options.to_cli_args();

    // Create transport with auto-discovery (None = discover CLI from PATH/env/common locations)
    let mut transport = SubprocessCLITransport::new(None, args);

    // Connect to CLI (discovers, validates version, spawns process)
    transport.connect().await?;

    // Get the raw message receiver before wrapping transport in Arc
    let raw_rx = transport.messages();
    let transport: Arc<dyn Transport> = Arc::new(transport);
    let control = Arc::new(ControlProtocol::new(transport.clone()));

    // Spawn the pump before initializing, for the same reason ClaudeClient
    // does: the initialize response arrives over the same stream as
    // everything else, so something must already be draining it.
    let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
    pump::spawn(raw_rx, control.clone(), inbox_tx);

    control.initialize(&options).await?;

    // Stream the prompt as a single user message over stdin, then close stdin:
    // one-shot query sends exactly one turn and never writes again.
    let user_message = Message::User(crate::messages::UserMessage {
        message: ApiMessage {
            role: "user".to_string(),
            content: vec![ContentBlock::Text { text: prompt }],
        },
        is_replay: None,
    });
    let mut payload = serde_json::to_vec(&user_message)?;
    payload.push(b'\n');
    transport.write(&payload).await?;
    transport.end_input().await?;

    // The pump already classified out control traffic, so the inbox only
    // ever carries user-facing messages.
    let stream = UnboundedReceiverStream::new(inbox_rx);

    // Wrap in QueryStream to ensure transport and control outlive the stream
    Ok(QueryStream::new(transport, control, stream))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_stream_is_send() {
        // Verify that QueryStream implements Send (required for tokio tasks)
        fn assert_send<T: Send>() {}
        // Use a concrete type for the stream generic parameter
        use tokio_stream::wrappers::UnboundedReceiverStream;
        type ConcreteStream = UnboundedReceiverStream<Result<Message, ClawError>>;
        assert_send::<QueryStream<ConcreteStream>>();
    }

    #[test]
    fn test_query_stream_is_unpin() {
        // Verify that QueryStream implements Unpin (required for easy pinning)
        fn assert_unpin<T: Unpin>() {}
        use tokio_stream::wrappers::UnboundedReceiverStream;
        type ConcreteStream = UnboundedReceiverStream<Result<Message, ClawError>>;
        assert_unpin::<QueryStream<ConcreteStream>>();
    }

    #[test]
    fn test_query_accepts_string() {
        // Compile-time test: verify query accepts String
        fn _assert_compiles() {
            async fn _test() -> Result<(), ClawError> {
                let _ = query("test".to_string(), None).await?;
                Ok(())
            }
        }
    }

    #[test]
    fn test_query_accepts_str() {
        // Compile-time test: verify query accepts &str
        fn _assert_compiles() {
            async fn _test() -> Result<(), ClawError> {
                let _ = query("test", None).await?;
                Ok(())
            }
        }
    }
}
