//! Subprocess-based transport implementation
//!
//! This module provides [`SubprocessCLITransport`], which drives the `claude` CLI
//! through a [`Runner`] — a real child process in production, an in-memory
//! double in tests — and communicates over its stdin/stdout/stderr handles.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, Mutex};

use tracing::{debug, error, trace, warn};

use crate::error::ClawError;
use crate::runner::{ProcessRunner, Runner, RunnerExit};
use crate::transport::Transport;

/// Type alias for the message receiver channel
type MessageReceiver = mpsc::UnboundedReceiver<Result<Value, ClawError>>;

/// Transport implementation that drives Claude CLI through a [`Runner`]
///
/// # Process Lifecycle
///
/// 1. **Construction** - Store CLI path/args and an unstarted `Runner`
/// 2. **Connection** - `start()` the runner, capturing stdin/stdout/stderr
/// 3. **Communication** - Background tasks handle I/O:
///    - Reader task: Parse NDJSON from stdout → send to channel
///    - Monitor task: `Runner::wait()` to detect unexpected process exits
/// 4. **Shutdown** - Graceful: close stdin → wait briefly. Forced: `Runner::kill()`
///
/// # Thread Safety
///
/// All public methods are safe to call concurrently:
/// - `write()` uses `Arc<Mutex<>>` for stdin access
/// - `is_ready()` uses atomic operations
/// - Background tasks coordinate via channels and atomics
///
/// # Example
///
/// ```ignore
/// let mut transport = SubprocessCLITransport::new(
///     PathBuf::from("claude"),
///     vec![
///         "--output-format=stream-json".to_string(),
///         "--verbose".to_string(),
///     ]
/// );
///
/// transport.connect().await?;
/// assert!(transport.is_ready());
/// ```
pub struct SubprocessCLITransport {
    /// Runner awaiting `start()`. Taken by `connect()` and replaced by `live`.
    runner_init: Arc<Mutex<Option<Box<dyn Runner>>>>,

    /// The started runner, shared with the monitor task and `close()`.
    live: Arc<std::sync::Mutex<Option<Arc<dyn Runner>>>>,

    /// Stdin handle wrapped for concurrent access
    stdin: Arc<Mutex<Option<Box<dyn AsyncWrite + Send + Unpin>>>>,

    /// Message receiver (moved out on first call to messages())
    messages_rx: Arc<std::sync::Mutex<Option<MessageReceiver>>>,

    /// Connection state (true if process is alive and connected)
    connected: Arc<AtomicBool>,

    /// Explicit CLI path, or `None` to run `claude` resolved from `PATH`.
    ///
    /// CLI discovery/version validation are not part of this path — see
    /// [`crate::transport::CliDiscovery`] for the opt-in utility if a caller
    /// wants to resolve and validate a binary before constructing a transport.
    cli_path_arg: Option<PathBuf>,

    /// Arguments to pass to CLI
    args: Vec<String>,

    /// Captured stderr for error diagnostics
    stderr_buffer: Arc<Mutex<String>>,
}

impl SubprocessCLITransport {
    /// Create a new subprocess transport backed by a real child process
    ///
    /// # Arguments
    ///
    /// * `cli_path` - Optional path to the `claude` CLI executable. If `None`,
    ///   `claude` is resolved from `PATH` when the process is started.
    /// * `args` - Command-line arguments (should include `--output-format=stream-json`)
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use rusty_claw::transport::SubprocessCLITransport;
    ///
    /// // Resolve `claude` from PATH
    /// let transport = SubprocessCLITransport::new(
    ///     None,
    ///     vec!["--output-format=stream-json".to_string()]
    /// );
    ///
    /// // Or use an explicit path
    /// let transport = SubprocessCLITransport::new(
    ///     Some(PathBuf::from("/opt/homebrew/bin/claude")),
    ///     vec!["--output-format=stream-json".to_string()]
    /// );
    /// ```
    pub fn new(cli_path: Option<PathBuf>, args: Vec<String>) -> Self {
        Self::with_runner(cli_path, args, Box::new(ProcessRunner::new()))
    }

    /// Create a transport driven by a caller-supplied [`Runner`], e.g. a
    /// [`crate::runner::MockRunner`] in unit tests.
    pub fn with_runner(cli_path: Option<PathBuf>, args: Vec<String>, runner: Box<dyn Runner>) -> Self {
        Self {
            runner_init: Arc::new(Mutex::new(Some(runner))),
            live: Arc::new(std::sync::Mutex::new(None)),
            stdin: Arc::new(Mutex::new(None)),
            messages_rx: Arc::new(std::sync::Mutex::new(None)),
            connected: Arc::new(AtomicBool::new(false)),
            cli_path_arg: cli_path,
            args,
            stderr_buffer: Arc::new(Mutex::new(String::new())),
        }
    }

    /// Spawn background task to read stdout and parse NDJSON messages
    fn spawn_reader_task(
        stdout: Box<dyn AsyncRead + Send + Unpin>,
        tx: mpsc::UnboundedSender<Result<Value, ClawError>>,
        connected: Arc<AtomicBool>,
    ) {
        tokio::spawn(async move {
            let reader = BufReader::new(stdout);
            let mut lines = reader.lines();

            debug!("Started stdout reader task");

            while let Ok(Some(line)) = lines.next_line().await {
                trace!("Received line: {}", line);

                // Skip empty lines
                if line.trim().is_empty() {
                    continue;
                }

                // Parse JSON
                match serde_json::from_str::<Value>(&line) {
                    Ok(value) => {
                        if tx.send(Ok(value)).is_err() {
                            debug!("Message receiver dropped, stopping reader task");
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Failed to parse JSON line '{}': {}", line, e);
                        if tx.send(Err(ClawError::JsonDecode(e))).is_err() {
                            debug!("Message receiver dropped, stopping reader task");
                            break;
                        }
                    }
                }
            }

            debug!("Stdout reader task finished");
            connected.store(false, Ordering::SeqCst);
        });
    }

    /// Spawn background task to read stderr for diagnostics
    fn spawn_stderr_task(stderr: Box<dyn AsyncRead + Send + Unpin>, buffer: Arc<Mutex<String>>) {
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();

            debug!("Started stderr reader task");

            while let Ok(Some(line)) = lines.next_line().await {
                warn!("CLI stderr: {}", line);
                let mut buf = buffer.lock().await;
                buf.push_str(&line);
                buf.push('\n');
            }

            debug!("Stderr reader task finished");
        });
    }

    /// Spawn background task to monitor process health via `Runner::wait()`
    fn spawn_monitor_task(
        runner: Arc<dyn Runner>,
        connected: Arc<AtomicBool>,
        stderr_buffer: Arc<Mutex<String>>,
    ) -> tokio::task::JoinHandle<Result<(), ClawError>> {
        tokio::spawn(async move {
            let exit = runner.wait().await?;

            debug!("Process exited: {:?}", exit);
            connected.store(false, Ordering::SeqCst);

            match exit {
                RunnerExit::Success => Ok(()),
                RunnerExit::Failure(code) => {
                    let stderr = stderr_buffer.lock().await.clone();
                    Err(ClawError::Process { code, stderr })
                }
            }
        })
    }

    /// Perform graceful shutdown: close stdin, wait briefly, then kill via the runner
    async fn graceful_shutdown(&mut self) -> Result<(), ClawError> {
        debug!("Starting graceful shutdown");

        // Close stdin first to signal the CLI to exit
        self.end_input().await?;

        // Give the process a moment to exit gracefully after stdin closes
        tokio::time::sleep(Duration::from_millis(500)).await;

        // If still connected, ask the runner to kill it (SIGTERM/SIGKILL escalation
        // lives inside the runner, see `ProcessRunner`).
        if self.connected.load(Ordering::SeqCst) {
            let runner = self.live.lock().unwrap().clone();
            if let Some(runner) = runner {
                debug!("Process still running after stdin close, killing via runner");
                runner.kill().await;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Transport for SubprocessCLITransport {
    async fn connect(&mut self) -> Result<(), ClawError> {
        if self.connected.load(Ordering::SeqCst) {
            return Err(ClawError::Connection(
                "already connected".to_string(),
            ));
        }

        let mut runner = self
            .runner_init
            .lock()
            .await
            .take()
            .ok_or_else(|| ClawError::Connection("already connected".to_string()))?;

        let program = self
            .cli_path_arg
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "claude".to_string());
        let mut argv = vec![program.clone()];
        argv.extend(self.args.iter().cloned());

        debug!("Starting CLI: {} {:?}", program, self.args);

        let handles = runner.start(argv, HashMap::new(), None).await?;

        let runner: Arc<dyn Runner> = Arc::from(runner);
        *self.live.lock().unwrap() = Some(runner.clone());

        // Set up message channel
        let (tx, rx) = mpsc::unbounded_channel();
        *self.messages_rx.lock().unwrap() = Some(rx);

        // Store stdin
        *self.stdin.lock().await = Some(handles.stdin);

        // Spawn background tasks
        Self::spawn_reader_task(handles.stdout, tx, self.connected.clone());
        Self::spawn_stderr_task(handles.stderr, self.stderr_buffer.clone());
        let _monitor = Self::spawn_monitor_task(runner, self.connected.clone(), self.stderr_buffer.clone());

        self.connected.store(true, Ordering::SeqCst);
        debug!("Connection established");

        Ok(())
    }

    async fn write(&self, message: &[u8]) -> Result<(), ClawError> {
        if !self.is_ready() {
            return Err(ClawError::Connection("not connected".to_string()));
        }

        let mut stdin_guard = self.stdin.lock().await;
        let stdin = stdin_guard.as_mut().ok_or_else(|| {
            ClawError::Connection("stdin already closed".to_string())
        })?;

        trace!("Writing {} bytes to stdin", message.len());

        stdin.write_all(message).await.map_err(ClawError::Io)?;

        stdin.flush().await.map_err(ClawError::Io)?;

        Ok(())
    }

    fn messages(&self) -> MessageReceiver {
        self.messages_rx.lock().unwrap().take()
            .expect("messages() can only be called once per connection")
    }

    async fn end_input(&self) -> Result<(), ClawError> {
        debug!("Closing stdin");

        let mut stdin_guard = self.stdin.lock().await;
        if let Some(mut stdin) = stdin_guard.take() {
            stdin.shutdown().await.map_err(ClawError::Io)?;
        }

        Ok(())
    }

    async fn close(&mut self) -> Result<(), ClawError> {
        if !self.connected.load(Ordering::SeqCst) {
            debug!("Already closed");
            return Ok(());
        }

        // Perform graceful shutdown first (needs connected=true to check process liveness)
        let result = self.graceful_shutdown().await;
        // Mark as disconnected after shutdown completes
        self.connected.store(false, Ordering::SeqCst);
        result
    }

    fn is_ready(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl Drop for SubprocessCLITransport {
    fn drop(&mut self) {
        // Non-blocking cleanup: just mark as disconnected. `ProcessRunner`
        // spawns its process with `kill_on_drop(true)`, so the underlying
        // child is reaped once the last `Arc<dyn Runner>` reference drops.
        self.connected.store(false, Ordering::SeqCst);
        debug!("SubprocessCLITransport dropped");
    }
}
