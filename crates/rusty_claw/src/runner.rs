//! Process abstraction underneath the subprocess transport
//!
//! [`Runner`] hides the difference between a real `claude` child process
//! ([`ProcessRunner`]) and an in-memory double ([`MockRunner`]) so
//! `SubprocessCLITransport` (and anything that wants to unit-test against it)
//! never touches `tokio::process` directly.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::error::ClawError;

/// How a process finished, mock or real.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerExit {
    /// Exited with status 0.
    Success,
    /// Exited with a non-zero code (or a code we couldn't recover, `-1`).
    Failure(i32),
}

/// The stdio handles a [`Runner`] hands back after a successful `start()`.
pub struct RunnerHandles {
    /// Write end of the child's stdin.
    pub stdin: Box<dyn AsyncWrite + Send + Unpin>,
    /// Read end of the child's stdout.
    pub stdout: Box<dyn AsyncRead + Send + Unpin>,
    /// Read end of the child's stderr.
    pub stderr: Box<dyn AsyncRead + Send + Unpin>,
    /// OS process id, when there is a real one.
    pub pid: Option<u32>,
}

/// Abstraction over "a process that speaks NDJSON on stdio."
///
/// `start()` takes `&mut self` since it's a one-time setup step; `wait()` and
/// `kill()` take `&self` so a started runner can be shared (`Arc<dyn Runner>`)
/// between the task that awaits exit and whatever calls `close()`.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Start the underlying process (or mock) with the given argv/env/cwd.
    async fn start(
        &mut self,
        argv: Vec<String>,
        envs: HashMap<String, String>,
        cwd: Option<PathBuf>,
    ) -> Result<RunnerHandles, ClawError>;

    /// Wait for the process to exit. Safe to call from multiple tasks.
    async fn wait(&self) -> Result<RunnerExit, ClawError>;

    /// Ask the process to stop. Idempotent: a no-op before `start()` or after
    /// the process has already exited.
    async fn kill(&self);

    /// Best-effort liveness check. Advisory only — doesn't make a syscall.
    fn is_alive(&self) -> bool;
}

/// [`Runner`] backed by a real `tokio::process::Child`.
///
/// Process ownership lives inside a spawned task rather than on `self`, so
/// `kill()` never has to fight `wait()` for exclusive access to the `Child`:
/// the owning task escalates signals itself when asked.
pub struct ProcessRunner {
    pid: Option<u32>,
    alive: Arc<AtomicBool>,
    kill_tx: Option<mpsc::UnboundedSender<()>>,
    exit_rx: Option<watch::Receiver<Option<RunnerExit>>>,
}

impl ProcessRunner {
    /// Create a runner that hasn't started a process yet.
    pub fn new() -> Self {
        Self {
            pid: None,
            alive: Arc::new(AtomicBool::new(false)),
            kill_tx: None,
            exit_rx: None,
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Runner for ProcessRunner {
    async fn start(
        &mut self,
        argv: Vec<String>,
        envs: HashMap<String, String>,
        cwd: Option<PathBuf>,
    ) -> Result<RunnerHandles, ClawError> {
        let (program, rest) = argv
            .split_first()
            .ok_or_else(|| ClawError::Connection("empty argv".to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(rest)
            .envs(envs)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ClawError::CliNotFound
            } else {
                ClawError::Io(e)
            }
        })?;

        let pid = child.id();
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ClawError::Connection("failed to capture stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClawError::Connection("failed to capture stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ClawError::Connection("failed to capture stderr".to_string()))?;

        let alive = Arc::new(AtomicBool::new(true));
        let alive_task = alive.clone();
        let (kill_tx, mut kill_rx) = mpsc::unbounded_channel::<()>();
        let (exit_tx, exit_rx) = watch::channel(None);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    status = child.wait() => {
                        alive_task.store(false, Ordering::SeqCst);
                        let exit = match status {
                            Ok(s) if s.success() => RunnerExit::Success,
                            Ok(s) => RunnerExit::Failure(s.code().unwrap_or(-1)),
                            Err(_) => RunnerExit::Failure(-1),
                        };
                        debug!("process exited: {:?}", exit);
                        let _ = exit_tx.send(Some(exit));
                        break;
                    }
                    signal = kill_rx.recv() => {
                        if signal.is_none() {
                            continue;
                        }
                        #[cfg(unix)]
                        {
                            use nix::sys::signal::{kill, Signal};
                            use nix::unistd::Pid;

                            if let Some(pid) = pid {
                                let nix_pid = Pid::from_raw(pid as i32);
                                debug!("sending SIGTERM to pid {}", pid);
                                let _ = kill(nix_pid, Signal::SIGTERM);

                                let mut exited = false;
                                for _ in 0..50 {
                                    tokio::time::sleep(Duration::from_millis(100)).await;
                                    if matches!(child.try_wait(), Ok(Some(_))) {
                                        exited = true;
                                        break;
                                    }
                                }
                                if !exited {
                                    warn!("SIGTERM timed out, sending SIGKILL to pid {}", pid);
                                    let _ = kill(nix_pid, Signal::SIGKILL);
                                }
                            }
                        }
                        #[cfg(not(unix))]
                        {
                            warn!("force-killing child process (non-unix)");
                            let _ = child.start_kill();
                        }
                    }
                }
            }
        });

        self.pid = pid;
        self.alive = alive;
        self.kill_tx = Some(kill_tx);
        self.exit_rx = Some(exit_rx);

        Ok(RunnerHandles {
            stdin: Box::new(stdin),
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            pid,
        })
    }

    async fn wait(&self) -> Result<RunnerExit, ClawError> {
        let mut rx = self
            .exit_rx
            .clone()
            .ok_or_else(|| ClawError::Connection("runner not started".to_string()))?;
        loop {
            if let Some(exit) = *rx.borrow() {
                return Ok(exit);
            }
            if rx.changed().await.is_err() {
                return Err(ClawError::Connection(
                    "runner task ended without reporting exit".to_string(),
                ));
            }
        }
    }

    async fn kill(&self) {
        if let Some(tx) = &self.kill_tx {
            let _ = tx.send(());
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

/// In-memory [`Runner`] double for control/client unit tests.
///
/// Backed by `tokio::io::duplex` pipes: writes are buffered and
/// non-blocking, reads block until data arrives or the peer closes its end
/// (yielding EOF), exactly like a real pipe but with no subprocess involved.
pub struct MockRunner {
    stdin: Option<tokio::io::DuplexStream>,
    stdout: Option<tokio::io::DuplexStream>,
    stderr: Option<tokio::io::DuplexStream>,
    alive: Arc<AtomicBool>,
    exit_rx: watch::Receiver<Option<RunnerExit>>,
}

/// The test-side counterpart to a [`MockRunner`]: feed stdout/stderr lines,
/// inspect what was written to stdin, and report an exit status.
pub struct MockRunnerHandle {
    /// Write end the test uses to simulate CLI stdout.
    pub stdout: tokio::io::DuplexStream,
    /// Write end the test uses to simulate CLI stderr.
    pub stderr: tokio::io::DuplexStream,
    /// Read end the test uses to observe what the transport wrote to stdin.
    pub stdin: tokio::io::DuplexStream,
    alive: Arc<AtomicBool>,
    exit_tx: watch::Sender<Option<RunnerExit>>,
}

const MOCK_BUFFER_SIZE: usize = 64 * 1024;

impl MockRunner {
    /// Create a mock runner and its test-facing controller handle.
    pub fn new() -> (Self, MockRunnerHandle) {
        let (stdin_runner, stdin_handle) = tokio::io::duplex(MOCK_BUFFER_SIZE);
        let (stdout_handle, stdout_runner) = tokio::io::duplex(MOCK_BUFFER_SIZE);
        let (stderr_handle, stderr_runner) = tokio::io::duplex(MOCK_BUFFER_SIZE);
        let alive = Arc::new(AtomicBool::new(false));
        let (exit_tx, exit_rx) = watch::channel(None);

        (
            Self {
                stdin: Some(stdin_runner),
                stdout: Some(stdout_runner),
                stderr: Some(stderr_runner),
                alive: alive.clone(),
                exit_rx,
            },
            MockRunnerHandle {
                stdin: stdin_handle,
                stdout: stdout_handle,
                stderr: stderr_handle,
                alive,
                exit_tx,
            },
        )
    }
}

impl MockRunnerHandle {
    /// Write one NDJSON line to the mocked stdout.
    pub async fn send_line(&mut self, line: &str) -> std::io::Result<()> {
        self.stdout.write_all(line.as_bytes()).await?;
        self.stdout.write_all(b"\n").await?;
        self.stdout.flush().await
    }

    /// Write one line to the mocked stderr.
    pub async fn send_stderr_line(&mut self, line: &str) -> std::io::Result<()> {
        self.stderr.write_all(line.as_bytes()).await?;
        self.stderr.write_all(b"\n").await?;
        self.stderr.flush().await
    }

    /// Report that the mocked process has exited, unblocking `wait()`.
    pub fn finish(&mut self, exit: RunnerExit) {
        self.alive.store(false, Ordering::SeqCst);
        let _ = self.exit_tx.send(Some(exit));
    }
}

#[async_trait]
impl Runner for MockRunner {
    async fn start(
        &mut self,
        _argv: Vec<String>,
        _envs: HashMap<String, String>,
        _cwd: Option<PathBuf>,
    ) -> Result<RunnerHandles, ClawError> {
        let stdin = self
            .stdin
            .take()
            .ok_or_else(|| ClawError::Connection("mock runner already started".to_string()))?;
        let stdout = self
            .stdout
            .take()
            .ok_or_else(|| ClawError::Connection("mock runner already started".to_string()))?;
        let stderr = self
            .stderr
            .take()
            .ok_or_else(|| ClawError::Connection("mock runner already started".to_string()))?;

        self.alive.store(true, Ordering::SeqCst);

        Ok(RunnerHandles {
            stdin: Box::new(stdin),
            stdout: Box::new(stdout),
            stderr: Box::new(stderr),
            pid: None,
        })
    }

    async fn wait(&self) -> Result<RunnerExit, ClawError> {
        let mut rx = self.exit_rx.clone();
        loop {
            if let Some(exit) = *rx.borrow() {
                return Ok(exit);
            }
            if rx.changed().await.is_err() {
                return Err(ClawError::Connection(
                    "mock runner controller dropped".to_string(),
                ));
            }
        }
    }

    async fn kill(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_process_runner_missing_binary() {
        let mut runner = ProcessRunner::new();
        let result = runner
            .start(
                vec!["/nonexistent/rusty-claw-runner-test-binary".to_string()],
                HashMap::new(),
                None,
            )
            .await;
        assert!(matches!(result, Err(ClawError::CliNotFound)));
    }

    #[tokio::test]
    async fn test_process_runner_kill_before_start_is_noop() {
        let runner = ProcessRunner::new();
        runner.kill().await;
        assert!(!runner.is_alive());
    }

    #[tokio::test]
    async fn test_mock_runner_round_trip() {
        let (mut runner, mut handle) = MockRunner::new();
        let mut runner_handles = runner.start(vec![], HashMap::new(), None).await.unwrap();
        assert!(runner.is_alive());

        // Transport writes to stdin -> test observes it on the handle.
        runner_handles.stdin.write_all(b"ping\n").await.unwrap();
        let mut buf = [0u8; 5];
        handle.stdin.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"ping\n");

        // Test writes to stdout -> transport observes it.
        handle.send_line("{\"type\":\"result\"}").await.unwrap();
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            runner_handles.stdout.read_exact(&mut byte).await.unwrap();
            if byte[0] == b'\n' {
                break;
            }
            line.push(byte[0]);
        }
        assert_eq!(line, b"{\"type\":\"result\"}");

        handle.finish(RunnerExit::Success);
        assert_eq!(runner.wait().await.unwrap(), RunnerExit::Success);
    }

    #[tokio::test]
    async fn test_mock_runner_start_twice_errors() {
        let (mut runner, _handle) = MockRunner::new();
        runner.start(vec![], HashMap::new(), None).await.unwrap();
        let result = runner.start(vec![], HashMap::new(), None).await;
        assert!(result.is_err());
    }
}
