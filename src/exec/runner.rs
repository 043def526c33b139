// src/exec/runner.rs

//! Single command process runner.

use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::exec::result::ExecutionResult;
use crate::exec::tail::StderrTail;
use crate::validator::ValidatedCommand;

/// How long to wait for the stderr forwarder to drain after the child is
/// gone. A grandchild may still hold the pipe open.
const STDERR_DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Bounds applied to one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecLimits {
    pub timeout: Duration,
    pub stderr_tail_bytes: usize,
}

/// How the race between the child and its limits ended.
enum Finish {
    Exited(ExitStatus),
    WaitFailed(std::io::Error),
    Deadline,
    Cancelled,
}

/// Run a validated command to completion, deadline, or cancellation.
///
/// - The program is spawned directly from the argv words; no shell is
///   involved, so quoting or metacharacters in arguments are inert.
/// - stdin/stdout are inherited; stderr is forwarded live and its tail kept.
/// - When the deadline elapses or `cancel` fires, the child is killed and
///   reaped before returning.
/// - Dropping the returned future kills the child as well (`kill_on_drop`).
///
/// A `cancel` sender that is dropped without sending never cancels.
pub async fn run_confined(
    cmd: ValidatedCommand,
    limits: ExecLimits,
    cancel: Option<oneshot::Receiver<()>>,
) -> ExecutionResult {
    info!(
        program = %cmd.program(),
        args = ?cmd.args(),
        timeout_ms = limits.timeout.as_millis() as u64,
        "starting command process"
    );

    let mut command = Command::new(cmd.program());
    command
        .args(cmd.args())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let started = Instant::now();
    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(cause) => {
            warn!(program = %cmd.program(), error = %cause, "failed to spawn command");
            return ExecutionResult::FailedToStart { cause };
        }
    };

    let tail = StderrTail::new(limits.stderr_tail_bytes);
    let forwarder = child
        .stderr
        .take()
        .map(|stderr| tail.forward(stderr, tokio::io::stderr()));

    let finish = tokio::select! {
        status = child.wait() => match status {
            Ok(status) => Finish::Exited(status),
            Err(e) => Finish::WaitFailed(e),
        },
        _ = tokio::time::sleep(limits.timeout) => Finish::Deadline,
        _ = cancelled(cancel) => Finish::Cancelled,
    };

    let elapsed = started.elapsed();
    match finish {
        Finish::Exited(status) => {
            drain(forwarder).await;
            let result = exit_result(status, tail.snapshot());
            info!(
                program = %cmd.program(),
                exit_code = ?result.exit_code(),
                elapsed_ms = elapsed.as_millis() as u64,
                "command process exited"
            );
            result
        }
        Finish::WaitFailed(e) => {
            error!(program = %cmd.program(), error = %e, "waiting for command process failed");
            terminate(&mut child).await;
            drain(forwarder).await;
            ExecutionResult::Completed {
                exit_code: -1,
                stderr_tail: tail.snapshot(),
            }
        }
        Finish::Deadline => {
            warn!(
                program = %cmd.program(),
                timeout_ms = limits.timeout.as_millis() as u64,
                "command exceeded its deadline; killing process"
            );
            terminate(&mut child).await;
            drain(forwarder).await;
            ExecutionResult::TimedOut { elapsed }
        }
        Finish::Cancelled => {
            info!(program = %cmd.program(), "cancellation requested; killing process");
            terminate(&mut child).await;
            drain(forwarder).await;
            ExecutionResult::Interrupted { elapsed }
        }
    }
}

/// Resolves only when an explicit cancellation is sent.
async fn cancelled(cancel: Option<oneshot::Receiver<()>>) {
    if let Some(rx) = cancel {
        if rx.await.is_ok() {
            return;
        }
        debug!("cancel channel closed without explicit cancellation");
    }
    std::future::pending::<()>().await
}

/// Kill the child and wait for it, so no zombie is left behind.
async fn terminate(child: &mut Child) {
    // `Child::kill` sends SIGKILL (TerminateProcess on Windows) and then
    // waits for the exit status.
    if let Err(e) = child.kill().await {
        warn!(pid = ?child.id(), error = %e, "failed to kill command process");
    }
}

async fn drain(forwarder: Option<JoinHandle<()>>) {
    let Some(mut handle) = forwarder else {
        return;
    };
    if tokio::time::timeout(STDERR_DRAIN_GRACE, &mut handle)
        .await
        .is_err()
    {
        debug!("stderr still open after child exit; stop forwarding");
        handle.abort();
    }
}

#[cfg(unix)]
fn exit_result(status: ExitStatus, stderr_tail: String) -> ExecutionResult {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(exit_code), _) => ExecutionResult::Completed {
            exit_code,
            stderr_tail,
        },
        (None, Some(signal)) => ExecutionResult::Signalled {
            signal,
            stderr_tail,
        },
        (None, None) => ExecutionResult::Completed {
            exit_code: -1,
            stderr_tail,
        },
    }
}

#[cfg(not(unix))]
fn exit_result(status: ExitStatus, stderr_tail: String) -> ExecutionResult {
    ExecutionResult::Completed {
        exit_code: status.code().unwrap_or(-1),
        stderr_tail,
    }
}
