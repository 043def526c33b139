// src/exec/result.rs

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// Outcome of running a validated command.
///
/// A non-zero exit is still `Completed`: the command was valid and ran, it
/// just failed at runtime (e.g. cluster unreachable).
#[derive(Debug)]
pub enum ExecutionResult {
    /// The process exited on its own.
    Completed { exit_code: i32, stderr_tail: String },
    /// The process was terminated by a signal the executor did not send.
    Signalled { signal: i32, stderr_tail: String },
    /// The deadline elapsed; the process was killed and reaped.
    TimedOut { elapsed: Duration },
    /// Cancelled from outside (Ctrl-C); the process was killed and reaped.
    Interrupted { elapsed: Duration },
    /// The process could not be spawned at all.
    FailedToStart { cause: io::Error },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Completed { exit_code: 0, .. })
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionResult::Completed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    pub fn stderr_tail(&self) -> Option<&str> {
        match self {
            ExecutionResult::Completed { stderr_tail, .. }
            | ExecutionResult::Signalled { stderr_tail, .. } => Some(stderr_tail),
            _ => None,
        }
    }

    /// Collapse into `Ok(())` for a zero exit, or the matching failure.
    pub fn into_result(self) -> Result<(), ExecutionFailure> {
        match self {
            ExecutionResult::Completed { exit_code: 0, .. } => Ok(()),
            ExecutionResult::Completed {
                exit_code,
                stderr_tail,
            } => Err(ExecutionFailure::NonZeroExit {
                code: exit_code,
                stderr_tail,
            }),
            ExecutionResult::Signalled {
                signal,
                stderr_tail,
            } => Err(ExecutionFailure::Signalled {
                signal,
                stderr_tail,
            }),
            ExecutionResult::TimedOut { elapsed } => Err(ExecutionFailure::TimedOut(elapsed)),
            ExecutionResult::Interrupted { elapsed } => {
                Err(ExecutionFailure::Interrupted(elapsed))
            }
            ExecutionResult::FailedToStart { cause } => Err(ExecutionFailure::FailedToStart(cause)),
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionResult::Completed { exit_code: 0, .. } => f.write_str("command completed"),
            ExecutionResult::Completed { exit_code, .. } => {
                write!(f, "command failed with exit code {exit_code}")
            }
            ExecutionResult::Signalled { signal, .. } => {
                write!(f, "command terminated by signal {signal}")
            }
            ExecutionResult::TimedOut { elapsed } => {
                write!(f, "command timed out after {elapsed:?}")
            }
            ExecutionResult::Interrupted { elapsed } => {
                write!(f, "command interrupted after {elapsed:?}")
            }
            ExecutionResult::FailedToStart { cause } => {
                write!(f, "failed to start command: {cause}")
            }
        }
    }
}

/// Runtime failure of an executed command.
#[derive(Debug, Error)]
pub enum ExecutionFailure {
    #[error("command timed out after {0:?}")]
    TimedOut(Duration),

    #[error("failed to start command: {0}")]
    FailedToStart(#[source] io::Error),

    #[error("command failed with exit code {code}")]
    NonZeroExit { code: i32, stderr_tail: String },

    #[error("command terminated by signal {signal}")]
    Signalled { signal: i32, stderr_tail: String },

    #[error("command interrupted after {0:?}")]
    Interrupted(Duration),
}
