// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The session talks to an `ExecutorBackend` instead of spawning processes
//! itself. This makes it easy to swap in a recording fake in tests while
//! keeping the production implementation in [`runner`](super::runner).

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::config::ExecutorSettings;
use crate::exec::result::ExecutionResult;
use crate::exec::runner::{ExecLimits, run_confined};
use crate::exec::{DEFAULT_STDERR_TAIL_BYTES, DEFAULT_TIMEOUT, MAX_STDERR_TAIL_BYTES};
use crate::validator::ValidatedCommand;

/// Trait abstracting how validated commands are executed.
///
/// Production code uses [`ConfinedExecutor`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ExecutorBackend: Send {
    /// Run one command. The validated command is consumed: it runs at most
    /// once.
    fn execute_validated(
        &mut self,
        cmd: ValidatedCommand,
        cancel: Option<oneshot::Receiver<()>>,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + '_>>;
}

/// Real executor used in production: direct spawn, deadline, stderr tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfinedExecutor {
    limits: ExecLimits,
}

impl Default for ConfinedExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl ConfinedExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self {
            limits: ExecLimits {
                timeout,
                stderr_tail_bytes: DEFAULT_STDERR_TAIL_BYTES,
            },
        }
    }

    pub fn from_settings(settings: &ExecutorSettings) -> Self {
        Self {
            limits: ExecLimits {
                timeout: settings.timeout,
                stderr_tail_bytes: settings.stderr_tail_bytes,
            },
        }
    }

    /// Clamped to [`MAX_STDERR_TAIL_BYTES`].
    pub fn with_stderr_tail_bytes(mut self, bytes: usize) -> Self {
        self.limits.stderr_tail_bytes = bytes.min(MAX_STDERR_TAIL_BYTES);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.limits.timeout
    }

    /// Run `cmd` with an explicit deadline, ignoring the configured one.
    pub async fn execute(&self, cmd: ValidatedCommand, timeout: Duration) -> ExecutionResult {
        let limits = ExecLimits {
            timeout,
            ..self.limits
        };
        run_confined(cmd, limits, None).await
    }
}

impl ExecutorBackend for ConfinedExecutor {
    fn execute_validated(
        &mut self,
        cmd: ValidatedCommand,
        cancel: Option<oneshot::Receiver<()>>,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + '_>> {
        let limits = self.limits;
        Box::pin(run_confined(cmd, limits, cancel))
    }
}
