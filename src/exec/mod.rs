// src/exec/mod.rs

//! Confined process execution layer.
//!
//! This module runs a [`ValidatedCommand`](crate::validator::ValidatedCommand)
//! as a child process using `tokio::process::Command`, directly from its argv
//! words (never through `sh -c`).
//!
//! - [`runner`] owns the process lifecycle: spawn, race against the deadline
//!   and an optional cancel signal, kill and reap.
//! - [`tail`] forwards the child's stderr to ours while keeping the last
//!   bytes for the report.
//! - [`result`] defines [`ExecutionResult`] and [`ExecutionFailure`].
//! - [`backend`] provides the `ExecutorBackend` trait and the production
//!   `ConfinedExecutor`, which tests can replace with a fake.

pub mod backend;
pub mod result;
pub mod runner;
pub mod tail;

use std::time::Duration;

pub use backend::{ConfinedExecutor, ExecutorBackend};
pub use result::{ExecutionFailure, ExecutionResult};
pub use runner::{ExecLimits, run_confined};
pub use tail::StderrTail;

/// Default wall-clock limit for a generated command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default number of trailing stderr bytes kept in the result.
pub const DEFAULT_STDERR_TAIL_BYTES: usize = 4096;

/// Upper bound accepted for `stderr_tail_bytes`.
pub const MAX_STDERR_TAIL_BYTES: usize = 1024 * 1024;
