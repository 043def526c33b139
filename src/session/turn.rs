// src/session/turn.rs

use std::fmt;

use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::errors::Result;
use crate::exec::{ExecutionResult, ExecutorBackend};
use crate::generate::CommandGenerator;
use crate::session::confirm::Confirm;
use crate::session::interrupt::InterruptSource;
use crate::validator::{CommandValidator, RejectionReason, ValidatedCommand};

/// Whether accepted commands are run or only shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnMode {
    #[default]
    Execute,
    DryRun,
}

/// What happened to one request.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The generated text failed validation; nothing ran.
    Rejected {
        candidate: String,
        reason: RejectionReason,
    },
    /// Dry-run mode: the command is valid but was not run.
    DryRun(ValidatedCommand),
    /// The user declined at the confirmation gate.
    Declined(ValidatedCommand),
    /// The command ran (successfully or not).
    Executed {
        command: String,
        result: ExecutionResult,
    },
    /// Interrupted before anything ran: while waiting for the generation
    /// service or at the confirmation gate.
    Cancelled,
}

impl TurnOutcome {
    /// True when the turn should make a one-shot invocation exit non-zero.
    pub fn is_failure(&self) -> bool {
        match self {
            TurnOutcome::Rejected { .. } | TurnOutcome::Cancelled => true,
            TurnOutcome::Executed { result, .. } => !result.is_success(),
            TurnOutcome::DryRun(_) | TurnOutcome::Declined(_) => false,
        }
    }
}

impl fmt::Display for TurnOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnOutcome::Rejected { candidate, reason } => {
                write!(f, "{reason} (generated: {})", candidate.trim())
            }
            TurnOutcome::DryRun(cmd) => write!(f, "{cmd}"),
            TurnOutcome::Declined(_) => f.write_str("command not executed"),
            TurnOutcome::Executed { result, .. } => write!(f, "{result}"),
            TurnOutcome::Cancelled => f.write_str("request cancelled"),
        }
    }
}

/// Components for processing requests one at a time.
pub struct Session<G, E> {
    generator: G,
    validator: CommandValidator,
    executor: E,
    mode: TurnMode,
    interrupts: InterruptSource,
}

impl<G, E> fmt::Debug for Session<G, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("validator", &self.validator)
            .field("mode", &self.mode)
            .field("interrupts", &self.interrupts)
            .finish_non_exhaustive()
    }
}

impl<G, E> Session<G, E>
where
    G: CommandGenerator,
    E: ExecutorBackend,
{
    pub fn new(generator: G, validator: CommandValidator, executor: E) -> Self {
        Self {
            generator,
            validator,
            executor,
            mode: TurnMode::Execute,
            interrupts: InterruptSource::Disabled,
        }
    }

    pub fn with_mode(mut self, mode: TurnMode) -> Self {
        self.mode = mode;
        self
    }

    /// Listen for interrupts while waiting on the service, the gate or a
    /// running command.
    pub fn with_interrupts(mut self, source: InterruptSource) -> Self {
        self.interrupts = source;
        self
    }

    pub fn interrupts(&self) -> &InterruptSource {
        &self.interrupts
    }

    pub fn validator(&self) -> &CommandValidator {
        &self.validator
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Process one request.
    ///
    /// Generation and gate failures are errors; a rejected command is a
    /// normal outcome. The executor is only reached for a validated command
    /// that passed the gate.
    pub async fn run_turn(&mut self, query: &str, gate: &mut dyn Confirm) -> Result<TurnOutcome> {
        let interrupts = self.interrupts.clone();
        let candidate = tokio::select! {
            reply = self.generator.generate(query) => reply?,
            _ = interrupts.wait() => {
                info!("request cancelled while waiting for the generation service");
                return Ok(TurnOutcome::Cancelled);
            }
        };

        let cmd = match self.validator.validate(&candidate) {
            Ok(cmd) => cmd,
            Err(reason) => {
                warn!(candidate = %candidate.trim(), %reason, "generated command rejected");
                return Ok(TurnOutcome::Rejected { candidate, reason });
            }
        };
        info!(command = %cmd, "generated command validated");

        if self.mode == TurnMode::DryRun {
            return Ok(TurnOutcome::DryRun(cmd));
        }

        // An answer that is already in wins over a simultaneous interrupt.
        let confirmed = tokio::select! {
            biased;
            answer = gate.confirm(&cmd) => answer?,
            _ = interrupts.wait() => {
                info!(command = %cmd, "request cancelled at the confirmation prompt");
                return Ok(TurnOutcome::Cancelled);
            }
        };
        if !confirmed {
            info!(command = %cmd, "command declined");
            return Ok(TurnOutcome::Declined(cmd));
        }

        let command = cmd.as_str().to_string();
        let (cancel, watcher) = if interrupts.is_enabled() {
            let (tx, rx) = oneshot::channel();
            let watcher = tokio::spawn(async move {
                interrupts.wait().await;
                let _ = tx.send(());
            });
            (Some(rx), Some(watcher))
        } else {
            (None, None)
        };

        let result = self.executor.execute_validated(cmd, cancel).await;

        if let Some(watcher) = watcher {
            watcher.abort();
        }

        Ok(TurnOutcome::Executed { command, result })
    }
}
