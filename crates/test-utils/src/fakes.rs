use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::oneshot;
use ktalk::exec::{ExecutionResult, ExecutorBackend};
use ktalk::generate::{CommandGenerator, GeneratorError};
use ktalk::session::Confirm;
use ktalk::validator::ValidatedCommand;

enum Reply {
    Text(String),
    Status(u16, String),
    Stall,
}

/// A fake generation service that:
/// - records every query it was asked
/// - answers with a fixed reply, a fixed HTTP status failure, or never.
pub struct CannedGenerator {
    reply: Reply,
    queries: Arc<Mutex<Vec<String>>>,
}

impl CannedGenerator {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(reply: &str) -> Self {
        Self::with_reply(Reply::Text(reply.to_string()))
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self::with_reply(Reply::Status(status, body.to_string()))
    }

    /// A service that never answers.
    pub fn stalled() -> Self {
        Self::with_reply(Reply::Stall)
    }

    pub fn queries(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.queries)
    }
}

impl CommandGenerator for CannedGenerator {
    fn generate<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, GeneratorError>> + Send + 'a>> {
        self.queries.lock().unwrap().push(query.to_string());
        let reply = match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Status(status, body) => Err(GeneratorError::Status {
                status: *status,
                body: body.clone(),
            }),
            Reply::Stall => {
                return Box::pin(std::future::pending::<Result<String, GeneratorError>>());
            }
        };
        Box::pin(std::future::ready(reply))
    }
}

type ResultFactory = Box<dyn Fn(&ValidatedCommand) -> ExecutionResult + Send>;

/// A fake executor that:
/// - records which commands were "run" (and whether a cancel hook was given)
/// - returns a result built by a closure, `Completed(0)` by default.
pub struct RecordingExecutor {
    executed: Arc<Mutex<Vec<ValidatedCommand>>>,
    make_result: ResultFactory,
}

impl RecordingExecutor {
    pub fn new(executed: Arc<Mutex<Vec<ValidatedCommand>>>) -> Self {
        Self {
            executed,
            make_result: Box::new(|_| ExecutionResult::Completed {
                exit_code: 0,
                stderr_tail: String::new(),
            }),
        }
    }

    pub fn with_result<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValidatedCommand) -> ExecutionResult + Send + 'static,
    {
        self.make_result = Box::new(f);
        self
    }

    pub fn failing_to_start(executed: Arc<Mutex<Vec<ValidatedCommand>>>) -> Self {
        Self::new(executed).with_result(|_| ExecutionResult::FailedToStart {
            cause: io::Error::new(io::ErrorKind::NotFound, "program not found"),
        })
    }
}

/// A fake executor whose "process" runs until it is cancelled, then reports
/// `Interrupted`. Without a cancel channel it reports `TimedOut` at once.
pub struct UntilCancelledExecutor {
    executed: Arc<Mutex<Vec<ValidatedCommand>>>,
}

impl UntilCancelledExecutor {
    pub fn new(executed: Arc<Mutex<Vec<ValidatedCommand>>>) -> Self {
        Self { executed }
    }
}

impl ExecutorBackend for UntilCancelledExecutor {
    fn execute_validated(
        &mut self,
        cmd: ValidatedCommand,
        cancel: Option<oneshot::Receiver<()>>,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + '_>> {
        self.executed.lock().unwrap().push(cmd);
        Box::pin(async move {
            let started = Instant::now();
            let cancelled = match cancel {
                Some(rx) => rx.await.is_ok(),
                None => false,
            };
            let elapsed = started.elapsed();
            if cancelled {
                ExecutionResult::Interrupted { elapsed }
            } else {
                ExecutionResult::TimedOut { elapsed }
            }
        })
    }
}

impl ExecutorBackend for RecordingExecutor {
    fn execute_validated(
        &mut self,
        cmd: ValidatedCommand,
        _cancel: Option<oneshot::Receiver<()>>,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + '_>> {
        let result = (self.make_result)(&cmd);
        self.executed.lock().unwrap().push(cmd);
        Box::pin(std::future::ready(result))
    }
}

/// A confirmation gate that answers from a script and records what it was
/// shown. Declines once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    pub shown: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            shown: Vec::new(),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm<'a>(
        &'a mut self,
        cmd: &'a ValidatedCommand,
    ) -> Pin<Box<dyn Future<Output = io::Result<bool>> + Send + 'a>> {
        self.shown.push(cmd.as_str().to_string());
        let answer = self.answers.pop_front().unwrap_or(false);
        Box::pin(std::future::ready(Ok(answer)))
    }
}
