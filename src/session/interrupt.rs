// src/session/interrupt.rs

//! Where user interrupts come from.
//!
//! Once something listens for Ctrl-C the default "terminate the process"
//! behaviour is gone for good, so every wait in a turn (service reply,
//! confirmation, input line, running command) races against the same
//! source.

use std::sync::Arc;

use tokio::sync::Notify;

/// Source of interrupts for a [`Session`](super::Session).
#[derive(Debug, Clone, Default)]
pub enum InterruptSource {
    /// Never fires.
    #[default]
    Disabled,
    /// SIGINT / Ctrl-C.
    CtrlC,
    /// Fired through an [`InterruptTrigger`].
    Manual(Arc<Notify>),
}

/// Fires a [`InterruptSource::Manual`] source.
#[derive(Debug, Clone)]
pub struct InterruptTrigger(Arc<Notify>);

impl InterruptTrigger {
    /// Interrupt the current wait, or the next one if nothing is waiting.
    pub fn fire(&self) {
        self.0.notify_one();
    }
}

impl InterruptSource {
    pub fn manual() -> (Self, InterruptTrigger) {
        let notify = Arc::new(Notify::new());
        (Self::Manual(Arc::clone(&notify)), InterruptTrigger(notify))
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, InterruptSource::Disabled)
    }

    /// Resolves on the next interrupt; never for `Disabled`.
    pub async fn wait(&self) {
        match self {
            InterruptSource::Disabled => {}
            InterruptSource::CtrlC => {
                if tokio::signal::ctrl_c().await.is_ok() {
                    return;
                }
            }
            InterruptSource::Manual(notify) => {
                notify.notified().await;
                return;
            }
        }
        std::future::pending::<()>().await
    }
}
