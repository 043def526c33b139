// src/session/mod.rs

//! One request, end to end.
//!
//! A turn is: generate → validate → confirm → execute. The confirmation gate
//! is a separate step ([`Confirm`]) so the executor is only reached after an
//! explicit acknowledgement (or `--yes`).
//!
//! - [`confirm`] holds the gate trait, the terminal [`Console`] and
//!   [`AutoConfirm`].
//! - [`interrupt`] is the Ctrl-C source every wait races against.
//! - [`turn`] holds [`Session`] and [`TurnOutcome`].
//! - [`repl`] is the interactive loop.

pub mod confirm;
pub mod interrupt;
pub mod repl;
pub mod turn;

pub use confirm::{AutoConfirm, Confirm, Console, StdioConsole};
pub use interrupt::{InterruptSource, InterruptTrigger};
pub use repl::{report, run_interactive};
pub use turn::{Session, TurnMode, TurnOutcome};
