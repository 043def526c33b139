// src/session/repl.rs

//! Interactive mode: one request per input line.

use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::debug;

use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::generate::{CommandGenerator, prepare_query};
use crate::session::confirm::{AutoConfirm, Console};
use crate::session::turn::{Session, TurnOutcome};

const PROMPT: &str = "\nktalk> ";

/// Read requests from `console` until `exit`, `quit`, EOF or Ctrl-C.
///
/// A failing turn is reported and the loop continues. Returns the outcomes
/// of all turns in order.
pub async fn run_interactive<G, E, R, W>(
    session: &mut Session<G, E>,
    console: &mut Console<R, W>,
    auto_confirm: bool,
) -> Result<Vec<TurnOutcome>>
where
    G: CommandGenerator,
    E: ExecutorBackend,
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    console
        .print("Entering interactive mode. Type 'exit' or 'quit' to exit.\n")
        .await?;

    let mut outcomes = Vec::new();
    loop {
        console.print(PROMPT).await?;

        let line = tokio::select! {
            line = console.read_line() => line?,
            _ = session.interrupts().wait() => None,
        };

        let Some(line) = line else {
            debug!("end of interactive input");
            console.print("\n").await?;
            break;
        };

        let input = line.trim();
        if input == "exit" || input == "quit" {
            console.print("Exiting interactive mode.\n").await?;
            break;
        }
        if input.is_empty() {
            continue;
        }

        let query = prepare_query(&[input]);
        let turn = if auto_confirm {
            session.run_turn(&query, &mut AutoConfirm::default()).await
        } else {
            session.run_turn(&query, console).await
        };

        match turn {
            Ok(outcome) => {
                report(&outcome);
                outcomes.push(outcome);
            }
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    Ok(outcomes)
}

/// Print a one-line summary of a turn. Dry-run commands go to stdout so they
/// can be captured; everything else goes to stderr.
pub fn report(outcome: &TurnOutcome) {
    match outcome {
        TurnOutcome::DryRun(cmd) => println!("{cmd}"),
        TurnOutcome::Executed { result, .. } if result.is_success() => {}
        other => eprintln!("{other}"),
    }
}
