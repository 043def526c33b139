// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod generate;
pub mod logging;
pub mod session;
pub mod validator;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default, nonzero_duration};
use crate::errors::{KtalkError, Result};
use crate::exec::ConfinedExecutor;
use crate::generate::{OpenAiGenerator, prepare_query};
use crate::session::{
    AutoConfirm, InterruptSource, Session, StdioConsole, TurnMode, report, run_interactive,
};
use crate::validator::CommandValidator;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - the API key lookup (the only environment read besides logging)
/// - generator / validator / executor
/// - one-shot or interactive mode
///
/// Returns `false` when a one-shot request did not end well (rejected
/// command, non-zero exit, timeout, ...), so the caller can exit non-zero.
pub async fn run(args: CliArgs) -> Result<bool> {
    let cfg = resolve_config(&args)?;
    let api_key = api_key_from_env(&cfg.generator.api_key_env)?;

    info!(
        program = %cfg.validator.program,
        model = %cfg.generator.model,
        timeout_ms = cfg.executor.timeout.as_millis() as u64,
        "configuration resolved"
    );

    let generator = OpenAiGenerator::new(&cfg.generator, api_key)?;
    let validator = CommandValidator::new(cfg.validator.program.clone());
    let executor = ConfinedExecutor::from_settings(&cfg.executor);
    let mode = if args.dry_run {
        TurnMode::DryRun
    } else {
        TurnMode::Execute
    };

    let mut session = Session::new(generator, validator, executor)
        .with_mode(mode)
        .with_interrupts(InterruptSource::CtrlC);
    let mut console = StdioConsole::stdio();

    if args.is_interactive() {
        run_interactive(&mut session, &mut console, args.yes).await?;
        return Ok(true);
    }

    let query = prepare_query(&args.query);
    debug!(%query, "one-shot request");

    let outcome = if args.yes {
        session.run_turn(&query, &mut AutoConfirm::default()).await?
    } else {
        session.run_turn(&query, &mut console).await?
    };
    report(&outcome);

    Ok(!outcome.is_failure())
}

/// Load the config file (explicit or default) and apply CLI overrides.
pub fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut cfg = load_or_default(args.config.as_deref())?;
    apply_cli_overrides(&mut cfg, args)?;
    Ok(cfg)
}

/// CLI flags take precedence over file values.
pub fn apply_cli_overrides(cfg: &mut ConfigFile, args: &CliArgs) -> Result<()> {
    if let Some(ref timeout) = args.timeout {
        cfg.executor.timeout = nonzero_duration("--timeout", timeout)?;
    }
    if let Some(ref model) = args.model {
        let model = model.trim();
        if model.is_empty() {
            return Err(KtalkError::ConfigError("--model must not be empty".to_string()));
        }
        cfg.generator.model = model.to_string();
    }
    Ok(())
}

/// Read the API key from the named environment variable.
pub fn api_key_from_env(var: &str) -> Result<String> {
    api_key_from(var, |name| std::env::var(name).ok())
}

/// Look up the API key through `lookup`; unset or blank is an error.
pub fn api_key_from<F>(var: &str, lookup: F) -> Result<String>
where
    F: FnOnce(&str) -> Option<String>,
{
    lookup(var)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| KtalkError::MissingApiKey(var.to_string()))
}
