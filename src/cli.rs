// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `ktalk`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ktalk",
    version,
    about = "ktalk talks to your Kubernetes cluster",
    long_about = "ktalk uses an OpenAI-compatible API to generate kubectl commands from \
natural language descriptions, shows the command, and runs it once you confirm.\n\n\
If your query ends with a question mark (?), quote the query, escape the question \
mark, or end it with the placeholder word QUESTION.\n\n\
Running ktalk without a query starts interactive mode.",
    after_help = "Examples:\n  \
ktalk give me the list of containers in kube-system namespace\n  \
ktalk \"how many pods are running in the cluster?\"\n  \
ktalk how many users in the cluster QUESTION\n  \
ktalk"
)]
pub struct CliArgs {
    /// Natural-language request. Omit to enter interactive mode.
    #[arg(value_name = "QUERY", trailing_var_arg = true, allow_hyphen_values = true)]
    pub query: Vec<String>,

    /// Path to a TOML config file.
    ///
    /// Default: `ktalk/ktalk.toml` under the platform config directory, used
    /// only if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Wall-clock limit for the generated command (e.g. `30s`, `5m`).
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Model name sent to the generation service.
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,

    /// Run the validated command without asking for confirmation.
    #[arg(short = 'y', long, conflicts_with = "dry_run")]
    pub yes: bool,

    /// Print the validated command but never execute it.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `KTALK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// Interactive mode is entered when no query words were given.
    pub fn is_interactive(&self) -> bool {
        self.query.is_empty()
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
