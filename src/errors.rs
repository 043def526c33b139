// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Component-level failures have their own types close to the code that
//! produces them ([`RejectionReason`](crate::validator::RejectionReason),
//! [`ExecutionFailure`](crate::exec::ExecutionFailure),
//! [`GeneratorError`](crate::generate::GeneratorError)). `KtalkError` is what
//! the top-level plumbing (config, CLI, interactive loop) returns.

use thiserror::Error;

use crate::generate::GeneratorError;

#[derive(Error, Debug)]
pub enum KtalkError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0} environment variable is not set")]
    MissingApiKey(String),

    #[error("error when sending request to the generation service: {0}")]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, KtalkError>;
