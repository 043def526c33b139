// src/config/validate.rs

use std::time::Duration;

use crate::config::duration::parse_duration;
use crate::config::model::{
    ConfigFile, ExecutorSettings, GeneratorSettings, RawConfigFile,
};
use crate::errors::{KtalkError, Result};
use crate::exec::MAX_STDERR_TAIL_BYTES;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = KtalkError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_program(&raw.validator.program)?;

        let executor = ExecutorSettings {
            timeout: nonzero_duration("[executor].timeout", &raw.executor.timeout)?,
            stderr_tail_bytes: validate_tail_bytes(raw.executor.stderr_tail_bytes)?,
        };

        let generator = GeneratorSettings {
            endpoint: validate_endpoint(&raw.generator.endpoint)?,
            model: non_empty("[generator].model", &raw.generator.model)?,
            max_tokens: validate_max_tokens(raw.generator.max_tokens)?,
            api_key_env: non_empty("[generator].api_key_env", &raw.generator.api_key_env)?,
            request_timeout: nonzero_duration(
                "[generator].request_timeout",
                &raw.generator.request_timeout,
            )?,
        };

        Ok(ConfigFile::new_unchecked(raw.validator, executor, generator))
    }
}

fn validate_program(program: &str) -> Result<()> {
    if program.is_empty() {
        return Err(KtalkError::ConfigError(
            "[validator].program must not be empty".to_string(),
        ));
    }
    if program.chars().any(char::is_whitespace) {
        return Err(KtalkError::ConfigError(format!(
            "[validator].program must be a single word (got '{}')",
            program
        )));
    }
    Ok(())
}

/// Parse a duration field and reject zero, which would kill every command
/// before it starts.
pub fn nonzero_duration(field: &str, value: &str) -> Result<Duration> {
    let parsed = parse_duration(value)
        .map_err(|e| KtalkError::ConfigError(format!("{field}: {e}")))?;
    if parsed.is_zero() {
        return Err(KtalkError::ConfigError(format!(
            "{field} must be greater than zero (got '{value}')"
        )));
    }
    Ok(parsed)
}

fn validate_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(KtalkError::ConfigError(format!(
            "[generator].endpoint must be an http(s) URL (got '{}')",
            endpoint
        )));
    }
    Ok(endpoint.to_string())
}

fn validate_tail_bytes(bytes: usize) -> Result<usize> {
    if bytes > MAX_STDERR_TAIL_BYTES {
        return Err(KtalkError::ConfigError(format!(
            "[executor].stderr_tail_bytes must be <= {MAX_STDERR_TAIL_BYTES} (got {bytes})"
        )));
    }
    Ok(bytes)
}

fn validate_max_tokens(max_tokens: u32) -> Result<u32> {
    if max_tokens == 0 {
        return Err(KtalkError::ConfigError(
            "[generator].max_tokens must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(max_tokens)
}

fn non_empty(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(KtalkError::ConfigError(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}
