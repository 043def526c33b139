// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::exec::DEFAULT_STDERR_TAIL_BYTES;
use crate::generate::{DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::validator::DEFAULT_PROGRAM;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [validator]
/// program = "kubectl"
///
/// [executor]
/// timeout = "5m"
/// stderr_tail_bytes = 4096
///
/// [generator]
/// endpoint = "https://api.openai.com/v1/chat/completions"
/// model = "gpt-3.5-turbo"
/// max_tokens = 150
/// api_key_env = "OPENAI_API_KEY"
/// request_timeout = "60s"
/// ```
///
/// All sections are optional and have reasonable defaults. This is the
/// unchecked shape; convert it with `ConfigFile::try_from`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub validator: ValidatorSection,

    #[serde(default)]
    pub executor: ExecutorSection,

    #[serde(default)]
    pub generator: GeneratorSection,
}

/// `[validator]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorSection {
    /// The only program a generated command may invoke.
    #[serde(default = "default_program")]
    pub program: String,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

impl Default for ValidatorSection {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

/// `[executor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorSection {
    /// Duration string (e.g. `"5m"`) after which the child is killed.
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// How many trailing bytes of the child's stderr to keep for reporting.
    #[serde(default = "default_stderr_tail_bytes")]
    pub stderr_tail_bytes: usize,
}

fn default_timeout() -> String {
    "5m".to_string()
}

fn default_stderr_tail_bytes() -> usize {
    DEFAULT_STDERR_TAIL_BYTES
}

impl Default for ExecutorSection {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            stderr_tail_bytes: default_stderr_tail_bytes(),
        }
    }
}

/// `[generator]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSection {
    /// Chat-completions URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Duration string bounding a single HTTP request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_request_timeout() -> String {
    "60s".to_string()
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Validated configuration with parsed durations.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub validator: ValidatorSection,
    pub executor: ExecutorSettings,
    pub generator: GeneratorSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorSettings {
    pub timeout: Duration,
    pub stderr_tail_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_key_env: String,
    pub request_timeout: Duration,
}

impl ConfigFile {
    /// Assemble a config from already-validated parts.
    pub(crate) fn new_unchecked(
        validator: ValidatorSection,
        executor: ExecutorSettings,
        generator: GeneratorSettings,
    ) -> Self {
        Self {
            validator,
            executor,
            generator,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let defaults = GeneratorSection::default();
        Self {
            validator: ValidatorSection::default(),
            executor: ExecutorSettings {
                timeout: crate::exec::DEFAULT_TIMEOUT,
                stderr_tail_bytes: DEFAULT_STDERR_TAIL_BYTES,
            },
            generator: GeneratorSettings {
                endpoint: defaults.endpoint,
                model: defaults.model,
                max_tokens: defaults.max_tokens,
                api_key_env: defaults.api_key_env,
                request_timeout: crate::generate::DEFAULT_REQUEST_TIMEOUT,
            },
        }
    }
}
