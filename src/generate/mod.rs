// src/generate/mod.rs

//! Command generation through an OpenAI-compatible chat-completions API.
//!
//! The reply is untrusted text; it always goes through the validator before
//! anything runs.

pub mod error;
pub mod openai;
pub mod prompt;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub use error::GeneratorError;
pub use openai::OpenAiGenerator;
pub use prompt::{SYSTEM_PROMPT, prepare_query};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Source of candidate commands for a natural-language query.
pub trait CommandGenerator: Send + Sync {
    /// Return the raw reply text for `query`.
    fn generate<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, GeneratorError>> + Send + 'a>>;
}
