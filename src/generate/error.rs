// src/generate/error.rs

use thiserror::Error;

/// Failure talking to the generation service or understanding its reply.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned non-success status code {status}, body: {body}")]
    Status { status: u16, body: String },

    #[error("received empty response from API")]
    EmptyBody,

    #[error("failed to decode API response: {source}, body: {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("API key is not a valid header value: {0}")]
    InvalidApiKey(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("invalid response format: missing choices field")]
    MissingChoices,

    #[error("invalid response format: empty choices array")]
    NoChoices,

    #[error("invalid response format: missing content field in message")]
    MissingContent,
}
