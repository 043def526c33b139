// src/generate/openai.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeneratorSettings;
use crate::generate::CommandGenerator;
use crate::generate::error::GeneratorError;
use crate::generate::prompt::SYSTEM_PROMPT;

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

impl fmt::Debug for OpenAiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiGenerator")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

impl OpenAiGenerator {
    /// Build a generator with its own HTTP client, bounded by the configured
    /// request timeout.
    pub fn new(
        settings: &GeneratorSettings,
        api_key: impl Into<String>,
    ) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self::with_client(client, settings, api_key))
    }

    /// Build a generator around an existing client.
    pub fn with_client(
        client: Client,
        settings: &GeneratorSettings,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            api_key: api_key.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `query` and return the reply text of the first choice.
    pub async fn request_command(&self, query: &str) -> Result<String, GeneratorError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, endpoint = %self.endpoint, "sending completion request");

        let mut auth = HeaderValue::try_from(format!("Bearer {}", self.api_key))
            .map_err(|e| GeneratorError::InvalidApiKey(e.to_string()))?;
        auth.set_sensitive(true);

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GeneratorError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let content = parse_completion(&text)?;
        debug!(reply = %content, "received completion");
        Ok(content)
    }
}

impl CommandGenerator for OpenAiGenerator {
    fn generate<'a>(
        &'a self,
        query: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, GeneratorError>> + Send + 'a>> {
        Box::pin(self.request_command(query))
    }
}

/// Extract the first choice's message content from a chat-completions body.
pub fn parse_completion(body: &str) -> Result<String, GeneratorError> {
    if body.trim().is_empty() {
        return Err(GeneratorError::EmptyBody);
    }

    let response: ChatResponse =
        serde_json::from_str(body).map_err(|source| GeneratorError::Decode {
            source,
            body: body.to_string(),
        })?;

    if let Some(err) = response.error {
        return Err(GeneratorError::Api(
            err.message
                .unwrap_or_else(|| "unknown error occurred".to_string()),
        ));
    }

    let choices = response.choices.ok_or(GeneratorError::MissingChoices)?;
    let choice = choices.into_iter().next().ok_or(GeneratorError::NoChoices)?;

    choice
        .message
        .and_then(|m| m.content)
        .ok_or(GeneratorError::MissingContent)
}
