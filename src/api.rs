//! LLM completion boundary.
//!
//! The summarizer talks to the model only through [`AskAsync`], so tests can
//! substitute a scripted implementation. [`OpenAiClient`] is the production
//! implementation: one `POST` to an OpenAI-compatible chat completions endpoint
//! per call, no retries.

use crate::error::BoundaryError;
use crate::utils::truncate_for_log;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Trait for async LLM interaction.
///
/// Implementors send a single user prompt and return the model's reply text.
pub trait AskAsync {
    async fn ask(&self, prompt: &str) -> Result<String, BoundaryError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat completions client for an OpenAI-compatible API.
pub struct OpenAiClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("url", &self.url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl AskAsync for OpenAiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<String, BoundaryError> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            %status,
            "Completion request finished"
        );

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| truncate_for_log(&body, 300));
            warn!(%status, error = %message, "Completion API returned an error");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BoundaryError::Auth(message),
                _ => BoundaryError::upstream(Some(status.as_u16()), message),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| BoundaryError::upstream(Some(status.as_u16()), e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BoundaryError::upstream(None, "completion returned no text"))
    }
}
