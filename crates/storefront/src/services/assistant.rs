//! Chat assistant client.
//!
//! Each [`AssistantClient::ask`] sends one fresh request with no retry.
//! Failures never reach the caller as errors: they degrade to a fixed
//! apology. Dropping the future cancels only that request.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::AssistantConfig;

/// Reply used when the request or its response fails.
pub const APOLOGY: &str = "Something went wrong. Try again.";

/// Reply used when the response carries no text.
pub const NO_ANSWER: &str = "I'm not sure how to respond to that.";

/// Greeting shown when the chat opens.
pub const GREETING: &str = "Hello! How can I help you today?";

/// Errors that can occur when calling the assistant API.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured endpoint is not a URL.
    #[error("Invalid assistant URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

fn prompt(message: &str) -> String {
    format!("You are a helpful assistant for our website. Please answer: {message}")
}

/// Chat assistant API client.
#[derive(Clone)]
pub struct AssistantClient {
    client: reqwest::Client,
    url: Url,
    api_key: Option<SecretString>,
}

impl AssistantClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not a URL or the HTTP client fails
    /// to build.
    pub fn new(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            url: Url::parse(&config.url)?,
            api_key: config.api_key.clone(),
        })
    }

    /// Whether an API key is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask the assistant a question.
    ///
    /// Returns `None` without sending anything when the message is blank or
    /// no API key is configured. Otherwise returns the reply text, or
    /// [`APOLOGY`] if anything went wrong.
    #[tracing::instrument(skip(self, message), fields(len = message.len()))]
    pub async fn ask(&self, message: &str) -> Option<String> {
        let message = message.trim();
        let api_key = self.api_key.as_ref()?;
        if message.is_empty() {
            return None;
        }

        match self.generate(api_key, message).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::warn!(error = %e, "Assistant request failed");
                Some(APOLOGY.to_string())
            }
        }
    }

    async fn generate(&self, api_key: &SecretString, message: &str) -> Result<String, AssistantError> {
        let text = prompt(message);
        let body = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: &text }],
            }],
        };

        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("key", api_key.expose_secret());

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateResponse = response.json().await?;
        Ok(reply.first_text().unwrap_or_else(|| NO_ANSWER.to_string()))
    }
}

impl std::fmt::Debug for AssistantClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantClient")
            .field("url", &self.url.as_str())
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}
