/// AI Gateway Client — the single point of entry for all model calls in SmartCV.
///
/// ARCHITECTURAL RULE: No other module may call the AI gateway directly.
/// All model interactions MUST go through this module.
///
/// Model: google/gemini-2.5-flash (hardcoded — do not make configurable to prevent drift)
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

pub mod extract;

pub use extract::ExtractError;

const GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
/// The model used for all analysis calls in SmartCV.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "google/gemini-2.5-flash";

/// Failure taxonomy of a single gateway call. No automatic retry is performed
/// at this layer: 429 is surfaced with retryable semantics and the caller
/// decides whether to re-invoke.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit exceeded, please try again later.")]
    RateLimited,

    #[error("Payment required.")]
    PaymentRequired,

    #[error("AI gateway returned status {status}")]
    Upstream { status: u16 },

    #[error("No response from AI")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Extracts the text content of the first choice, if any.
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
    }
}

/// The single gateway client shared by all handlers.
/// Wraps one chat-completion endpoint with a fixed model identifier.
#[derive(Clone)]
pub struct AiClient {
    client: Client,
    api_key: String,
}

impl AiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Sends one {system, user} message pair and returns the raw text of the
    /// first choice. Each distinct failure mode maps to its own
    /// `GatewayError` variant; the upstream body is logged, never returned.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, GatewayError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post(GATEWAY_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(GatewayError::RateLimited);
        }
        if status.as_u16() == 402 {
            return Err(GatewayError::PaymentRequired);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body_len = body.len(), "AI gateway error");
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed.first_content().ok_or(GatewayError::EmptyContent)?;

        debug!(content_len = content.len(), "AI gateway call succeeded");

        Ok(content)
    }
}
