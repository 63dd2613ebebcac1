//! HTTP-backed advice oracle.
//!
//! Adapter for any endpoint implementing the chat-completions wire format
//! (`/v1/chat/completions`): hosted providers and local servers alike. All
//! wire types are private to this module — callers only see
//! [`sahay_core::oracle::AdviceOracle`]. One round-trip per call, no retries;
//! the service layer owns the overall request timeout.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use sahay_core::oracle::AdviceOracle;

// ─── Config ──────────────────────────────────────────────────────────────────

/// Explicit oracle configuration, constructed at startup and injected.
/// Credentials are never read ambiently inside the adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
  pub api_base_url:    String,
  pub model:           String,
  #[serde(default = "default_temperature")]
  pub temperature:     f32,
  #[serde(default = "default_timeout_seconds")]
  pub timeout_seconds: u64,
  /// Sent as `Authorization: Bearer <key>` when present; `None` for keyless
  /// local models.
  #[serde(default)]
  pub api_key:         Option<String>,
}

fn default_temperature() -> f32 {
  0.2
}

fn default_timeout_seconds() -> u64 {
  10
}

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum OracleError {
  #[error("request failed: {0}")]
  Request(String),

  #[error("invalid response: {0}")]
  InvalidResponse(String),
}

// ─── Provider ────────────────────────────────────────────────────────────────

/// Constructed once at startup, then cheaply cloned — `reqwest::Client` is an
/// `Arc` internally.
#[derive(Debug, Clone)]
pub struct HttpAdviceOracle {
  client:       Client,
  api_base_url: String,
  model:        String,
  temperature:  f32,
  api_key:      Option<String>,
}

impl HttpAdviceOracle {
  pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
    let client = Client::builder()
      .timeout(std::time::Duration::from_secs(config.timeout_seconds))
      .build()
      .map_err(|e| OracleError::Request(format!("failed to build HTTP client: {e}")))?;

    Ok(Self {
      client,
      api_base_url: config.api_base_url,
      model: config.model,
      temperature: config.temperature,
      api_key: config.api_key,
    })
  }
}

impl AdviceOracle for HttpAdviceOracle {
  type Error = OracleError;

  async fn generate(&self, prompt: &str) -> Result<String, OracleError> {
    let payload = ChatCompletionRequest {
      model:       self.model.clone(),
      messages:    vec![Message {
        role:    "user".to_string(),
        content: prompt.to_string(),
      }],
      temperature: self.temperature,
    };

    debug!(model = %payload.model, prompt_len = prompt.len(), "sending oracle request");

    let mut req = self.client.post(&self.api_base_url).json(&payload);
    if let Some(key) = &self.api_key {
      req = req.bearer_auth(key);
    }

    let response = req.send().await.map_err(|e| {
      error!(url = %self.api_base_url, error = %e, "oracle HTTP request failed");
      OracleError::Request(e.to_string())
    })?;

    let response = check_status(response).await?;

    let parsed = response
      .json::<ChatCompletionResponse>()
      .await
      .map_err(|e| OracleError::InvalidResponse(format!("failed to parse body: {e}")))?;

    parsed
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .map(|s| s.trim().to_string())
      .filter(|s| !s.is_empty())
      .ok_or_else(|| OracleError::InvalidResponse("empty or missing content".into()))
  }
}

// ─── Private wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Message {
  role:    String,
  content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
  model:       String,
  messages:    Vec<Message>,
  temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  #[serde(default)]
  content: Option<String>,
}

// Error envelope used by OpenAI-compatible APIs.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  message: String,
}

/// Consume the response and return it if successful, or a structured error.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, OracleError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let body = response
    .text()
    .await
    .unwrap_or_else(|_| "<failed to read error body>".to_string());

  let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
    Ok(env) => format!("HTTP {status}: {}", env.error.message),
    Err(_) => format!("HTTP {status}: {body}"),
  };

  error!(%status, %message, "oracle request returned HTTP error");
  Err(OracleError::Request(message))
}
