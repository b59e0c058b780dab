//! Core `LlmClient` trait and `ApiLlmClient` implementation.
//!
//! `ApiLlmClient` calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! (Ollama in OpenAI mode, OpenAI, Groq, LM Studio, vLLM, ...).  All
//! connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur during a completion request.
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The provider rejected the request for rate-limit or quota reasons.
    #[error("LLM rate limit or quota exhausted: {0}")]
    RateLimited(String),

    /// Any other non-success HTTP status.
    #[error("LLM service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The HTTP response could not be parsed as the expected envelope.
    /// `body` keeps the raw response text for diagnostics.
    #[error("failed to parse LLM response: {reason}")]
    Parse { reason: String, body: String },

    /// The LLM returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl LlmError {
    /// `true` for errors worth retrying with backoff.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LlmError::RateLimited(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationOptions
// ---------------------------------------------------------------------------

/// Sampling settings for one completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the provider for a JSON object response.
    pub structured_output: bool,
}

impl GenerationOptions {
    /// Low temperature for consistent block classification.
    pub const CLASSIFICATION: Self = Self {
        temperature: 0.1,
        max_tokens: 200,
        structured_output: true,
    };

    pub const TALKING_POINTS: Self = Self {
        temperature: 0.5,
        max_tokens: 500,
        structured_output: true,
    };

    pub const FEEDBACK: Self = Self {
        temperature: 0.3,
        max_tokens: 8192,
        structured_output: true,
    };
}

// ---------------------------------------------------------------------------
// LlmClient trait
// ---------------------------------------------------------------------------

/// Async trait for text generation.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn LlmClient>`).
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerationOptions)
        -> Result<String, LlmError>;
}

/// Strip a surrounding Markdown code fence (```` ```json ... ``` ````) if
/// present; otherwise return the trimmed text.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

// ---------------------------------------------------------------------------
// ApiLlmClient
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// The `Authorization: Bearer …` header is attached only when
/// `config.api_key` is a non-empty string.
pub struct ApiLlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl ApiLlmClient {
    /// Build an `ApiLlmClient` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`; a default client is used if the builder fails.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, prompt: &str, options: &GenerationOptions) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "stream":      false,
            "temperature": options.temperature,
            "max_tokens":  options.max_tokens
        });
        if options.structured_output {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }
        body
    }
}

#[async_trait]
impl LlmClient for ApiLlmClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        let mut req = self
            .client
            .post(self.endpoint())
            .json(&self.request_body(prompt, options));

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                LlmError::RateLimited(body)
            } else {
                LlmError::Status {
                    status: status.as_u16(),
                    body,
                }
            });
        }

        let body = response.text().await?;
        completion_content(&body)
    }
}

/// Pull `choices[0].message.content` out of a chat-completions body.
fn completion_content(body: &str) -> Result<String, LlmError> {
    let parse_error = |reason: String| LlmError::Parse {
        reason,
        body: body.to_string(),
    };

    let json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| parse_error(e.to_string()))?;

    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| parse_error("missing choices[0].message.content".into()))?
        .trim()
        .to_string();

    if content.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(content)
}

// ---------------------------------------------------------------------------
// MockLlmClient  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
type Responder = Box<dyn Fn(&str) -> Result<String, LlmError> + Send + Sync>;

/// A test double that answers from a closure and records every prompt.
#[cfg(test)]
pub struct MockLlmClient {
    respond: Responder,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockLlmClient {
    pub fn from_fn(
        respond: impl Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Always answer `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::from_fn(move |_| Ok(text.clone()))
    }

    /// Always answer `Err(error)`.
    pub fn err(error: LlmError) -> Self {
        Self::from_fn(move |_| Err(error.clone()))
    }

    /// Answer with `responses` in order; the last one repeats.
    pub fn sequence(responses: Vec<Result<String, LlmError>>) -> Self {
        let queue = std::sync::Mutex::new(std::collections::VecDeque::from(responses));
        Self::from_fn(move |_| {
            let mut q = queue.lock().unwrap();
            if q.len() > 1 {
                q.pop_front().unwrap()
            } else {
                q.front().cloned().unwrap_or(Err(LlmError::EmptyResponse))
            }
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.respond)(prompt)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
