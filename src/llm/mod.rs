//! LLM access for slide classification, talking points and feedback.
//!
//! This module provides:
//! * [`LlmClient`]: async trait implemented by all completion backends.
//! * [`ApiLlmClient`]: OpenAI-compatible chat-completions client.
//! * [`RetryPolicy`]: exponential backoff for rate-limited calls.
//! * [`PromptBuilder`]: builds English/Turkish JSON-answer prompts.
//! * [`LlmError`]: error variants for LLM operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use presentation_coach::config::AppConfig;
//! use presentation_coach::llm::{ApiLlmClient, GenerationOptions, LlmClient, PromptBuilder};
//! use presentation_coach::text::Language;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let client = ApiLlmClient::from_config(&config.llm);
//!
//!     let prompt = PromptBuilder::new(Language::English)
//!         .talking_points("Pricing", "Three tiers; annual discount");
//!     let raw = client
//!         .generate(&prompt, &GenerationOptions::TALKING_POINTS)
//!         .await
//!         .unwrap();
//!     println!("{}", raw);
//! }
//! ```

pub mod client;
pub mod prompt;
pub mod retry;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{strip_code_fence, ApiLlmClient, GenerationOptions, LlmClient, LlmError};
pub use prompt::PromptBuilder;
pub use retry::{RetryError, RetryPolicy};

#[cfg(test)]
pub use client::MockLlmClient;
