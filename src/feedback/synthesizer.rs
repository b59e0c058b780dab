//! Feedback synthesizer: one LLM call that turns metrics and alignment into
//! strengths, improvements and section tips.
//!
//! Unlike remediation there is no canned fallback here.  A bad answer is an
//! error the caller has to report.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alignment::AlignmentResult;
use crate::llm::{
    strip_code_fence, GenerationOptions, LlmClient, LlmError, PromptBuilder, RetryError,
    RetryPolicy,
};
use crate::metrics::SpeechMetrics;
use crate::text::Language;
use crate::transcript::Transcript;

/// Entries kept per feedback list.
pub const MAX_FEEDBACK_ITEMS: usize = 3;

// ---------------------------------------------------------------------------
// FeedbackError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum FeedbackError {
    /// The model answered, but not with the JSON object we asked for.
    #[error("LLM returned invalid structured output: {reason}")]
    InvalidStructuredOutput { reason: String, raw: String },

    /// The model could not be reached, or kept rate-limiting us.
    #[error("LLM service unavailable after {attempts} attempt(s): {reason}")]
    UpstreamUnavailable { attempts: u32, reason: String },
}

impl From<RetryError> for FeedbackError {
    fn from(e: RetryError) -> Self {
        match e {
            RetryError::Exhausted { attempts, last } => FeedbackError::UpstreamUnavailable {
                attempts,
                reason: last.to_string(),
            },
            RetryError::Fatal {
                error: LlmError::Parse { reason, body },
                ..
            } => FeedbackError::InvalidStructuredOutput {
                reason: format!("failed to parse LLM response: {reason}"),
                raw: body,
            },
            RetryError::Fatal {
                error: LlmError::EmptyResponse,
                ..
            } => FeedbackError::InvalidStructuredOutput {
                reason: LlmError::EmptyResponse.to_string(),
                raw: String::new(),
            },
            RetryError::Fatal { attempts, error } => FeedbackError::UpstreamUnavailable {
                attempts,
                reason: error.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackTip {
    pub section: String,
    pub tip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub tips: Vec<FeedbackTip>,
    pub ethical_note: String,
}

/// Disclaimer attached to every report.
pub fn ethical_note(language: Language) -> &'static str {
    match language {
        Language::English => {
            "This is a presentation feedback tool. Not a psychological evaluation."
        }
        Language::Turkish => {
            "Bu bir sunum geri bildirim aracıdır. Psikolojik değerlendirme değildir."
        }
    }
}

#[derive(Debug, Deserialize)]
struct FeedbackResponse {
    strengths: Option<Vec<String>>,
    improvements: Option<Vec<String>>,
    tips: Option<Vec<FeedbackTip>>,
}

/// Parse and validate a raw model answer.
pub fn parse_feedback(raw: &str, language: Language) -> Result<Feedback, FeedbackError> {
    let invalid = |reason: String| FeedbackError::InvalidStructuredOutput {
        reason,
        raw: raw.to_string(),
    };

    let response: FeedbackResponse =
        serde_json::from_str(strip_code_fence(raw)).map_err(|e| invalid(e.to_string()))?;

    let (Some(mut strengths), Some(mut improvements), Some(mut tips)) =
        (response.strengths, response.improvements, response.tips)
    else {
        return Err(invalid("missing required fields in LLM response".into()));
    };

    strengths.truncate(MAX_FEEDBACK_ITEMS);
    improvements.truncate(MAX_FEEDBACK_ITEMS);
    tips.truncate(MAX_FEEDBACK_ITEMS);

    Ok(Feedback {
        strengths,
        improvements,
        tips,
        ethical_note: ethical_note(language).to_string(),
    })
}

// ---------------------------------------------------------------------------
// FeedbackSynthesizer
// ---------------------------------------------------------------------------

pub struct FeedbackSynthesizer {
    llm: Arc<dyn LlmClient>,
    retry: RetryPolicy,
}

impl FeedbackSynthesizer {
    pub fn new(llm: Arc<dyn LlmClient>, retry: RetryPolicy) -> Self {
        Self { llm, retry }
    }

    pub async fn synthesize(
        &self,
        outline_text: &str,
        transcript: &Transcript,
        metrics: &SpeechMetrics,
        alignment: &AlignmentResult,
    ) -> Result<Feedback, FeedbackError> {
        let language = Language::detect(outline_text, &transcript.text);
        log::info!("feedback: detected language {}", language);

        let prompt =
            PromptBuilder::new(language).feedback(outline_text, &transcript.text, metrics, alignment);

        log::info!("feedback: generating feedback");
        let llm = &self.llm;
        let prompt = prompt.as_str();
        let raw = self
            .retry
            .run(|attempt| {
                log::debug!("feedback: attempt {}", attempt);
                llm.generate(prompt, &GenerationOptions::FEEDBACK)
            })
            .await?;

        match parse_feedback(&raw, language) {
            Ok(feedback) => {
                log::info!("feedback: generated successfully");
                Ok(feedback)
            }
            Err(e) => {
                log::error!("feedback: {}", e);
                log::error!("feedback: response was: {}", raw);
                Err(e)
            }
        }
    }

    /// Same as [`synthesize`](Self::synthesize).
    pub async fn generate_feedback(
        &self,
        outline_text: &str,
        transcript: &Transcript,
        metrics: &SpeechMetrics,
        alignment: &AlignmentResult,
    ) -> Result<Feedback, FeedbackError> {
        self.synthesize(outline_text, transcript, metrics, alignment)
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
