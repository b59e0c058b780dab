//! Session analyzer: drives one practice session through the full
//! metrics → alignment → feedback → slides → remediation flow.
//!
//! # Pipeline flow
//!
//! ```text
//! SessionInput
//!   └─▶ validate outline length                  [OutlineTooShort]
//!         └─▶ calculate_metrics(transcript)
//!               └─▶ SimilarityMatcher::align     [Alignment error]
//!                     └─▶ FeedbackSynthesizer    [Feedback error]
//!                           └─▶ (slides?) CoverageClassifier
//!                                 └─▶ RemediationGenerator
//! ```
//!
//! Slide classification and remediation degrade locally and never fail the
//! session; everything before them does.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alignment::{
    get_coverage_summary, AlignmentError, AlignmentResult, AlignmentSummary, SimilarityMatcher,
};
use crate::config::{AppConfig, MetricsConfig};
use crate::embedding::EmbeddingProvider;
use crate::feedback::{Feedback, FeedbackError, FeedbackSynthesizer};
use crate::llm::{LlmClient, RetryPolicy};
use crate::metrics::{calculate_metrics, MetricsError, SpeechMetrics};
use crate::slides::{
    CoverageClassifier, RemediationGenerator, SlideBySlideAlignment, SlideInput, SlideRecord,
};
use crate::text::Language;
use crate::transcript::Transcript;

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that end a session analysis.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("outline text too short (minimum {min_chars} characters, got {got})")]
    OutlineTooShort { min_chars: usize, got: usize },

    #[error("failed to calculate speech metrics: {0}")]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    #[error(transparent)]
    Feedback(#[from] FeedbackError),
}

/// Coarse failure category a caller can map to a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    Embedding,
    UpstreamUnavailable,
    InvalidStructuredOutput,
}

impl FailureKind {
    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::InvalidInput => {
                "Outline text too short or file extraction failed"
            }
            FailureKind::Embedding => "Could not compare the transcript with the outline",
            FailureKind::UpstreamUnavailable => {
                "AI service is temporarily unavailable, please try again later"
            }
            FailureKind::InvalidStructuredOutput => "AI service returned an unreadable response",
        }
    }
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::OutlineTooShort { .. } | PipelineError::Metrics(_) => {
                FailureKind::InvalidInput
            }
            PipelineError::Alignment(_) => FailureKind::Embedding,
            PipelineError::Feedback(FeedbackError::UpstreamUnavailable { .. }) => {
                FailureKind::UpstreamUnavailable
            }
            PipelineError::Feedback(FeedbackError::InvalidStructuredOutput { .. }) => {
                FailureKind::InvalidStructuredOutput
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Input / report
// ---------------------------------------------------------------------------

/// Everything the caller knows about one practice session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionInput {
    pub outline_text: String,
    pub transcript: Transcript,
    /// Structured slides, when the outline came from a deck.
    #[serde(default)]
    pub slides: Option<Vec<SlideInput>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub transcript: Transcript,
    pub metrics: SpeechMetrics,
    pub alignment: AlignmentResult,
    pub alignment_summary: AlignmentSummary,
    pub feedback: Feedback,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide_alignment: Option<SlideBySlideAlignment>,
}

// ---------------------------------------------------------------------------
// SessionAnalyzer
// ---------------------------------------------------------------------------

/// Runs the whole analysis for one session.
///
/// Collaborators are injected once at construction and shared by every
/// stage, so one analyzer can serve many sessions.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use presentation_coach::config::AppConfig;
/// use presentation_coach::embedding::ApiEmbedder;
/// use presentation_coach::llm::ApiLlmClient;
/// use presentation_coach::pipeline::{SessionAnalyzer, SessionInput};
///
/// # async fn example(input: SessionInput) {
/// let config = AppConfig::default();
/// let analyzer = SessionAnalyzer::new(
///     Arc::new(ApiEmbedder::from_config(&config.embedding)),
///     Arc::new(ApiLlmClient::from_config(&config.llm)),
///     &config,
/// );
/// match analyzer.analyze(&input).await {
///     Ok(report) => println!("{} WPM", report.metrics.wpm),
///     Err(e) => eprintln!("{}", e.kind().user_message()),
/// }
/// # }
/// ```
pub struct SessionAnalyzer {
    matcher: SimilarityMatcher,
    classifier: CoverageClassifier,
    remediation: RemediationGenerator,
    feedback: FeedbackSynthesizer,
    metrics: MetricsConfig,
    min_outline_chars: usize,
}

impl SessionAnalyzer {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmClient>,
        config: &AppConfig,
    ) -> Self {
        Self {
            matcher: SimilarityMatcher::new(embedder, config.alignment.similarity_threshold),
            classifier: CoverageClassifier::from_config(Arc::clone(&llm), &config.alignment),
            remediation: RemediationGenerator::new(Arc::clone(&llm)),
            feedback: FeedbackSynthesizer::new(llm, RetryPolicy::from_config(&config.retry)),
            metrics: config.metrics.clone(),
            min_outline_chars: config.alignment.min_outline_chars,
        }
    }

    pub async fn analyze(&self, input: &SessionInput) -> Result<AnalysisReport, PipelineError> {
        // ── 1. Validate ──────────────────────────────────────────────────
        let got = input.outline_text.trim().chars().count();
        if got < self.min_outline_chars {
            log::warn!("pipeline: outline too short ({} chars)", got);
            return Err(PipelineError::OutlineTooShort {
                min_chars: self.min_outline_chars,
                got,
            });
        }

        let transcript = &input.transcript;
        log::info!(
            "pipeline: analyzing session ({} segments, {:.1}s)",
            transcript.segments.len(),
            transcript.duration
        );

        // ── 2. Metrics ───────────────────────────────────────────────────
        let metrics = calculate_metrics(transcript, &self.metrics)?;

        // ── 3. Outline alignment ─────────────────────────────────────────
        let alignment = self
            .matcher
            .align_transcript_to_outline(transcript, &input.outline_text)
            .await?;
        let alignment_summary = get_coverage_summary(&alignment);

        // ── 4. Feedback ──────────────────────────────────────────────────
        let feedback = self
            .feedback
            .synthesize(&input.outline_text, transcript, &metrics, &alignment)
            .await?;

        // ── 5. Slides (optional) ─────────────────────────────────────────
        let slide_alignment = match &input.slides {
            Some(slides) => Some(self.analyze_slides(slides, input).await),
            None => None,
        };

        log::info!("pipeline: analysis complete");
        Ok(AnalysisReport {
            transcript: transcript.clone(),
            metrics,
            alignment,
            alignment_summary,
            feedback,
            slide_alignment,
        })
    }

    async fn analyze_slides(
        &self,
        slides: &[SlideInput],
        input: &SessionInput,
    ) -> SlideBySlideAlignment {
        let language = Language::detect(&input.outline_text, &input.transcript.text);
        let records = SlideRecord::from_inputs(slides.to_vec());

        let results = self
            .classifier
            .analyze_slide_by_slide_alignment(&records, &input.transcript.text, language)
            .await;
        let results = self
            .remediation
            .generate_talking_points_batch(results, language)
            .await;

        SlideBySlideAlignment::new(results, language)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
