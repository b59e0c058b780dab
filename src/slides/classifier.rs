//! Coverage classifier: asks the LLM whether each transcript block covers a
//! slide and folds the answers into a [`CoverageStatus`](super::CoverageStatus).
//!
//! Classification never fails.  A malformed answer or a failed call becomes a
//! `none` verdict whose reason records what went wrong, so a broken LLM can
//! only make a slide look less covered, never more.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde_json::Value;

use super::record::{BlockAlignment, BlockVerdict, SlideCoverageResult, SlideRecord};
use crate::config::AlignmentConfig;
use crate::llm::{strip_code_fence, GenerationOptions, LlmClient, PromptBuilder};
use crate::text::{split_into_blocks, Language};

/// Reason attached when the LLM answers with an unknown label.
pub const INVALID_RESPONSE_REASON: &str = "Invalid response from AI";

/// Block checks in flight per slide when no limit is configured.
pub const DEFAULT_MAX_CONCURRENT_CHECKS: usize = 4;

pub struct CoverageClassifier {
    llm: Arc<dyn LlmClient>,
    block_size: usize,
    max_concurrent_checks: usize,
}

impl CoverageClassifier {
    pub fn new(llm: Arc<dyn LlmClient>, block_size: usize) -> Self {
        Self {
            llm,
            block_size: block_size.max(1),
            max_concurrent_checks: DEFAULT_MAX_CONCURRENT_CHECKS,
        }
    }

    pub fn from_config(llm: Arc<dyn LlmClient>, config: &AlignmentConfig) -> Self {
        Self::new(llm, config.block_size).with_max_concurrent_checks(config.max_concurrent_checks)
    }

    /// Cap the number of classification calls in flight at once (minimum 1).
    pub fn with_max_concurrent_checks(mut self, limit: usize) -> Self {
        self.max_concurrent_checks = limit.max(1);
        self
    }

    /// Classify every slide against the transcript, in slide order.
    ///
    /// The transcript is split into blocks once; each slide is then checked
    /// against all of them.
    pub async fn analyze_slide_by_slide_alignment(
        &self,
        slides: &[SlideRecord],
        transcript_text: &str,
        language: Language,
    ) -> Vec<SlideCoverageResult> {
        if slides.is_empty() {
            return Vec::new();
        }

        log::info!("slides: analyzing {} slides against transcript", slides.len());
        let blocks = split_into_blocks(transcript_text, self.block_size);
        log::info!("slides: transcript split into {} blocks", blocks.len());

        let mut results = Vec::with_capacity(slides.len());
        for slide in slides {
            let result = self.classify_slide(slide, &blocks, language).await;
            log::info!(
                "slides: slide {} ({}) is {:?}",
                slide.number,
                slide.title,
                result.status()
            );
            results.push(result);
        }
        results
    }

    /// Check `slide` against every block, at most `max_concurrent_checks`
    /// at a time; verdicts keep block order.
    pub async fn classify_slide(
        &self,
        slide: &SlideRecord,
        blocks: &[String],
        language: Language,
    ) -> SlideCoverageResult {
        let prompts = PromptBuilder::new(language);
        let verdicts: Vec<BlockVerdict> = stream::iter(blocks)
            .map(|block| self.check_block(&prompts, slide, block))
            .buffered(self.max_concurrent_checks)
            .collect()
            .await;
        SlideCoverageResult::new(slide.clone(), verdicts)
    }

    /// One classification call.  Never fails; see module docs.
    pub async fn check_block(
        &self,
        prompts: &PromptBuilder,
        slide: &SlideRecord,
        block: &str,
    ) -> BlockVerdict {
        let prompt = prompts.classification(&slide.title, &slide.bullets, block);
        match self
            .llm
            .generate(&prompt, &GenerationOptions::CLASSIFICATION)
            .await
        {
            Ok(raw) => parse_verdict(&raw),
            Err(e) => {
                log::error!("slides: alignment check failed: {}", e);
                BlockVerdict::new(BlockAlignment::None, format!("Error: {e}"))
            }
        }
    }
}

/// Turn raw LLM text into a verdict, downgrading anything unusable to `none`.
///
/// Only a JSON object with a known `alignment` label counts; arrays and other
/// JSON values are rejected like unknown labels.
pub fn parse_verdict(raw: &str) -> BlockVerdict {
    let value: Value = match serde_json::from_str(strip_code_fence(raw)) {
        Ok(v) => v,
        Err(e) => {
            log::error!("slides: alignment response is not valid JSON: {}", e);
            return BlockVerdict::new(BlockAlignment::None, format!("Error: {e}"));
        }
    };

    let alignment = value
        .as_object()
        .and_then(|obj| obj.get("alignment"))
        .and_then(Value::as_str)
        .and_then(BlockAlignment::from_label);

    match alignment {
        Some(alignment) => {
            let reason = value["reason"].as_str().unwrap_or_default();
            BlockVerdict::new(alignment, reason)
        }
        None => {
            log::warn!("slides: invalid alignment response: {}", raw.trim());
            BlockVerdict::new(BlockAlignment::None, INVALID_RESPONSE_REASON)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
