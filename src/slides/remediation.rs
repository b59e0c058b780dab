//! Remediation generator: suggested talking points for slides the speaker
//! skipped or only touched on.
//!
//! Like the coverage classifier this never returns an error.  When the LLM
//! fails or answers with fewer than two suggestions, a fixed list of generic
//! prompts in the session language is returned instead.

use std::sync::Arc;

use futures::future::join_all;
use serde::Deserialize;

use super::record::{SlideCoverageResult, SlideRecord};
use crate::llm::{strip_code_fence, GenerationOptions, LlmClient, PromptBuilder};
use crate::text::Language;

/// Fewer suggestions than this and the response is replaced.
pub const MIN_TALKING_POINTS: usize = 2;
/// Suggestions beyond this are dropped.
pub const MAX_TALKING_POINTS: usize = 3;

/// Which canned list to fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The LLM answered, but with too few suggestions.
    InvalidResponse,
    /// The call failed or the answer could not be parsed.
    Failed,
}

/// Generic talking points used when the LLM cannot supply real ones.
pub fn fallback_talking_points(language: Language, fallback: Fallback) -> Vec<String> {
    let points: [&str; 3] = match (fallback, language) {
        (Fallback::InvalidResponse, Language::English) => [
            "Focus on the key message of this slide.",
            "Explain why this topic matters to your audience.",
            "Connect this point to your overall presentation theme.",
        ],
        (Fallback::InvalidResponse, Language::Turkish) => [
            "Bu slaydın ana mesajına odaklanın.",
            "Bu konunun neden önemli olduğunu açıklayın.",
            "Bu noktayı genel sunum temanızla ilişkilendirin.",
        ],
        (Fallback::Failed, Language::English) => [
            "Address the main topic clearly and concisely.",
            "Provide specific examples or evidence.",
            "Explain the relevance to your audience.",
        ],
        (Fallback::Failed, Language::Turkish) => [
            "Ana konuyu net ve öz bir şekilde ele alın.",
            "Spesifik örnekler veya kanıtlar sunun.",
            "Dinleyicileriniz için önemini açıklayın.",
        ],
    };
    points.iter().map(|p| p.to_string()).collect()
}

#[derive(Debug, Deserialize)]
struct TalkingPointsResponse {
    #[serde(default)]
    talking_points: Vec<String>,
}

pub struct RemediationGenerator {
    llm: Arc<dyn LlmClient>,
}

impl RemediationGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Two or three suggested sentences for `slide`.  Never fails.
    pub async fn generate_talking_points(
        &self,
        slide: &SlideRecord,
        language: Language,
    ) -> Vec<String> {
        let prompt = PromptBuilder::new(language).talking_points(&slide.title, &slide.bullets);
        let raw = match self
            .llm
            .generate(&prompt, &GenerationOptions::TALKING_POINTS)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                log::error!("remediation: talking points generation failed: {}", e);
                return fallback_talking_points(language, Fallback::Failed);
            }
        };

        let mut points = match serde_json::from_str::<TalkingPointsResponse>(strip_code_fence(&raw))
        {
            Ok(response) => response.talking_points,
            Err(e) => {
                log::error!("remediation: talking points response is not valid JSON: {}", e);
                return fallback_talking_points(language, Fallback::Failed);
            }
        };

        if points.len() < MIN_TALKING_POINTS {
            log::warn!(
                "remediation: only {} talking points for slide {}, using defaults",
                points.len(),
                slide.number
            );
            return fallback_talking_points(language, Fallback::InvalidResponse);
        }

        points.truncate(MAX_TALKING_POINTS);
        points
    }

    /// Fill in talking points for every slide that needs them.  Covered
    /// slides pass through untouched; order is preserved.
    pub async fn generate_talking_points_batch(
        &self,
        mut results: Vec<SlideCoverageResult>,
        language: Language,
    ) -> Vec<SlideCoverageResult> {
        log::info!("remediation: generating talking points for slides needing suggestions");

        let pending = results.iter().map(|result| async move {
            if result.needs_suggestion() {
                log::info!(
                    "remediation: slide {} ({})",
                    result.slide().number,
                    result.slide().title
                );
                Some(self.generate_talking_points(result.slide(), language).await)
            } else {
                None
            }
        });
        let generated = join_all(pending).await;

        for (result, points) in results.iter_mut().zip(generated) {
            if let Some(points) = points {
                result.set_talking_points(points);
            }
        }

        log::info!("remediation: talking points generation complete");
        results
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockLlmClient};
    use crate::slides::{BlockAlignment, BlockVerdict};

    fn slide(n: usize) -> SlideRecord {
        SlideRecord::new(n, format!("Slide title {n}"), "bullet")
    }

    fn result(n: usize, alignment: BlockAlignment) -> SlideCoverageResult {
        SlideCoverageResult::new(slide(n), vec![BlockVerdict::new(alignment, "")])
    }

    fn generator(llm: MockLlmClient) -> (RemediationGenerator, Arc<MockLlmClient>) {
        let llm = Arc::new(llm);
        (RemediationGenerator::new(llm.clone()), llm)
    }

    #[tokio::test]
    async fn keeps_at_most_three_points() {
        let (gen, _) = generator(MockLlmClient::ok(
            r#"{"talking_points": ["a", "b", "c", "d"]}"#,
        ));
        let points = gen.generate_talking_points(&slide(1), Language::English).await;
        assert_eq!(points, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn two_points_are_accepted() {
        let (gen, _) = generator(MockLlmClient::ok(r#"{"talking_points": ["a", "b"]}"#));
        let points = gen.generate_talking_points(&slide(1), Language::English).await;
        assert_eq!(points, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn too_few_points_use_invalid_response_fallback() {
        let (gen, _) = generator(MockLlmClient::ok(r#"{"talking_points": ["only one"]}"#));
        let points = gen.generate_talking_points(&slide(1), Language::Turkish).await;
        assert_eq!(
            points,
            fallback_talking_points(Language::Turkish, Fallback::InvalidResponse)
        );
        assert_eq!(points[0], "Bu slaydın ana mesajına odaklanın.");
    }

    #[tokio::test]
    async fn missing_field_uses_invalid_response_fallback() {
        let (gen, _) = generator(MockLlmClient::ok("{}"));
        let points = gen.generate_talking_points(&slide(1), Language::English).await;
        assert_eq!(points[0], "Focus on the key message of this slide.");
    }

    #[tokio::test]
    async fn errors_use_failed_fallback() {
        let (gen, _) = generator(MockLlmClient::err(LlmError::Request("refused".into())));
        let points = gen.generate_talking_points(&slide(1), Language::English).await;
        assert_eq!(
            points,
            fallback_talking_points(Language::English, Fallback::Failed)
        );

        let (gen, _) = generator(MockLlmClient::ok("not json at all"));
        let points = gen.generate_talking_points(&slide(1), Language::English).await;
        assert_eq!(points[0], "Address the main topic clearly and concisely.");
    }

    #[test]
    fn every_fallback_has_three_points() {
        for lang in [Language::English, Language::Turkish] {
            for fb in [Fallback::InvalidResponse, Fallback::Failed] {
                assert_eq!(fallback_talking_points(lang, fb).len(), 3);
            }
        }
    }

    #[tokio::test]
    async fn batch_only_touches_slides_needing_suggestions() {
        let (gen, llm) = generator(MockLlmClient::ok(r#"{"talking_points": ["x", "y"]}"#));
        let input = vec![
            result(1, BlockAlignment::High),
            result(2, BlockAlignment::Partial),
            result(3, BlockAlignment::None),
        ];
        let out = gen.generate_talking_points_batch(input, Language::English).await;

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].slide().number, 1);
        assert!(out[0].talking_points().is_empty());
        assert_eq!(out[1].talking_points(), ["x", "y"]);
        assert_eq!(out[2].talking_points(), ["x", "y"]);
        assert_eq!(llm.calls(), 2);
    }

    #[tokio::test]
    async fn batch_with_failing_llm_still_fills_points() {
        let (gen, _) = generator(MockLlmClient::err(LlmError::Timeout));
        let out = gen
            .generate_talking_points_batch(vec![result(1, BlockAlignment::None)], Language::English)
            .await;
        let n = out[0].talking_points().len();
        assert!((MIN_TALKING_POINTS..=MAX_TALKING_POINTS).contains(&n));
    }
}
