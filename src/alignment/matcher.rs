//! Similarity matcher: aligns transcript segments to outline sections.
//!
//! Both sides are embedded in one batch each, the full cosine matrix is
//! computed, and every segment is paired with its best section.  Segments
//! scoring strictly below the threshold are off-topic.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::embedding::{argmax, similarity_matrix, EmbeddingError, EmbeddingProvider};
use crate::text::split_into_sections;
use crate::transcript::Transcript;

/// Section labels longer than this are truncated in [`AlignmentItem::best_match`].
pub const MAX_MATCH_CHARS: usize = 80;

/// Default off-topic threshold.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.45;

const ELLIPSIS: &str = "...";

// ---------------------------------------------------------------------------
// AlignmentError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum AlignmentError {
    #[error("failed to align transcript to outline: {0}")]
    Embedding(#[from] EmbeddingError),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Best outline match for one transcript segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentItem {
    /// Position of the segment in the input list.
    pub segment_idx: usize,
    pub segment_text: String,
    /// Matched section text, at most [`MAX_MATCH_CHARS`] characters.
    pub best_match: String,
    /// Cosine similarity in `[-1, 1]`, rounded to three decimals.
    pub similarity_score: f64,
}

/// All alignment items plus the off-topic subset, in segment order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentResult {
    items: Vec<AlignmentItem>,
    off_topic_segments: Vec<AlignmentItem>,
}

impl AlignmentResult {
    /// Build a result, deriving the off-topic view from `threshold`.
    pub fn from_items(items: Vec<AlignmentItem>, threshold: f64) -> Self {
        let off_topic_segments = items
            .iter()
            .filter(|item| item.similarity_score < threshold)
            .cloned()
            .collect();
        Self {
            items,
            off_topic_segments,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[AlignmentItem] {
        &self.items
    }

    pub fn off_topic_segments(&self) -> &[AlignmentItem] {
        &self.off_topic_segments
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SimilarityMatcher
// ---------------------------------------------------------------------------

/// Embedding-based matcher with a configurable off-topic threshold.
pub struct SimilarityMatcher {
    embedder: Arc<dyn EmbeddingProvider>,
    threshold: f64,
}

impl SimilarityMatcher {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, threshold: f64) -> Self {
        Self {
            embedder,
            threshold,
        }
    }

    /// Split `outline_text` into sections and align the transcript's
    /// segments against them.
    pub async fn align_transcript_to_outline(
        &self,
        transcript: &Transcript,
        outline_text: &str,
    ) -> Result<AlignmentResult, AlignmentError> {
        if outline_text.trim().is_empty() {
            log::warn!("alignment: empty outline, skipping alignment");
            return Ok(AlignmentResult::empty());
        }
        let sections = split_into_sections(outline_text);
        self.align(&transcript.segment_texts(), &sections).await
    }

    /// Align `segments` against `sections`.
    ///
    /// Returns an empty result (not an error) when there is nothing to
    /// compare on either side.
    pub async fn align(
        &self,
        segments: &[String],
        sections: &[String],
    ) -> Result<AlignmentResult, AlignmentError> {
        if sections.is_empty() {
            log::warn!("alignment: empty outline, skipping alignment");
            return Ok(AlignmentResult::empty());
        }
        if segments.is_empty() {
            log::warn!("alignment: transcript has no segments");
            return Ok(AlignmentResult::empty());
        }

        log::info!(
            "alignment: aligning {} segments to {} outline sections",
            segments.len(),
            sections.len()
        );

        let section_vectors = self.embedder.embed(sections).await?;
        let segment_vectors = self.embedder.embed(segments).await?;
        crate::embedding::validate_batch(&section_vectors, sections.len())?;
        crate::embedding::validate_batch(&segment_vectors, segments.len())?;

        let matrix = similarity_matrix(&segment_vectors, &section_vectors)?;

        let items: Vec<AlignmentItem> = segments
            .iter()
            .zip(&matrix)
            .enumerate()
            .filter_map(|(idx, (text, row))| {
                argmax(row).map(|(best_idx, score)| AlignmentItem {
                    segment_idx: idx,
                    segment_text: text.clone(),
                    best_match: truncate_label(&sections[best_idx]),
                    similarity_score: round_score(score),
                })
            })
            .collect();

        let result = AlignmentResult::from_items(items, self.threshold);
        log::info!(
            "alignment: complete, {} off-topic segments detected",
            result.off_topic_segments().len()
        );
        Ok(result)
    }
}

/// Truncate to [`MAX_MATCH_CHARS`] characters, ending in `...` when cut.
fn truncate_label(text: &str) -> String {
    if text.chars().count() <= MAX_MATCH_CHARS {
        return text.to_string();
    }
    let keep = MAX_MATCH_CHARS - ELLIPSIS.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

fn round_score(score: f64) -> f64 {
    ((score * 1000.0).round() / 1000.0).clamp(-1.0, 1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbedder;

    fn matcher(mock: MockEmbedder) -> SimilarityMatcher {
        SimilarityMatcher::new(Arc::new(mock), DEFAULT_SIMILARITY_THRESHOLD)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn one_hot_outline_scenario() {
        let mock = MockEmbedder::new([
            ("Intro", vec![1.0, 0.0, 0.0]),
            ("Body", vec![0.0, 1.0, 0.0]),
            ("Conclusion", vec![0.0, 0.0, 1.0]),
            ("Let's begin", vec![1.0, 0.0, 0.0]),
            ("the main point is X", vec![0.0, 1.0, 0.0]),
            ("to wrap up", vec![0.0, 0.0, 1.0]),
        ]);
        let transcript =
            Transcript::from_segment_texts(&["Let's begin", "the main point is X", "to wrap up"]);

        let result = matcher(mock)
            .align_transcript_to_outline(&transcript, "Intro\nBody\nConclusion")
            .await
            .unwrap();

        assert_eq!(result.items().len(), 3);
        assert!(result.off_topic_segments().is_empty());
        let matches: Vec<&str> = result.items().iter().map(|i| i.best_match.as_str()).collect();
        assert_eq!(matches, vec!["Intro", "Body", "Conclusion"]);
        for (idx, item) in result.items().iter().enumerate() {
            assert_eq!(item.segment_idx, idx);
            assert_eq!(item.similarity_score, 1.0);
        }
    }

    #[tokio::test]
    async fn empty_outline_returns_empty_result_without_embedding() {
        let mock = Arc::new(MockEmbedder::new([("x", vec![1.0])]));
        let m = SimilarityMatcher::new(mock.clone(), 0.45);
        let result = m.align(&strings(&["x"]), &[]).await.unwrap();
        assert!(result.is_empty());
        assert!(result.off_topic_segments().is_empty());
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn blank_outline_text_is_empty_result() {
        let mock = Arc::new(MockEmbedder::new([("x", vec![1.0])]));
        let m = SimilarityMatcher::new(mock.clone(), 0.45);
        let transcript = Transcript::from_segment_texts(&["x"]);
        let result = m
            .align_transcript_to_outline(&transcript, "  \n ")
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn score_equal_to_threshold_is_on_topic() {
        // cos = 0.6 / 1.0 exactly between (0.6, 0.8) and (1, 0).
        let mock = MockEmbedder::new([
            ("section", vec![1.0, 0.0]),
            ("edge", vec![0.6, 0.8]),
            ("below", vec![0.0, 1.0]),
        ]);
        let m = SimilarityMatcher::new(Arc::new(mock), 0.6);
        let result = m
            .align(&strings(&["edge", "below"]), &strings(&["section"]))
            .await
            .unwrap();

        assert_eq!(result.items()[0].similarity_score, 0.6);
        assert_eq!(result.off_topic_segments().len(), 1);
        assert_eq!(result.off_topic_segments()[0].segment_idx, 1);
    }

    #[tokio::test]
    async fn off_topic_view_preserves_segment_order() {
        let mock = MockEmbedder::new([
            ("topic", vec![1.0, 0.0]),
            ("a", vec![0.0, 1.0]),
            ("b", vec![1.0, 0.0]),
            ("c", vec![0.1, 1.0]),
        ]);
        let result = matcher(mock)
            .align(&strings(&["a", "b", "c"]), &strings(&["topic"]))
            .await
            .unwrap();

        let off: Vec<usize> = result
            .off_topic_segments()
            .iter()
            .map(|i| i.segment_idx)
            .collect();
        assert_eq!(off, vec![0, 2]);
    }

    #[tokio::test]
    async fn ties_pick_the_first_section() {
        let mock = MockEmbedder::new([
            ("first", vec![1.0, 0.0]),
            ("second", vec![1.0, 0.0]),
            ("seg", vec![1.0, 0.0]),
        ]);
        let result = matcher(mock)
            .align(&strings(&["seg"]), &strings(&["first", "second"]))
            .await
            .unwrap();
        assert_eq!(result.items()[0].best_match, "first");
    }

    #[tokio::test]
    async fn scores_are_rounded_to_three_decimals() {
        let mock = MockEmbedder::new([("s", vec![1.0, 0.0]), ("t", vec![1.0, 1.0])]);
        let result = matcher(mock)
            .align(&strings(&["t"]), &strings(&["s"]))
            .await
            .unwrap();
        // cos 45° = 0.70710678...
        assert_eq!(result.items()[0].similarity_score, 0.707);
    }

    #[tokio::test]
    async fn long_sections_are_truncated_to_80_chars() {
        let long = "x".repeat(120);
        let mock = MockEmbedder::new([(long.clone(), vec![1.0]), ("seg".to_string(), vec![1.0])]);
        let result = matcher(mock)
            .align(&strings(&["seg"]), &[long])
            .await
            .unwrap();
        let best = &result.items()[0].best_match;
        assert_eq!(best.chars().count(), 80);
        assert!(best.ends_with("..."));
    }

    #[tokio::test]
    async fn embedding_failure_propagates() {
        let mock = MockEmbedder::failing(EmbeddingError::Timeout);
        let err = matcher(mock)
            .align(&strings(&["a"]), &strings(&["b"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AlignmentError::Embedding(EmbeddingError::Timeout)));
    }

    #[tokio::test]
    async fn mismatched_dimensions_fail_the_alignment() {
        let mock = MockEmbedder::new([("a", vec![1.0, 0.0]), ("b", vec![1.0])]);
        let err = matcher(mock)
            .align(&strings(&["a"]), &strings(&["b"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AlignmentError::Embedding(EmbeddingError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn truncate_label_counts_characters() {
        let label = "ş".repeat(81);
        let out = truncate_label(&label);
        assert_eq!(out.chars().count(), 80);
        assert_eq!(truncate_label("short"), "short");
        assert_eq!(truncate_label(&"y".repeat(80)), "y".repeat(80));
    }

    #[test]
    fn from_items_derives_off_topic_view() {
        let item = |idx: usize, score: f64| AlignmentItem {
            segment_idx: idx,
            segment_text: format!("seg {idx}"),
            best_match: "m".into(),
            similarity_score: score,
        };
        let result = AlignmentResult::from_items(vec![item(0, 0.9), item(1, 0.1)], 0.45);
        assert_eq!(result.off_topic_segments(), &[item(1, 0.1)]);
    }
}
