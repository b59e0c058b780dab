//! Segment-level coverage statistics over an [`AlignmentResult`].

use serde::Serialize;

use super::matcher::AlignmentResult;

/// How much of the transcript stayed on the outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentSummary {
    pub total_segments: usize,
    pub on_topic_segments: usize,
    pub off_topic_segments: usize,
    /// Percentage of on-topic segments, rounded to one decimal.
    pub coverage_rate: f64,
}

/// Summarise an alignment.  An empty alignment yields all zeros.
pub fn get_coverage_summary(alignment: &AlignmentResult) -> AlignmentSummary {
    let total = alignment.items().len();
    let off_topic = alignment.off_topic_segments().len();
    let on_topic = total.saturating_sub(off_topic);

    let coverage_rate = if total == 0 {
        0.0
    } else {
        round1(on_topic as f64 / total as f64 * 100.0)
    };

    AlignmentSummary {
        total_segments: total,
        on_topic_segments: on_topic,
        off_topic_segments: off_topic,
        coverage_rate,
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::AlignmentItem;

    fn items(scores: &[f64]) -> Vec<AlignmentItem> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| AlignmentItem {
                segment_idx: i,
                segment_text: format!("segment {i}"),
                best_match: "section".into(),
                similarity_score: *s,
            })
            .collect()
    }

    #[test]
    fn ten_items_three_off_topic() {
        let scores = [0.9, 0.1, 0.8, 0.2, 0.7, 0.6, 0.3, 0.5, 0.95, 0.85];
        let alignment = AlignmentResult::from_items(items(&scores), 0.45);
        let summary = get_coverage_summary(&alignment);
        assert_eq!(
            summary,
            AlignmentSummary {
                total_segments: 10,
                on_topic_segments: 7,
                off_topic_segments: 3,
                coverage_rate: 70.0,
            }
        );
    }

    #[test]
    fn empty_alignment_is_all_zero() {
        let summary = get_coverage_summary(&AlignmentResult::empty());
        assert_eq!(summary.total_segments, 0);
        assert_eq!(summary.coverage_rate, 0.0);
    }

    #[test]
    fn rate_is_rounded_to_one_decimal() {
        let alignment = AlignmentResult::from_items(items(&[0.9, 0.9, 0.1]), 0.45);
        assert_eq!(get_coverage_summary(&alignment).coverage_rate, 66.7);
    }
}
