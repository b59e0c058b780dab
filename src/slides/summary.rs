//! Deck-level coverage numbers.

use serde::Serialize;

use super::record::{CoverageStatus, SlideCoverageResult};
use crate::alignment::summary::round1;
use crate::text::Language;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageSummary {
    pub total_slides: usize,
    pub covered: usize,
    pub partial: usize,
    pub missing: usize,
    /// `covered / total * 100`, one decimal; `0.0` for an empty deck.
    pub overall_coverage: f64,
}

impl CoverageSummary {
    pub fn from_results(results: &[SlideCoverageResult]) -> Self {
        let count = |status: CoverageStatus| {
            results.iter().filter(|r| r.status() == status).count()
        };
        let total_slides = results.len();
        let covered = count(CoverageStatus::Covered);

        let overall_coverage = if total_slides == 0 {
            0.0
        } else {
            round1(covered as f64 / total_slides as f64 * 100.0)
        };

        Self {
            total_slides,
            covered,
            partial: count(CoverageStatus::Partial),
            missing: count(CoverageStatus::Missing),
            overall_coverage,
        }
    }
}

/// Slide-by-slide report returned alongside the segment alignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideBySlideAlignment {
    pub slides: Vec<SlideCoverageResult>,
    pub overall_coverage: f64,
    pub language: Language,
}

impl SlideBySlideAlignment {
    pub fn new(slides: Vec<SlideCoverageResult>, language: Language) -> Self {
        let overall_coverage = CoverageSummary::from_results(&slides).overall_coverage;
        Self {
            slides,
            overall_coverage,
            language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slides::{BlockAlignment, BlockVerdict, SlideRecord};

    fn result(n: usize, alignment: BlockAlignment) -> SlideCoverageResult {
        SlideCoverageResult::new(
            SlideRecord::new(n, format!("S{n}"), ""),
            vec![BlockVerdict::new(alignment, "")],
        )
    }

    #[test]
    fn empty_deck_has_zero_coverage() {
        let summary = CoverageSummary::from_results(&[]);
        assert_eq!(summary.total_slides, 0);
        assert_eq!(summary.overall_coverage, 0.0);
        assert!(!summary.overall_coverage.is_nan());
    }

    #[test]
    fn counts_each_status() {
        let results = vec![
            result(1, BlockAlignment::High),
            result(2, BlockAlignment::Partial),
            result(3, BlockAlignment::None),
        ];
        let summary = CoverageSummary::from_results(&results);
        assert_eq!(summary.covered, 1);
        assert_eq!(summary.partial, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.overall_coverage, 33.3);
    }

    #[test]
    fn report_carries_overall_coverage() {
        let report = SlideBySlideAlignment::new(
            vec![result(1, BlockAlignment::High), result(2, BlockAlignment::High)],
            Language::Turkish,
        );
        assert_eq!(report.overall_coverage, 100.0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["language"], "tr");
    }
}
