//! Slide-by-slide coverage analysis.
//!
//! * [`CoverageClassifier`]: asks the LLM whether each transcript block
//!   covers each slide and aggregates the verdicts.
//! * [`RemediationGenerator`]: suggests talking points for slides that were
//!   not covered, with canned fallbacks.
//! * [`CoverageSummary`] / [`SlideBySlideAlignment`]: deck-level numbers.

pub mod classifier;
pub mod record;
pub mod remediation;
pub mod summary;

pub use classifier::{parse_verdict, CoverageClassifier, INVALID_RESPONSE_REASON};
pub use record::{
    determine_slide_status, BlockAlignment, BlockVerdict, CoverageStatus, SlideCoverageResult,
    SlideInput, SlideRecord,
};
pub use remediation::{
    fallback_talking_points, Fallback, RemediationGenerator, MAX_TALKING_POINTS,
    MIN_TALKING_POINTS,
};
pub use summary::{CoverageSummary, SlideBySlideAlignment};
