//! Transcript-to-outline alignment.
//!
//! * [`SimilarityMatcher`]: embeds segments and outline sections, picks the
//!   best section per segment, flags off-topic segments.
//! * [`get_coverage_summary`]: on-topic / off-topic counts and rate.

pub mod matcher;
pub mod summary;

pub use matcher::{
    AlignmentError, AlignmentItem, AlignmentResult, SimilarityMatcher,
    DEFAULT_SIMILARITY_THRESHOLD, MAX_MATCH_CHARS,
};
pub use summary::{get_coverage_summary, AlignmentSummary};
