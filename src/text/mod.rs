//! Text utilities shared by the alignment and feedback stages.
//!
//! * [`split_into_sections`] / [`split_into_blocks`]: the segmenter.
//! * [`Language`]: Turkish / English heuristic detection.

pub mod language;
pub mod segment;

pub use language::Language;
pub use segment::{split_into_blocks, split_into_sections, split_sentences, DEFAULT_BLOCK_SIZE};
