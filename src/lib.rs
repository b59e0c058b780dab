//! Presentation practice analysis.
//!
//! Given a planned outline (free text or slides) and a timed transcript of a
//! rehearsal, the crate measures pace and filler words, aligns every spoken
//! segment with the outline, checks which slides were covered, suggests
//! talking points for the ones that were not, and asks an LLM for coaching
//! feedback.  [`pipeline::SessionAnalyzer`] runs all of it for one session.

pub mod alignment;
pub mod config;
pub mod embedding;
pub mod feedback;
pub mod llm;
pub mod metrics;
pub mod pipeline;
pub mod slides;
pub mod text;
pub mod transcript;
