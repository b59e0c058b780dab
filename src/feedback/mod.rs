//! Coaching feedback generated from speech metrics and outline alignment.

pub mod synthesizer;

pub use synthesizer::{
    ethical_note, parse_feedback, Feedback, FeedbackError, FeedbackSynthesizer, FeedbackTip,
    MAX_FEEDBACK_ITEMS,
};
