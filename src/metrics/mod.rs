//! Speech metrics: words per minute, pace bucket and filler words.

pub mod speech;

pub use speech::{
    calculate_metrics, calculate_wpm, count_words, detect_filler_words, FillerWord,
    MetricsError, PaceLabel, SpeechMetrics,
};
