//! Speaking pace and filler-word counts for one transcript.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::alignment::summary::round1;
use crate::config::MetricsConfig;
use crate::transcript::Transcript;

const WORD_PATTERN: &str = r"\b\w+\b";

/// Below this many words per minute the pace is [`PaceLabel::Slow`].
pub const SLOW_WPM: f64 = 120.0;
/// Above this many words per minute the pace is [`PaceLabel::Fast`].
pub const FAST_WPM: f64 = 160.0;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("invalid word pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// One filler word and how often it was said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillerWord {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechMetrics {
    /// Transcript duration in seconds, one decimal.
    pub duration_sec: f64,
    pub word_count: usize,
    /// Words per minute, one decimal; `0.0` for a zero-length recording.
    pub wpm: f64,
    pub filler_count: usize,
    /// Most frequent first.
    pub filler_words: Vec<FillerWord>,
}

impl SpeechMetrics {
    pub fn pace(&self) -> PaceLabel {
        PaceLabel::from_wpm(self.wpm)
    }
}

/// Coarse speaking-pace bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceLabel {
    Slow,
    Balanced,
    Fast,
}

impl PaceLabel {
    pub fn from_wpm(wpm: f64) -> Self {
        if wpm < SLOW_WPM {
            PaceLabel::Slow
        } else if wpm > FAST_WPM {
            PaceLabel::Fast
        } else {
            PaceLabel::Balanced
        }
    }
}

impl fmt::Display for PaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaceLabel::Slow => "slow",
            PaceLabel::Balanced => "balanced",
            PaceLabel::Fast => "fast",
        };
        f.write_str(label)
    }
}

pub fn calculate_wpm(word_count: usize, duration_secs: f64) -> f64 {
    if duration_secs <= 0.0 {
        return 0.0;
    }
    round1(word_count as f64 / duration_secs * 60.0)
}

/// Count `\w+` tokens, ignoring punctuation.
pub fn count_words(text: &str) -> Result<usize, MetricsError> {
    let word = Regex::new(WORD_PATTERN)?;
    Ok(word.find_iter(&text.to_lowercase()).count())
}

/// Whole-word, case-insensitive counts for each filler in `fillers`.
///
/// Multi-word fillers ("you know") match as a phrase.  Fillers that never
/// occur are left out; the rest are sorted by count, most frequent first,
/// keeping list order among equal counts.
pub fn detect_filler_words(text: &str, fillers: &[String]) -> Vec<FillerWord> {
    let lowered = text.to_lowercase();
    let mut found: Vec<FillerWord> = fillers
        .iter()
        .filter_map(|filler| {
            let pattern = format!(r"\b{}\b", regex::escape(&filler.to_lowercase()));
            let Ok(re) = Regex::new(&pattern) else {
                log::warn!("metrics: skipping unusable filler word {:?}", filler);
                return None;
            };
            let count = re.find_iter(&lowered).count();
            (count > 0).then(|| FillerWord {
                word: filler.clone(),
                count,
            })
        })
        .collect();
    found.sort_by(|a, b| b.count.cmp(&a.count));
    found
}

pub fn calculate_metrics(
    transcript: &Transcript,
    config: &MetricsConfig,
) -> Result<SpeechMetrics, MetricsError> {
    let word_count = count_words(&transcript.text)?;
    let filler_words = detect_filler_words(&transcript.text, &config.filler_words());
    let filler_count = filler_words.iter().map(|f| f.count).sum();
    let wpm = calculate_wpm(word_count, transcript.duration);

    log::info!(
        "metrics: {} words, {} WPM, {} fillers",
        word_count,
        wpm,
        filler_count
    );

    Ok(SpeechMetrics {
        duration_sec: round1(transcript.duration),
        word_count,
        wpm,
        filler_count,
        filler_words,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(text: &str, duration: f64) -> Transcript {
        Transcript {
            text: text.into(),
            segments: Vec::new(),
            duration,
            language: String::new(),
        }
    }

    #[test]
    fn wpm_is_zero_without_duration() {
        assert_eq!(calculate_wpm(100, 0.0), 0.0);
    }

    #[test]
    fn wpm_rounds_to_one_decimal() {
        assert_eq!(calculate_wpm(100, 45.0), 133.3);
        assert_eq!(calculate_wpm(150, 60.0), 150.0);
    }

    #[test]
    fn words_ignore_punctuation() {
        assert_eq!(count_words("Hello, world! It's   fine.").unwrap(), 5);
        assert_eq!(count_words("").unwrap(), 0);
        assert_eq!(count_words("Şimdi başlıyoruz").unwrap(), 2);
    }

    #[test]
    fn fillers_match_whole_words_only() {
        let fillers = vec!["so".to_string(), "um".to_string()];
        let found = detect_filler_words("So, also some sofas. Um, so.", &fillers);
        assert_eq!(
            found,
            vec![
                FillerWord {
                    word: "so".into(),
                    count: 2
                },
                FillerWord {
                    word: "um".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn multi_word_filler_matches_as_phrase() {
        let fillers = vec!["you know".to_string()];
        let found = detect_filler_words("You know, I know you. you know", &fillers);
        assert_eq!(found[0].count, 2);
    }

    #[test]
    fn fillers_sorted_by_count_descending() {
        let fillers = vec!["like".to_string(), "um".to_string(), "uh".to_string()];
        let found = detect_filler_words("um like um uh um uh", &fillers);
        let words: Vec<_> = found.iter().map(|f| f.word.as_str()).collect();
        assert_eq!(words, vec!["um", "uh", "like"]);
    }

    #[test]
    fn turkish_fillers_are_detected() {
        let fillers = MetricsConfig::default().filler_words();
        let found = detect_filler_words("Yani bu proje, şey, işte böyle.", &fillers);
        let total: usize = found.iter().map(|f| f.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn calculate_metrics_end_to_end() {
        let t = transcript("Um, today we talk about, um, basically rust.", 6.04);
        let m = calculate_metrics(&t, &MetricsConfig::default()).unwrap();
        assert_eq!(m.word_count, 8);
        assert_eq!(m.duration_sec, 6.0);
        assert_eq!(m.filler_count, 3);
        assert_eq!(m.filler_words[0].word, "um");
        assert_eq!(m.filler_words[0].count, 2);
    }

    #[test]
    fn pace_labels() {
        assert_eq!(PaceLabel::from_wpm(119.9), PaceLabel::Slow);
        assert_eq!(PaceLabel::from_wpm(120.0), PaceLabel::Balanced);
        assert_eq!(PaceLabel::from_wpm(160.0), PaceLabel::Balanced);
        assert_eq!(PaceLabel::from_wpm(160.1), PaceLabel::Fast);
        assert_eq!(PaceLabel::Fast.to_string(), "fast");
    }
}
