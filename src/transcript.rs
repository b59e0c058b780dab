//! Transcript types supplied by the speech-to-text collaborator.

use serde::{Deserialize, Serialize};

/// A single time-aligned chunk of transcribed speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    pub text: String,
}

/// A complete transcription of one practice session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full transcript text.
    pub text: String,
    /// Time-stamped segments in spoken order.
    pub segments: Vec<TranscriptSegment>,
    /// Total audio duration in seconds.
    pub duration: f64,
    /// Language code reported by the transcriber (may be empty).
    #[serde(default)]
    pub language: String,
}

impl Transcript {
    /// Build a transcript whose segments are the given texts, one second
    /// each, and whose full text is their space-joined concatenation.
    pub fn from_segment_texts<S: AsRef<str>>(texts: &[S]) -> Self {
        let segments: Vec<TranscriptSegment> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| TranscriptSegment {
                start: i as f64,
                end: (i + 1) as f64,
                text: t.as_ref().to_string(),
            })
            .collect();
        let text = texts
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text,
            duration: segments.len() as f64,
            segments,
            language: String::new(),
        }
    }

    /// Segment texts in order.
    pub fn segment_texts(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.text.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_segment_texts_builds_timeline() {
        let t = Transcript::from_segment_texts(&["hello", "world"]);
        assert_eq!(t.text, "hello world");
        assert_eq!(t.segments.len(), 2);
        assert_eq!(t.segments[1].start, 1.0);
        assert_eq!(t.duration, 2.0);
        assert_eq!(t.segment_texts(), vec!["hello", "world"]);
    }

    #[test]
    fn deserializes_without_language() {
        let json = r#"{"text":"hi","segments":[{"start":0.0,"end":1.5,"text":"hi"}],"duration":1.5}"#;
        let t: Transcript = serde_json::from_str(json).unwrap();
        assert_eq!(t.segments[0].end, 1.5);
        assert!(t.language.is_empty());
    }
}
