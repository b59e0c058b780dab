//! Fast local language heuristic for Turkish / English sessions.
//!
//! [`Language::detect`] looks for Turkish-specific letters or common Turkish
//! function words; anything else is treated as English.  No model call is
//! involved.

use serde::{Deserialize, Serialize};

/// Letters that only occur in Turkish among the supported languages.
const TURKISH_CHARS: &[char] = &['ğ', 'ü', 'ş', 'ı', 'ö', 'ç'];

/// Frequent Turkish function words, matched as whole whitespace tokens.
const TURKISH_WORDS: &[&str] = &["ve", "bir", "bu", "için", "ile", "var", "olan"];

/// Language used for prompts, fallback content and disclaimers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "tr")]
    Turkish,
}

impl Language {
    /// Guess the session language from the outline and transcript together.
    ///
    /// ```
    /// use presentation_coach::text::Language;
    ///
    /// assert_eq!(Language::detect("Giriş", "bugün size"), Language::Turkish);
    /// assert_eq!(Language::detect("Intro", "today we"), Language::English);
    /// ```
    pub fn detect(outline_text: &str, transcript_text: &str) -> Self {
        let combined = format!("{outline_text} {transcript_text}").to_lowercase();

        let has_chars = combined.chars().any(|c| TURKISH_CHARS.contains(&c));
        let has_words = combined
            .split_whitespace()
            .any(|token| TURKISH_WORDS.contains(&token));

        if has_chars || has_words {
            Self::Turkish
        } else {
            Self::English
        }
    }

    /// ISO-639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Turkish => "tr",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turkish_letters_trigger_turkish() {
        assert_eq!(Language::detect("Sunum planı", ""), Language::Turkish);
        assert_eq!(Language::detect("", "ÇOK GÜZEL"), Language::Turkish);
    }

    #[test]
    fn turkish_function_word_triggers_turkish() {
        assert_eq!(Language::detect("proje ve plan", ""), Language::Turkish);
    }

    #[test]
    fn function_words_must_be_whole_tokens() {
        // "very" and "bus" contain "ve"/"bu" but are not Turkish words.
        assert_eq!(
            Language::detect("a very fast bus", "invariant"),
            Language::English
        );
    }

    #[test]
    fn defaults_to_english() {
        assert_eq!(Language::detect("", ""), Language::English);
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn displays_as_code() {
        assert_eq!(Language::Turkish.to_string(), "tr");
        assert_eq!(Language::English.code(), "en");
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&Language::Turkish).unwrap();
        assert_eq!(json, "\"tr\"");
    }
}
