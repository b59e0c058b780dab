//! Splits outlines and transcripts into comparison units.
//!
//! * [`split_into_sections`]: outline sections for the similarity matcher.
//! * [`split_into_blocks`]: fixed-size sentence windows for slide checks.

/// Minimum number of non-blank lines for text to count as structured.
const MIN_STRUCTURED_LINES: usize = 3;

/// Sentence fragments of this many characters or fewer are discarded when an
/// unstructured outline falls back to sentence splitting.
const MIN_SENTENCE_CHARS: usize = 10;

/// Default number of sentences per transcript block.
pub const DEFAULT_BLOCK_SIZE: usize = 3;

/// Split `text` on runs of `.`, `!` and `?`, returning trimmed, non-empty
/// fragments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split an outline into ordered, non-empty sections.
///
/// Lines are used when the text has at least three non-blank lines.
/// Otherwise the original text is re-split on sentence punctuation, keeping
/// fragments longer than ten characters.  When both strategies come up
/// empty the original text is returned verbatim as the only section, so the
/// matcher never sees zero candidates.
///
/// ```
/// use presentation_coach::text::split_into_sections;
///
/// let sections = split_into_sections("Intro\n\nBody\nConclusion\n");
/// assert_eq!(sections, vec!["Intro", "Body", "Conclusion"]);
/// ```
pub fn split_into_sections(text: &str) -> Vec<String> {
    let lines: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    if lines.len() >= MIN_STRUCTURED_LINES {
        return lines;
    }

    let sentences: Vec<String> = split_sentences(text)
        .into_iter()
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .map(str::to_string)
        .collect();

    if sentences.is_empty() {
        vec![text.to_string()]
    } else {
        sentences
    }
}

/// Group transcript sentences into non-overlapping windows of `block_size`
/// sentences joined with single spaces.  A trailing partial window is kept.
///
/// A `block_size` of zero is treated as one sentence per block.
pub fn split_into_blocks(text: &str, block_size: usize) -> Vec<String> {
    let size = block_size.max(1);
    split_sentences(text)
        .chunks(size)
        .map(|window| window.join(" "))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
