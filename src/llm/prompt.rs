//! Prompt builder for slide classification, talking points and coaching
//! feedback.
//!
//! [`PromptBuilder`] is constructed for one [`Language`]; Turkish and English
//! have dedicated instructions.  Every prompt asks for a JSON-only answer.

use crate::alignment::AlignmentResult;
use crate::metrics::{PaceLabel, SpeechMetrics};
use crate::text::Language;

/// Off-topic excerpts quoted in the feedback prompt.
pub const MAX_OFF_TOPIC_EXAMPLES: usize = 3;
/// Characters kept from each off-topic excerpt.
pub const OFF_TOPIC_EXCERPT_CHARS: usize = 50;
/// Filler words listed in the feedback prompt.
const MAX_FILLER_WORDS: usize = 5;

// ---------------------------------------------------------------------------
// Slide classification
// ---------------------------------------------------------------------------

const CLASSIFY_EN: &str = "\
You are a presentation analysis assistant.

SLIDE:
Title: {title}
Key Points: {bullets}

SPOKEN PART:
\"{block}\"

QUESTION: Does the spoken part align with this slide's main idea?

Answer ONLY in JSON format:
{
  \"alignment\": \"high | partial | none\",
  \"reason\": \"short explanation\"
}

RULES:
- high = spoken part clearly addresses the slide's topic
- partial = related to slide but superficial or incomplete
- none = completely different topic or slide not mentioned
";

const CLASSIFY_TR: &str = "\
Sen bir sunum analiz asistanısın.

SLAYT:
Başlık: {title}
Ana Noktalar: {bullets}

KONUŞULAN BÖLÜM:
\"{block}\"

SORU: Konuşulan bölüm, bu slaydın ana fikriyle örtüşüyor mu?

SADECE JSON formatında yanıt ver:
{
  \"alignment\": \"high | partial | none\",
  \"reason\": \"kısa açıklama\"
}

KURALLAR:
- high = konuşulan bölüm slaydın konusunu açıkça işliyor
- partial = slaytla ilgili ama yüzeysel veya eksik
- none = tamamen farklı konu veya slayttan hiç bahsetmiyor
";

// ---------------------------------------------------------------------------
// Talking points
// ---------------------------------------------------------------------------

const TALKING_POINTS_EN: &str = "\
You are a professional presentation coach.

SLIDE:
Title: {title}
Key Points: {bullets}

The speaker did NOT adequately cover this slide.

TASK: Write 2-3 short sentences the speaker could say for this slide.

RULES:
- Professional tone
- Clear and concrete
- No lecturing or preaching
- Suitable for spoken language
- Each sentence MAX 25 words

Answer ONLY in JSON format:
{
  \"talking_points\": [\"Suggested sentence 1\", \"Suggested sentence 2\", \"Suggested sentence 3\"]
}
";

const TALKING_POINTS_TR: &str = "\
Sen bir profesyonel sunum koçusun.

SLAYT:
Başlık: {title}
Ana Noktalar: {bullets}

Sunucu bu slaydı yeterince işlemedi veya hiç bahsetmedi.

GÖREV: Sunucunun bu slayt için söyleyebileceği 2-3 kısa cümle yaz.

KURALLAR:
- Profesyonel ton
- Net ve somut ol
- Öğreticilik yapma, vaaz verme
- Konuşma diline uygun
- Her cümle MAX 25 kelime

SADECE JSON formatında yanıt ver:
{
  \"talking_points\": [\"Öneri cümle 1\", \"Öneri cümle 2\", \"Öneri cümle 3\"]
}
";

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

const FEEDBACK_SYSTEM_EN: &str = "\
You are a presentation coach. Your role: provide constructive, specific, and supportive feedback.

RULES:
1. Respond ONLY in JSON format (no other text)
2. No psychological diagnosis or therapy
3. Each point MAX 1 sentence
4. Be specific and actionable
5. No judgment or condescension";

const FEEDBACK_SYSTEM_TR: &str = "\
Sen bir sunum koçusun. Görevin: yapıcı, somut ve destekleyici geri bildirim vermek.

KURALLAR:
1. Kesinlikle JSON formatında yanıt ver (başka hiçbir metin ekleme)
2. Psikolojik teşhis koyma, terapi yapma
3. Her madde MAX 1 cümle olsun
4. Somut ve eyleme dönük ol
5. Yargılama, küçümseme yapma";

const FEEDBACK_FORMAT_EN: &str = r#"{
  "strengths": ["Strength 1 (with evidence)", "Strength 2", "Strength 3"],
  "improvements": ["Improvement 1 (with how-to)", "Improvement 2", "Improvement 3"],
  "tips": [
    {"section": "Introduction", "tip": "Specific suggestion"},
    {"section": "Main Part", "tip": "Specific suggestion"},
    {"section": "General", "tip": "General suggestion"}
  ]
}"#;

const FEEDBACK_FORMAT_TR: &str = r#"{
  "strengths": ["Güçlü yön 1 (kanıt ile)", "Güçlü yön 2", "Güçlü yön 3"],
  "improvements": ["İyileştirme 1 (nasıl yapacağı ile)", "İyileştirme 2", "İyileştirme 3"],
  "tips": [
    {"section": "Giriş", "tip": "Spesifik öneri"},
    {"section": "Ana Kısım", "tip": "Spesifik öneri"},
    {"section": "Genel", "tip": "Genel öneri"}
  ]
}"#;

/// Localised labels used in the feedback prompt body.
struct FeedbackLabels {
    outline: &'static str,
    transcript: &'static str,
    metrics: &'static str,
    pace: &'static str,
    words_per_min: &'static str,
    slow: &'static str,
    balanced: &'static str,
    fast: &'static str,
    fillers: &'static str,
    off_topic: &'static str,
    total: &'static str,
    off_topic_examples: &'static str,
    none: &'static str,
    required_format: &'static str,
}

impl FeedbackLabels {
    fn pace_label(&self, pace: PaceLabel) -> &'static str {
        match pace {
            PaceLabel::Slow => self.slow,
            PaceLabel::Balanced => self.balanced,
            PaceLabel::Fast => self.fast,
        }
    }
}

const LABELS_EN: FeedbackLabels = FeedbackLabels {
    outline: "PRESENTATION OUTLINE:",
    transcript: "SPOKEN TEXT (Transcript):",
    metrics: "METRICS:",
    pace: "Speaking pace",
    words_per_min: "words/min",
    slow: "slow",
    balanced: "balanced",
    fast: "fast",
    fillers: "Filler words",
    off_topic: "Off-topic segments",
    total: "total",
    off_topic_examples: "OFF-TOPIC EXAMPLES:",
    none: "None",
    required_format: "REQUIRED FORMAT (return ONLY this JSON, nothing else):",
};

const LABELS_TR: FeedbackLabels = FeedbackLabels {
    outline: "SUNUM METNİ (Outline):",
    transcript: "KONUŞULAN METİN (Transcript):",
    metrics: "METRİKLER:",
    pace: "Konuşma hızı",
    words_per_min: "kelime/dakika",
    slow: "yavaş",
    balanced: "dengeli",
    fast: "hızlı",
    fillers: "Dolgu kelimeleri",
    off_topic: "Konu dışı segmentler",
    total: "adet",
    off_topic_examples: "KONU DIŞI ÖRNEKLER:",
    none: "Yok",
    required_format: "ZORUNLU FORMAT (sadece bu JSON'u dön, başka hiçbir şey ekleme):",
};

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds JSON-answer prompts for one language.
///
/// # Example
/// ```rust
/// use presentation_coach::llm::PromptBuilder;
/// use presentation_coach::text::Language;
///
/// let prompt = PromptBuilder::new(Language::English)
///     .classification("Pricing", "Three tiers", "We offer three plans");
/// assert!(prompt.contains("Pricing"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    language: Language,
}

impl PromptBuilder {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Ask whether `block` covers the slide; expects `{alignment, reason}`.
    pub fn classification(&self, title: &str, bullets: &str, block: &str) -> String {
        let template = match self.language {
            Language::English => CLASSIFY_EN,
            Language::Turkish => CLASSIFY_TR,
        };
        fill(
            template,
            &[("{title}", title), ("{bullets}", bullets), ("{block}", block)],
        )
    }

    /// Ask for 2-3 suggested sentences; expects `{talking_points: [...]}`.
    pub fn talking_points(&self, title: &str, bullets: &str) -> String {
        let template = match self.language {
            Language::English => TALKING_POINTS_EN,
            Language::Turkish => TALKING_POINTS_TR,
        };
        fill(template, &[("{title}", title), ("{bullets}", bullets)])
    }

    /// Full coaching prompt; expects `{strengths, improvements, tips}`.
    pub fn feedback(
        &self,
        outline_text: &str,
        transcript_text: &str,
        metrics: &SpeechMetrics,
        alignment: &AlignmentResult,
    ) -> String {
        let (system, format, labels) = match self.language {
            Language::English => (FEEDBACK_SYSTEM_EN, FEEDBACK_FORMAT_EN, &LABELS_EN),
            Language::Turkish => (FEEDBACK_SYSTEM_TR, FEEDBACK_FORMAT_TR, &LABELS_TR),
        };

        let filler_summary = if metrics.filler_words.is_empty() {
            labels.none.to_string()
        } else {
            metrics
                .filler_words
                .iter()
                .take(MAX_FILLER_WORDS)
                .map(|fw| format!("{} ({}x)", fw.word, fw.count))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let off_topic = alignment.off_topic_segments();
        let examples = off_topic_examples(alignment);

        let mut prompt = String::with_capacity(4096);
        prompt.push_str(system);
        prompt.push_str(&format!("\n\n{}\n{}\n", labels.outline, outline_text));
        prompt.push_str(&format!("\n{}\n{}\n", labels.transcript, transcript_text));
        prompt.push_str(&format!("\n{}\n", labels.metrics));
        prompt.push_str(&format!(
            "- {}: {} {} ({})\n",
            labels.pace,
            metrics.wpm,
            labels.words_per_min,
            labels.pace_label(metrics.pace())
        ));
        prompt.push_str(&format!(
            "- {}: {} {} ({})\n",
            labels.fillers, metrics.filler_count, labels.total, filler_summary
        ));
        prompt.push_str(&format!(
            "- {}: {} {}\n",
            labels.off_topic,
            off_topic.len(),
            labels.total
        ));
        if !examples.is_empty() {
            prompt.push_str(&format!("\n{}\n", labels.off_topic_examples));
            for line in &examples {
                prompt.push_str(line);
                prompt.push('\n');
            }
        }
        prompt.push_str(&format!("\n{}\n{}", labels.required_format, format));
        prompt
    }
}

/// Substitute `placeholders` in one left-to-right pass, so placeholder-like
/// text inside the inserted values is left alone.
fn fill(template: &str, placeholders: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match placeholders.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `- Segment N: '<first 50 chars>...'` lines for the first few off-topic
/// segments.
fn off_topic_examples(alignment: &AlignmentResult) -> Vec<String> {
    alignment
        .off_topic_segments()
        .iter()
        .take(MAX_OFF_TOPIC_EXAMPLES)
        .map(|item| {
            let excerpt: String = item.segment_text.chars().take(OFF_TOPIC_EXCERPT_CHARS).collect();
            format!("- Segment {}: '{}...'", item.segment_idx + 1, excerpt)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
