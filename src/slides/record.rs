//! Typed slide inputs and per-slide coverage results.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// One slide as supplied by the outline extractor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideRecord {
    /// 1-based position in the deck.
    #[serde(rename = "slide_number")]
    pub number: usize,
    pub title: String,
    /// Bullet text concatenated into one string.
    pub bullets: String,
}

/// A slide as it arrives on the wire, before numbering.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SlideInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bullets: String,
}

impl SlideRecord {
    pub fn new(number: usize, title: impl Into<String>, bullets: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            bullets: bullets.into(),
        }
    }

    /// Number slides by position; untitled slides become `"Slide N"`.
    pub fn from_inputs(inputs: Vec<SlideInput>) -> Vec<Self> {
        inputs
            .into_iter()
            .enumerate()
            .map(|(i, input)| {
                let number = i + 1;
                let title = input
                    .title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| format!("Slide {number}"));
                Self::new(number, title, input.bullets)
            })
            .collect()
    }
}

/// Verdict for one transcript block against one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockAlignment {
    High,
    Partial,
    None,
}

impl BlockAlignment {
    /// Parse the exact labels the classifier prompt asks for.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "high" => Some(BlockAlignment::High),
            "partial" => Some(BlockAlignment::Partial),
            "none" => Some(BlockAlignment::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockVerdict {
    pub alignment: BlockAlignment,
    pub reason: String,
}

impl BlockVerdict {
    pub fn new(alignment: BlockAlignment, reason: impl Into<String>) -> Self {
        Self {
            alignment,
            reason: reason.into(),
        }
    }
}

/// Overall coverage of one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageStatus {
    Covered,
    Partial,
    Missing,
}

/// Aggregate block verdicts: any `high` wins, then any `partial`, otherwise
/// missing.  No verdicts at all means missing.
pub fn determine_slide_status(verdicts: &[BlockVerdict]) -> CoverageStatus {
    if verdicts.iter().any(|v| v.alignment == BlockAlignment::High) {
        CoverageStatus::Covered
    } else if verdicts.iter().any(|v| v.alignment == BlockAlignment::Partial) {
        CoverageStatus::Partial
    } else {
        CoverageStatus::Missing
    }
}

/// Coverage verdict for one slide plus any suggested talking points.
///
/// The status is derived from the verdicts at construction; talking points
/// can only be attached to slides that are not covered.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideCoverageResult {
    slide: SlideRecord,
    status: CoverageStatus,
    verdicts: Vec<BlockVerdict>,
    talking_points: Vec<String>,
}

impl SlideCoverageResult {
    pub fn new(slide: SlideRecord, verdicts: Vec<BlockVerdict>) -> Self {
        Self {
            status: determine_slide_status(&verdicts),
            slide,
            verdicts,
            talking_points: Vec::new(),
        }
    }

    pub fn slide(&self) -> &SlideRecord {
        &self.slide
    }

    pub fn status(&self) -> CoverageStatus {
        self.status
    }

    pub fn verdicts(&self) -> &[BlockVerdict] {
        &self.verdicts
    }

    pub fn needs_suggestion(&self) -> bool {
        self.status != CoverageStatus::Covered
    }

    pub fn talking_points(&self) -> &[String] {
        &self.talking_points
    }

    /// Attach talking points.  Ignored for covered slides.
    pub fn set_talking_points(&mut self, points: Vec<String>) {
        if self.needs_suggestion() {
            self.talking_points = points;
        } else if !points.is_empty() {
            log::debug!(
                "slides: ignoring talking points for covered slide {}",
                self.slide.number
            );
        }
    }
}

impl Serialize for SlideCoverageResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SlideCoverageResult", 7)?;
        s.serialize_field("slide_number", &self.slide.number)?;
        s.serialize_field("title", &self.slide.title)?;
        s.serialize_field("bullets", &self.slide.bullets)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("alignment_details", &self.verdicts)?;
        s.serialize_field("needs_suggestion", &self.needs_suggestion())?;
        s.serialize_field("talking_points", &self.talking_points)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(alignment: BlockAlignment) -> BlockVerdict {
        BlockVerdict::new(alignment, "")
    }

    #[test]
    fn one_high_among_many_is_covered() {
        let verdicts = vec![
            v(BlockAlignment::None),
            v(BlockAlignment::Partial),
            v(BlockAlignment::High),
            v(BlockAlignment::None),
        ];
        assert_eq!(determine_slide_status(&verdicts), CoverageStatus::Covered);
    }

    #[test]
    fn partial_without_high_is_partial() {
        let verdicts = vec![v(BlockAlignment::None), v(BlockAlignment::Partial)];
        assert_eq!(determine_slide_status(&verdicts), CoverageStatus::Partial);
    }

    #[test]
    fn all_none_or_empty_is_missing() {
        assert_eq!(
            determine_slide_status(&[v(BlockAlignment::None)]),
            CoverageStatus::Missing
        );
        assert_eq!(determine_slide_status(&[]), CoverageStatus::Missing);
    }

    #[test]
    fn labels_parse_exactly() {
        assert_eq!(BlockAlignment::from_label("high"), Some(BlockAlignment::High));
        assert_eq!(BlockAlignment::from_label("none"), Some(BlockAlignment::None));
        assert_eq!(BlockAlignment::from_label("HIGH"), None);
        assert_eq!(BlockAlignment::from_label("maybe"), None);
    }

    #[test]
    fn covered_slide_never_takes_talking_points() {
        let slide = SlideRecord::new(1, "Intro", "");
        let mut result = SlideCoverageResult::new(slide, vec![v(BlockAlignment::High)]);
        result.set_talking_points(vec!["a".into(), "b".into()]);
        assert!(!result.needs_suggestion());
        assert!(result.talking_points().is_empty());
    }

    #[test]
    fn missing_slide_takes_talking_points() {
        let slide = SlideRecord::new(2, "Costs", "");
        let mut result = SlideCoverageResult::new(slide, Vec::new());
        result.set_talking_points(vec!["a".into(), "b".into()]);
        assert!(result.needs_suggestion());
        assert_eq!(result.talking_points().len(), 2);
    }

    #[test]
    fn inputs_are_numbered_and_titled() {
        let slides = SlideRecord::from_inputs(vec![
            SlideInput {
                title: Some("Intro".into()),
                bullets: "hello".into(),
            },
            SlideInput::default(),
        ]);
        assert_eq!(slides[0], SlideRecord::new(1, "Intro", "hello"));
        assert_eq!(slides[1].number, 2);
        assert_eq!(slides[1].title, "Slide 2");
    }

    #[test]
    fn serializes_with_derived_fields() {
        let result = SlideCoverageResult::new(
            SlideRecord::new(3, "Roadmap", "Q1"),
            vec![BlockVerdict::new(BlockAlignment::Partial, "brief")],
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["slide_number"], 3);
        assert_eq!(json["status"], "partial");
        assert_eq!(json["needs_suggestion"], true);
        assert_eq!(json["alignment_details"][0]["alignment"], "partial");
        assert_eq!(json["talking_points"].as_array().unwrap().len(), 0);
    }
}
