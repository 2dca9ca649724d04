//! Display segment types

use annotation_model::{AnnotationId, TextRange};
use serde::{Deserialize, Serialize};

/// A contiguous run of content text, either plain or highlighted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    /// Text with no annotation
    Plain { text: String },
    /// Text covered by an annotation
    #[serde(rename_all = "camelCase")]
    Highlighted {
        text: String,
        annotation_id: AnnotationId,
        note: String,
    },
}

impl Segment {
    /// Create a plain segment
    pub fn plain(text: impl Into<String>) -> Self {
        Segment::Plain { text: text.into() }
    }

    /// Get the segment text
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain { text } | Segment::Highlighted { text, .. } => text,
        }
    }

    /// Length of the segment text in chars
    pub fn char_len(&self) -> usize {
        self.text().chars().count()
    }

    pub fn is_highlighted(&self) -> bool {
        matches!(self, Segment::Highlighted { .. })
    }

    /// Get the annotation behind a highlighted segment
    pub fn annotation_id(&self) -> Option<&AnnotationId> {
        match self {
            Segment::Highlighted { annotation_id, .. } => Some(annotation_id),
            Segment::Plain { .. } => None,
        }
    }

    /// Get the note of a highlighted segment
    pub fn note(&self) -> Option<&str> {
        match self {
            Segment::Highlighted { note, .. } => Some(note),
            Segment::Plain { .. } => None,
        }
    }
}

/// Why the renderer left an annotation out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum SkipReason {
    /// `start >= end`
    EmptyRange,
    /// The range ends past the content (stale after a content edit)
    OutOfBounds { len: usize },
    /// The range starts inside an annotation already rendered
    Overlaps { previous: AnnotationId },
}

/// An annotation that could not be rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAnnotation {
    pub annotation_id: AnnotationId,
    pub range: TextRange,
    pub reason: SkipReason,
}

/// Output of a render pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendering {
    /// Segments in left-to-right order, partitioning the content
    pub segments: Vec<Segment>,
    /// Annotations dropped from this pass
    pub skipped: Vec<SkippedAnnotation>,
}

impl Rendering {
    /// Concatenated text of all segments
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Highlighted segments only
    pub fn highlights(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_highlighted())
    }

    /// Check if every annotation made it into the output
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Char range each segment covers in the content, in order
    pub fn segment_ranges(&self) -> Vec<TextRange> {
        let mut cursor = 0;
        self.segments
            .iter()
            .map(|segment| {
                let start = cursor;
                cursor += segment.char_len();
                TextRange::new(start, cursor)
            })
            .collect()
    }
}
