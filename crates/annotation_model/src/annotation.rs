//! Annotation - a note attached to a char range of an item's content
//!
//! An annotation anchors to `[text_start, text_end)` in the content string it
//! was created against and caches the selected text at creation time. The
//! offsets are not re-mapped when the content changes; see
//! [`Annotation::is_drifted`] for detecting that case.

use crate::{text, AnnotationError, AnnotationId, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Half-open char range `[start, end)` within a content string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Create a new range
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of chars covered
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range covers no chars (also true for inverted ranges)
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this range contains a char offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Check if two ranges share at least one char position
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check that the range is non-empty and ends within `len` chars
    pub fn check_bounds(&self, len: usize) -> Result<()> {
        if self.is_empty() {
            return Err(AnnotationError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.end > len {
            return Err(AnnotationError::OutOfBounds {
                start: self.start,
                end: self.end,
                len,
            });
        }
        Ok(())
    }
}

/// A note attached to a substring of an item's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique identifier, immutable
    id: AnnotationId,
    /// Start char offset (inclusive)
    text_start: usize,
    /// End char offset (exclusive)
    text_end: usize,
    /// Copy of `content[text_start..text_end]` taken at creation
    selected_text: String,
    /// User-authored note
    note: String,
    /// When the annotation was created
    created_at: DateTime<Utc>,
}

impl Annotation {
    /// Create a new annotation with a fresh ID and the current time
    pub fn new(range: TextRange, selected_text: impl Into<String>, note: impl Into<String>) -> Self {
        Self::with_id(AnnotationId::new(), range, selected_text, note, Utc::now())
    }

    /// Create an annotation from a content string, copying the selected text out of it.
    ///
    /// The note is trimmed and must not be empty.
    pub fn from_content(content: &str, range: TextRange, note: &str) -> Result<Self> {
        range.check_bounds(text::char_len(content))?;
        let note = note.trim();
        if note.is_empty() {
            return Err(AnnotationError::EmptyNote);
        }
        let selected = text::slice(content, range.start, range.end).ok_or(
            AnnotationError::OutOfBounds {
                start: range.start,
                end: range.end,
                len: text::char_len(content),
            },
        )?;
        Ok(Self::new(range, selected, note))
    }

    /// Create an annotation with a specific ID and date (for loading and undo)
    pub fn with_id(
        id: AnnotationId,
        range: TextRange,
        selected_text: impl Into<String>,
        note: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text_start: range.start,
            text_end: range.end,
            selected_text: selected_text.into(),
            note: note.into(),
            created_at,
        }
    }

    /// Get the annotation ID
    pub fn id(&self) -> &AnnotationId {
        &self.id
    }

    /// Get the start offset
    pub fn text_start(&self) -> usize {
        self.text_start
    }

    /// Get the end offset
    pub fn text_end(&self) -> usize {
        self.text_end
    }

    /// Get the anchored range
    pub fn range(&self) -> TextRange {
        TextRange::new(self.text_start, self.text_end)
    }

    /// Get the text cached at creation time
    pub fn selected_text(&self) -> &str {
        &self.selected_text
    }

    /// Get the note
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Get the creation date
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Return a copy of this annotation carrying a different note
    pub fn with_note(&self, note: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            ..self.clone()
        }
    }

    /// Check if the cached selected text no longer matches `content` at this range.
    ///
    /// Out-of-bounds ranges count as drifted.
    pub fn is_drifted(&self, content: &str) -> bool {
        text::slice(content, self.text_start, self.text_end)
            .map_or(true, |current| current != self.selected_text)
    }
}
