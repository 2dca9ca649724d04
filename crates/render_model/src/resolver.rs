//! Selection-to-offset resolution
//!
//! Once an item has annotations its content is displayed as several leaves
//! (one per segment), so a selection point is only known relative to the leaf
//! it falls in. Resolution walks the leaves in order, accumulating their
//! lengths, until it reaches the leaf holding the selection start. Only the
//! start is resolved; the end is derived from the selected text's length,
//! which is valid because the leaves concatenate to the content unchanged.

use crate::{RenderError, Result, Segment};
use annotation_model::{text, TextRange};
use serde::{Deserialize, Serialize};

/// A rendered unit of text that a selection can point into
pub trait TextLeaf {
    /// Text of the leaf exactly as displayed
    fn leaf_text(&self) -> &str;
}

impl TextLeaf for Segment {
    fn leaf_text(&self) -> &str {
        self.text()
    }
}

impl TextLeaf for str {
    fn leaf_text(&self) -> &str {
        self
    }
}

impl TextLeaf for String {
    fn leaf_text(&self) -> &str {
        self
    }
}

impl<T: TextLeaf + ?Sized> TextLeaf for &T {
    fn leaf_text(&self) -> &str {
        (**self).leaf_text()
    }
}

/// A point inside a leaf: leaf index plus char offset within that leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafPoint {
    pub leaf: usize,
    pub offset: usize,
}

impl LeafPoint {
    pub fn new(leaf: usize, offset: usize) -> Self {
        Self { leaf, offset }
    }
}

/// A selection over rendered leaves
///
/// The anchor is where the selection started and the focus where it ended;
/// a backwards selection has its focus before its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafSelection {
    pub anchor: LeafPoint,
    pub focus: LeafPoint,
}

impl LeafSelection {
    pub fn new(anchor: LeafPoint, focus: LeafPoint) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed selection (caret only)
    pub fn collapsed(point: LeafPoint) -> Self {
        Self {
            anchor: point,
            focus: point,
        }
    }

    /// Check if anchor and focus are the same point
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

/// Flat char range a selection maps to, with the selected text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRange {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl ResolvedRange {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }

    /// Check that `content[start..end]` is the selected text
    pub fn verify(&self, content: &str) -> Result<()> {
        match text::slice(content, self.start, self.end) {
            Some(found) if found == self.text => Ok(()),
            _ => Err(RenderError::TextMismatch {
                start: self.start,
                end: self.end,
            }),
        }
    }
}

/// Flatten a leaf point into a char offset of the concatenated leaves
pub fn flatten_point<L: TextLeaf>(leaves: &[L], point: LeafPoint) -> Result<usize> {
    let mut accumulated = 0;

    for (index, leaf) in leaves.iter().enumerate() {
        let leaf_len = text::char_len(leaf.leaf_text());
        if index == point.leaf {
            if point.offset > leaf_len {
                break;
            }
            return Ok(accumulated + point.offset);
        }
        accumulated += leaf_len;
    }

    Err(RenderError::PointOutOfRange {
        leaf: point.leaf,
        offset: point.offset,
    })
}

/// Find the leaf point for a flat char offset.
///
/// An offset on the boundary between two leaves resolves to the start of the
/// later leaf; the end of the content resolves to the end of the last leaf.
pub fn locate_offset<L: TextLeaf>(leaves: &[L], offset: usize) -> Option<LeafPoint> {
    let mut accumulated = 0;

    for (index, leaf) in leaves.iter().enumerate() {
        let leaf_len = text::char_len(leaf.leaf_text());
        if offset < accumulated + leaf_len {
            return Some(LeafPoint::new(index, offset - accumulated));
        }
        accumulated += leaf_len;
    }

    if offset == accumulated {
        let last = leaves.len().checked_sub(1)?;
        let last_len = text::char_len(leaves[last].leaf_text());
        return Some(LeafPoint::new(last, last_len));
    }

    None
}

/// Resolve a selection over `leaves` into flat content offsets.
///
/// `selected_text` is the text the platform reports for the selection; the
/// end offset is `start + chars(selected_text)`.
pub fn resolve_selection<L: TextLeaf>(
    leaves: &[L],
    selection: &LeafSelection,
    selected_text: &str,
) -> Result<ResolvedRange> {
    if selection.is_collapsed() {
        return Err(RenderError::Collapsed);
    }
    if selected_text.is_empty() {
        return Err(RenderError::EmptyText);
    }

    let anchor = flatten_point(leaves, selection.anchor)?;
    let focus = flatten_point(leaves, selection.focus)?;
    if anchor == focus {
        return Err(RenderError::Collapsed);
    }

    let start = anchor.min(focus);
    let end = start + text::char_len(selected_text);

    Ok(ResolvedRange {
        start,
        end,
        text: selected_text.to_string(),
    })
}
