//! Immutable annotation set
//!
//! The set of annotations owned by one item. Mutations never change a set in
//! place: `add`, `update` and `remove` take `&self` and return a new set, so
//! every render works from a consistent snapshot and an old snapshot can be
//! kept around for undo.

use crate::{text, Annotation, AnnotationError, AnnotationId, Result, TextRange};
use serde::{Deserialize, Serialize};

/// Annotations of a single content string, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    annotations: Vec<Annotation>,
}

impl AnnotationSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
        }
    }

    /// Build a set from annotations without validating them (e.g. data read from disk)
    pub fn from_unchecked(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }

    /// Return a new set with `annotation` appended.
    ///
    /// Rejects a blank note, an empty or inverted range, and any range sharing
    /// a char position with an existing annotation. `self` is left untouched.
    pub fn add(&self, annotation: Annotation) -> Result<Self> {
        if annotation.note().trim().is_empty() {
            return Err(AnnotationError::EmptyNote);
        }

        let range = annotation.range();
        if range.is_empty() {
            return Err(AnnotationError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }

        if let Some(existing) = self.overlapping(range).first() {
            return Err(AnnotationError::Overlap {
                existing: existing.id().clone(),
                start: range.start,
                end: range.end,
            });
        }

        tracing::debug!(
            id = %annotation.id(),
            start = range.start,
            end = range.end,
            "adding annotation"
        );

        let mut annotations = self.annotations.clone();
        annotations.push(annotation);
        Ok(Self { annotations })
    }

    /// Like [`add`](Self::add), but also checks the range against `content`
    pub fn add_for_content(&self, annotation: Annotation, content: &str) -> Result<Self> {
        annotation.range().check_bounds(text::char_len(content))?;
        self.add(annotation)
    }

    /// Return a new set where the annotation with `id` carries `note`.
    ///
    /// Unknown IDs leave the set unchanged.
    pub fn update(&self, id: &AnnotationId, note: impl Into<String>) -> Self {
        let note = note.into();
        if !self.contains(id) {
            tracing::debug!(%id, "update ignored: annotation not found");
            return self.clone();
        }

        let annotations = self
            .annotations
            .iter()
            .map(|a| if a.id() == id { a.with_note(note.as_str()) } else { a.clone() })
            .collect();
        Self { annotations }
    }

    /// Return a new set without the annotation with `id`.
    ///
    /// Unknown IDs leave the set unchanged.
    pub fn remove(&self, id: &AnnotationId) -> Self {
        if !self.contains(id) {
            tracing::debug!(%id, "remove ignored: annotation not found");
        }
        let annotations = self
            .annotations
            .iter()
            .filter(|a| a.id() != id)
            .cloned()
            .collect();
        Self { annotations }
    }

    /// Get an annotation by ID
    pub fn get(&self, id: &AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id() == id)
    }

    /// Check if an annotation exists
    pub fn contains(&self, id: &AnnotationId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Get the annotations as a slice, in insertion order
    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Get the number of annotations
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Annotations ordered by start offset (stable for equal starts)
    pub fn sorted_by_position(&self) -> Vec<&Annotation> {
        let mut sorted: Vec<&Annotation> = self.annotations.iter().collect();
        sorted.sort_by_key(|a| a.text_start());
        sorted
    }

    /// Annotations ordered by creation date (oldest first)
    pub fn sorted_by_date(&self) -> Vec<&Annotation> {
        let mut sorted: Vec<&Annotation> = self.annotations.iter().collect();
        sorted.sort_by_key(|a| a.created_at());
        sorted
    }

    /// Find the annotation covering a char offset
    pub fn find_at(&self, offset: usize) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.range().contains(offset))
    }

    /// Find annotations sharing at least one char position with `range`
    pub fn overlapping(&self, range: TextRange) -> Vec<&Annotation> {
        self.annotations
            .iter()
            .filter(|a| a.range().overlaps(&range))
            .collect()
    }

    /// Annotations whose cached text no longer matches `content`
    pub fn drifted(&self, content: &str) -> Vec<&Annotation> {
        self.annotations
            .iter()
            .filter(|a| a.is_drifted(content))
            .collect()
    }

    /// Check every invariant the renderer relies on against `content`.
    ///
    /// Returns the first violation found, in position order.
    pub fn validate_against(&self, content: &str) -> Result<()> {
        let len = text::char_len(content);
        let mut previous: Option<&Annotation> = None;

        for annotation in self.sorted_by_position() {
            annotation.range().check_bounds(len)?;
            if let Some(prev) = previous {
                if prev.range().overlaps(&annotation.range()) {
                    return Err(AnnotationError::Overlap {
                        existing: prev.id().clone(),
                        start: annotation.text_start(),
                        end: annotation.text_end(),
                    });
                }
            }
            previous = Some(annotation);
        }

        Ok(())
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_annotation(start: usize, end: usize, note: &str) -> Annotation {
        Annotation::new(TextRange::new(start, end), "", note)
    }

    #[test]
    fn test_add_returns_new_set() {
        let empty = AnnotationSet::new();
        let one = empty.add(make_annotation(0, 5, "greeting")).unwrap();

        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_add_rejects_empty_note() {
        let set = AnnotationSet::new()
            .add(make_annotation(0, 2, "first"))
            .unwrap();

        let err = set.add(make_annotation(4, 6, "  ")).unwrap_err();

        assert_eq!(err, AnnotationError::EmptyNote);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_add_rejects_overlap() {
        let first = make_annotation(0, 5, "first");
        let first_id = first.id().clone();
        let set = AnnotationSet::new().add(first).unwrap();

        let err = set.add(make_annotation(3, 8, "second")).unwrap_err();

        assert_eq!(
            err,
            AnnotationError::Overlap {
                existing: first_id,
                start: 3,
                end: 8
            }
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_add_rejects_identical_and_nested_ranges() {
        let set = AnnotationSet::new().add(make_annotation(2, 8, "outer")).unwrap();

        assert!(set.add(make_annotation(2, 8, "same")).is_err());
        assert!(set.add(make_annotation(3, 5, "inner")).is_err());
        assert!(set.add(make_annotation(0, 10, "around")).is_err());
    }

    #[test]
    fn test_add_accepts_adjacent_ranges() {
        let set = AnnotationSet::new()
            .add(make_annotation(0, 5, "left"))
            .unwrap()
            .add(make_annotation(5, 8, "right"))
            .unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_add_rejects_inverted_range() {
        let err = AnnotationSet::new()
            .add(make_annotation(5, 5, "note"))
            .unwrap_err();
        assert_eq!(err, AnnotationError::InvalidRange { start: 5, end: 5 });
    }

    #[test]
    fn test_add_for_content_checks_bounds() {
        let err = AnnotationSet::new()
            .add_for_content(make_annotation(3, 9, "note"), "abcdef")
            .unwrap_err();
        assert_eq!(err, AnnotationError::OutOfBounds { start: 3, end: 9, len: 6 });
    }

    #[test]
    fn test_update_note() {
        let ann = make_annotation(0, 5, "old");
        let id = ann.id().clone();
        let set = AnnotationSet::new().add(ann).unwrap();

        let updated = set.update(&id, "new");

        assert_eq!(updated.get(&id).unwrap().note(), "new");
        assert_eq!(set.get(&id).unwrap().note(), "old");
    }

    #[test]
    fn test_update_allows_empty_note() {
        let ann = make_annotation(0, 5, "old");
        let id = ann.id().clone();
        let set = AnnotationSet::new().add(ann).unwrap();

        assert_eq!(set.update(&id, "").get(&id).unwrap().note(), "");
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let set = AnnotationSet::new().add(make_annotation(0, 5, "note")).unwrap();
        let updated = set.update(&AnnotationId::from("missing"), "changed");
        assert_eq!(updated, set);
    }

    #[test]
    fn test_remove() {
        let ann = make_annotation(0, 5, "note");
        let id = ann.id().clone();
        let set = AnnotationSet::new().add(ann).unwrap();

        assert!(set.remove(&id).is_empty());
        assert_eq!(set.remove(&AnnotationId::from("missing")), set);
    }

    #[test]
    fn test_sorted_by_position_and_find_at() {
        let set = AnnotationSet::new()
            .add(make_annotation(10, 12, "late"))
            .unwrap()
            .add(make_annotation(2, 4, "early"))
            .unwrap();

        let sorted: Vec<&str> = set.sorted_by_position().iter().map(|a| a.note()).collect();
        assert_eq!(sorted, vec!["early", "late"]);

        assert_eq!(set.find_at(3).unwrap().note(), "early");
        assert!(set.find_at(4).is_none());
    }

    #[test]
    fn test_validate_against_content() {
        let content = "abcdef";
        let good = AnnotationSet::new()
            .add(Annotation::from_content(content, TextRange::new(1, 3), "bc").unwrap())
            .unwrap();
        assert!(good.validate_against(content).is_ok());
        assert!(good.drifted(content).is_empty());

        let stale = AnnotationSet::from_unchecked(vec![make_annotation(4, 10, "stale")]);
        assert!(matches!(
            stale.validate_against(content),
            Err(AnnotationError::OutOfBounds { .. })
        ));

        let overlapping = AnnotationSet::from_unchecked(vec![
            make_annotation(0, 3, "a"),
            make_annotation(2, 5, "b"),
        ]);
        assert!(matches!(
            overlapping.validate_against(content),
            Err(AnnotationError::Overlap { .. })
        ));
    }

    #[test]
    fn test_serializes_as_array() {
        let set = AnnotationSet::new().add(make_annotation(0, 1, "n")).unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());

        let parsed: AnnotationSet = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, set);
    }

    proptest! {
        #[test]
        fn prop_accepted_annotations_never_share_a_position(
            ranges in proptest::collection::vec((0usize..50, 1usize..10), 0..20)
        ) {
            let mut set = AnnotationSet::new();
            for (start, len) in ranges {
                let candidate = make_annotation(start, start + len, "note");
                let clashes = !set.overlapping(candidate.range()).is_empty();
                match set.add(candidate) {
                    Ok(next) => {
                        prop_assert!(!clashes);
                        set = next;
                    }
                    Err(err) => {
                        prop_assert!(clashes);
                        let is_overlap = matches!(err, AnnotationError::Overlap { .. });
                        prop_assert!(is_overlap);
                    }
                }
            }

            let sorted = set.sorted_by_position();
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].text_end() <= pair[1].text_start());
            }
        }
    }
}
