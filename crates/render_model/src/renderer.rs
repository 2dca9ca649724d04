//! Annotation rendering
//!
//! Splits content into plain and highlighted segments in a single
//! left-to-right pass over the annotations sorted by start offset. The
//! segments always partition the content: concatenating their text gives the
//! content back unchanged, which is what lets the resolver map selections
//! over the rendered segments back to content offsets.

use crate::{Rendering, Segment, SkipReason, SkippedAnnotation};
use annotation_model::{Annotation, TextRange};

/// What to do with an annotation that ends past the content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Leave it out of the rendering
    #[default]
    Drop,
    /// Highlight what is left of it, up to the end of the content or the
    /// start of the next annotation that fits, whichever comes first
    Clamp,
}

/// Configuration for the annotation renderer
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    pub stale_policy: StalePolicy,
}

/// Renders content with its annotations as display segments
#[derive(Debug, Clone, Default)]
pub struct AnnotationRenderer {
    config: RenderConfig,
}

impl AnnotationRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render `content` with `annotations` (in any order).
    ///
    /// Annotations that cannot be rendered without breaking the partition
    /// (empty range, past the end, overlapping an earlier one) are reported in
    /// [`Rendering::skipped`] and the rest is rendered normally.
    pub fn render<'a, I>(&self, content: &str, annotations: I) -> Rendering
    where
        I: IntoIterator<Item = &'a Annotation>,
    {
        let mut sorted: Vec<&Annotation> = annotations.into_iter().collect();
        if sorted.is_empty() {
            return Rendering {
                segments: vec![Segment::plain(content)],
                skipped: Vec::new(),
            };
        }
        sorted.sort_by_key(|a| a.text_start());

        // Byte index of every char boundary, including the end of the content
        let boundaries: Vec<usize> = content
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(content.len()))
            .collect();
        let len = boundaries.len() - 1;
        let slice = |start: usize, end: usize| &content[boundaries[start]..boundaries[end]];

        // Starts of the annotations that fit as stored, in order; a clamped
        // annotation never reaches into one of them
        let fitting_starts: Vec<usize> = sorted
            .iter()
            .map(|a| a.range())
            .filter(|range| !range.is_empty() && range.end <= len)
            .map(|range| range.start)
            .collect();

        let mut segments = Vec::with_capacity(sorted.len() * 2 + 1);
        let mut skipped = Vec::new();
        let mut cursor = 0;
        let mut previous: Option<&Annotation> = None;

        for annotation in sorted {
            let range = match self.check(annotation, len, &fitting_starts, cursor, previous) {
                Ok(range) => range,
                Err(reason) => {
                    tracing::warn!(
                        id = %annotation.id(),
                        start = annotation.text_start(),
                        end = annotation.text_end(),
                        ?reason,
                        "skipping annotation"
                    );
                    skipped.push(SkippedAnnotation {
                        annotation_id: annotation.id().clone(),
                        range: annotation.range(),
                        reason,
                    });
                    continue;
                }
            };

            if cursor < range.start {
                segments.push(Segment::plain(slice(cursor, range.start)));
            }
            segments.push(Segment::Highlighted {
                text: slice(range.start, range.end).to_string(),
                annotation_id: annotation.id().clone(),
                note: annotation.note().to_string(),
            });
            cursor = range.end;
            previous = Some(annotation);
        }

        if cursor < len || segments.is_empty() {
            segments.push(Segment::plain(slice(cursor, len)));
        }

        Rendering { segments, skipped }
    }

    /// Range to highlight for `annotation`, or why it has to be skipped
    fn check(
        &self,
        annotation: &Annotation,
        len: usize,
        fitting_starts: &[usize],
        cursor: usize,
        previous: Option<&Annotation>,
    ) -> Result<TextRange, SkipReason> {
        let mut range = annotation.range();

        if range.is_empty() {
            return Err(SkipReason::EmptyRange);
        }
        if range.end > len {
            let limit = fitting_starts
                .iter()
                .copied()
                .find(|&start| start >= range.start)
                .map_or(len, |start| start.min(len));
            match self.config.stale_policy {
                StalePolicy::Clamp if range.start < limit => range.end = limit,
                _ => return Err(SkipReason::OutOfBounds { len }),
            }
        }
        if range.start < cursor {
            if let Some(prev) = previous {
                return Err(SkipReason::Overlaps {
                    previous: prev.id().clone(),
                });
            }
        }

        Ok(range)
    }
}

/// Render with the default configuration
pub fn render_segments<'a, I>(content: &str, annotations: I) -> Rendering
where
    I: IntoIterator<Item = &'a Annotation>,
{
    AnnotationRenderer::default().render(content, annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use annotation_model::{AnnotationId, AnnotationSet};
    use proptest::prelude::*;

    fn make_annotation(content: &str, start: usize, end: usize, note: &str) -> Annotation {
        Annotation::from_content(content, TextRange::new(start, end), note).unwrap()
    }

    fn raw_annotation(id: &str, start: usize, end: usize) -> Annotation {
        Annotation::with_id(
            AnnotationId::from(id),
            TextRange::new(start, end),
            "",
            id,
            fixed_date(),
        )
    }

    fn fixed_date() -> chrono::DateTime<chrono::Utc> {
        "2024-01-15T00:00:00Z".parse().unwrap()
    }

    fn summarize(rendering: &Rendering) -> Vec<(bool, &str)> {
        rendering
            .segments
            .iter()
            .map(|s| (s.is_highlighted(), s.text()))
            .collect()
    }

    #[test]
    fn test_greeting_scenario() {
        let content = "Hello world";
        let set = AnnotationSet::new()
            .add(make_annotation(content, 0, 5, "greeting"))
            .unwrap();

        let rendering = render_segments(content, &set);

        assert_eq!(summarize(&rendering), vec![(true, "Hello"), (false, " world")]);
        assert_eq!(rendering.segments[0].note(), Some("greeting"));
        assert!(rendering.is_complete());
    }

    #[test]
    fn test_two_annotations_scenario() {
        let content = "abcdef";
        let set = AnnotationSet::new()
            .add(make_annotation(content, 4, 5, "e"))
            .unwrap()
            .add(make_annotation(content, 1, 3, "bc"))
            .unwrap();

        let rendering = render_segments(content, &set);

        assert_eq!(
            summarize(&rendering),
            vec![(false, "a"), (true, "bc"), (false, "d"), (true, "e"), (false, "f")]
        );
    }

    #[test]
    fn test_empty_set_is_single_plain_segment() {
        let rendering = render_segments("Morning glory", &AnnotationSet::new());
        assert_eq!(rendering.segments, vec![Segment::plain("Morning glory")]);

        let empty = render_segments("", &AnnotationSet::new());
        assert_eq!(empty.segments, vec![Segment::plain("")]);
    }

    #[test]
    fn test_annotation_covering_everything() {
        let content = "verse";
        let set = AnnotationSet::new()
            .add(make_annotation(content, 0, 5, "all"))
            .unwrap();

        let rendering = render_segments(content, &set);
        assert_eq!(summarize(&rendering), vec![(true, "verse")]);
    }

    #[test]
    fn test_multibyte_content() {
        let content = "¿Dónde está el café?";
        let set = AnnotationSet::new()
            .add(make_annotation(content, 1, 6, "where"))
            .unwrap();

        let rendering = render_segments(content, &set);
        assert_eq!(
            summarize(&rendering),
            vec![(false, "¿"), (true, "Dónde"), (false, " está el café?")]
        );
    }

    #[test]
    fn test_stale_annotation_is_dropped() {
        let stale = raw_annotation("stale", 3, 20);
        let fine = raw_annotation("fine", 0, 2);

        let rendering = render_segments("abcdef", [&stale, &fine]);

        assert_eq!(summarize(&rendering), vec![(true, "ab"), (false, "cdef")]);
        assert_eq!(rendering.skipped.len(), 1);
        assert_eq!(rendering.skipped[0].reason, SkipReason::OutOfBounds { len: 6 });
    }

    #[test]
    fn test_stale_annotation_is_clamped() {
        let stale = raw_annotation("stale", 3, 20);
        let renderer = AnnotationRenderer::new(RenderConfig {
            stale_policy: StalePolicy::Clamp,
        });

        let rendering = renderer.render("abcdef", [&stale]);

        assert_eq!(summarize(&rendering), vec![(false, "abc"), (true, "def")]);
        assert!(rendering.is_complete());
    }

    #[test]
    fn test_clamped_annotation_stops_at_next_fitting_one() {
        let stale = raw_annotation("stale", 2, 50);
        let fine = raw_annotation("fine", 4, 6);
        let renderer = AnnotationRenderer::new(RenderConfig {
            stale_policy: StalePolicy::Clamp,
        });

        let rendering = renderer.render("héllo☕x", [&fine, &stale]);

        assert_eq!(
            summarize(&rendering),
            vec![(false, "hé"), (true, "ll"), (true, "o☕"), (false, "x")]
        );
        assert_eq!(rendering.segments[1].annotation_id(), Some(&AnnotationId::from("stale")));
        assert_eq!(rendering.segments[2].annotation_id(), Some(&AnnotationId::from("fine")));
        assert!(rendering.skipped.is_empty());
    }

    #[test]
    fn test_clamped_annotation_yields_to_one_at_same_start() {
        let stale = raw_annotation("stale", 1, 30);
        let fine = raw_annotation("fine", 1, 3);
        let renderer = AnnotationRenderer::new(RenderConfig {
            stale_policy: StalePolicy::Clamp,
        });

        let rendering = renderer.render("abcdef", [&stale, &fine]);

        assert_eq!(summarize(&rendering), vec![(false, "a"), (true, "bc"), (false, "def")]);
        assert_eq!(rendering.skipped.len(), 1);
        assert_eq!(rendering.skipped[0].annotation_id, AnnotationId::from("stale"));
        assert_eq!(rendering.skipped[0].reason, SkipReason::OutOfBounds { len: 6 });
    }

    #[test]
    fn test_overlapping_annotation_is_skipped() {
        let first = raw_annotation("first", 0, 5);
        let second = raw_annotation("second", 3, 8);

        let rendering = render_segments("0123456789", [&second, &first]);

        assert_eq!(summarize(&rendering), vec![(true, "01234"), (false, "56789")]);
        assert_eq!(
            rendering.skipped[0].reason,
            SkipReason::Overlaps {
                previous: AnnotationId::from("first")
            }
        );
    }

    #[test]
    fn test_empty_range_is_skipped() {
        let empty = raw_annotation("empty", 2, 2);
        let rendering = render_segments("abc", [&empty]);

        assert_eq!(rendering.segments, vec![Segment::plain("abc")]);
        assert_eq!(rendering.skipped[0].reason, SkipReason::EmptyRange);
    }

    #[test]
    fn test_render_is_idempotent() {
        let content = "In binary we trust and find";
        let set = AnnotationSet::new()
            .add(make_annotation(content, 3, 9, "binary"))
            .unwrap();

        assert_eq!(render_segments(content, &set), render_segments(content, &set));
    }

    /// Content plus a valid, non-overlapping annotation set over it
    fn content_and_annotations() -> impl Strategy<Value = (String, AnnotationSet)> {
        "[a-zé ☕\n]{0,40}".prop_flat_map(|content| {
            let len = content.chars().count();
            let cuts = proptest::collection::btree_set(0..=len, 0..8);
            (Just(content), cuts)
        })
        .prop_map(|(content, cuts)| {
            let cuts: Vec<usize> = cuts.into_iter().collect();
            let mut set = AnnotationSet::new();
            for pair in cuts.chunks(2) {
                if let [start, end] = pair {
                    let ann = Annotation::from_content(&content, TextRange::new(*start, *end), "note")
                        .unwrap();
                    set = set.add(ann).unwrap();
                }
            }
            (content, set)
        })
    }

    proptest! {
        #[test]
        fn prop_segments_reproduce_content((content, set) in content_and_annotations()) {
            let rendering = render_segments(&content, &set);
            prop_assert_eq!(rendering.text(), content);
            prop_assert!(rendering.is_complete());
        }

        #[test]
        fn prop_segments_are_ordered_and_disjoint((content, set) in content_and_annotations()) {
            let rendering = render_segments(&content, &set);
            let ranges = rendering.segment_ranges();
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            prop_assert_eq!(rendering.highlights().count(), set.len());
            for (segment, range) in rendering.segments.iter().zip(&ranges) {
                if let Some(id) = segment.annotation_id() {
                    prop_assert_eq!(set.get(id).unwrap().range(), *range);
                }
            }
        }
    }
}
