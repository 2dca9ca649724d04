//! Plain-text formatting of items and renderings

use annotation_model::AnnotationSet;
use library::{CollectionStats, Item};
use render_model::{Rendering, Segment};
use std::fmt::Write;

/// Number of ID characters shown in listings
const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// One-line summary used by `list`
pub fn item_line(item: &Item) -> String {
    let mut line = format!(
        "{:<8}  {:<6}  {}",
        short_id(item.id().as_str()),
        item.kind(),
        item.title()
    );
    if let Some(artist) = item.artist() {
        let _ = write!(line, " - {artist}");
    }
    if let Some(year) = item.year() {
        let _ = write!(line, " ({year})");
    }
    match item.annotation_count() {
        0 => {}
        1 => line.push_str("  [1 note]"),
        n => {
            let _ = write!(line, "  [{n} notes]");
        }
    }
    line
}

/// `list --long` entry: the summary line with the excerpt indented below
pub fn item_entry(item: &Item) -> String {
    let mut entry = item_line(item);
    entry.push('\n');
    for line in item.excerpt().lines() {
        let _ = writeln!(entry, "    {line}");
    }
    entry.push('\n');
    entry
}

/// Metadata block printed above the content by `show`
pub fn item_header(item: &Item) -> String {
    let mut out = format!("{}\n", item.title());
    let _ = writeln!(out, "{}", "=".repeat(item.title().chars().count()));
    let _ = writeln!(out, "id:         {}", item.id());
    let _ = writeln!(out, "type:       {}", item.kind());
    for (label, value) in [
        ("artist:    ", item.artist()),
        ("album:     ", item.album()),
        ("collection:", item.collection()),
    ] {
        if let Some(value) = value {
            let _ = writeln!(out, "{label} {value}");
        }
    }
    if let Some(year) = item.year() {
        let _ = writeln!(out, "year:       {year}");
    }
    if !item.tags().is_empty() {
        let _ = writeln!(out, "tags:       {}", item.tags().join(", "));
    }
    let _ = writeln!(
        out,
        "words:      {} ({} chars)",
        item.word_count(),
        item.char_count()
    );
    let _ = writeln!(out, "created:    {}", item.created_at().format("%Y-%m-%d %H:%M"));
    let _ = writeln!(out, "updated:    {}", item.updated_at().format("%Y-%m-%d %H:%M"));
    out
}

/// Content with highlights in brackets and numbered notes below
pub fn annotated_text(rendering: &Rendering) -> String {
    let mut body = String::new();
    let mut notes = String::new();
    let mut number = 0;

    for segment in &rendering.segments {
        match segment {
            Segment::Plain { text } => body.push_str(text),
            Segment::Highlighted {
                text,
                annotation_id,
                note,
            } => {
                number += 1;
                let _ = write!(body, "[{text}]^{number}");
                let _ = writeln!(notes, "  ^{number} ({}) {note}", short_id(annotation_id.as_str()));
            }
        }
    }

    if !body.ends_with('\n') {
        body.push('\n');
    }
    if !notes.is_empty() {
        body.push_str("\nNotes:\n");
        body.push_str(&notes);
    }
    for skipped in &rendering.skipped {
        let _ = writeln!(
            body,
            "  (annotation {} at {}..{} not shown: {:?})",
            short_id(skipped.annotation_id.as_str()),
            skipped.range.start,
            skipped.range.end,
            skipped.reason
        );
    }
    body
}

/// Annotations with full IDs, oldest first, as printed by `notes`
pub fn note_list(annotations: &AnnotationSet) -> String {
    let mut out = String::new();
    for annotation in annotations.sorted_by_date() {
        let _ = writeln!(
            out,
            "{}  {}  {}..{}  {:?}",
            annotation.id(),
            annotation.created_at().format("%Y-%m-%d %H:%M"),
            annotation.text_start(),
            annotation.text_end(),
            annotation.selected_text()
        );
        let _ = writeln!(out, "    {}", annotation.note());
    }
    out
}

/// Segment table for picking `--at SEGMENT:OFFSET` positions
pub fn segment_table(rendering: &Rendering) -> String {
    let mut out = String::new();
    for (index, segment) in rendering.segments.iter().enumerate() {
        let kind = if segment.is_highlighted() { "note" } else { "text" };
        let _ = writeln!(
            out,
            "{index:>3}  {kind}  {:>4} chars  {:?}",
            segment.char_len(),
            segment.text()
        );
    }
    out
}

pub fn stats_block(stats: &CollectionStats) -> String {
    format!(
        "Total:       {}\nLyrics:      {}\nPoems:       {}\nAnnotations: {}\n",
        stats.total, stats.lyrics, stats.poems, stats.annotations
    )
}
