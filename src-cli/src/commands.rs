//! Command handlers
//!
//! Each handler works on the loaded [`AppState`] and returns the text to
//! print. Saving is left to the caller, driven by [`Outcome::changed`].

use crate::output;
use crate::state::AppState;
use crate::{AnnotateArgs, Command, ItemArgs, ListArgs};
use annotation_model::{text, AnnotationId, AnnotationSet};
use anyhow::{anyhow, bail, Context, Result};
use edit_engine::AnnotationSession;
use library::{all_tags, search, CollectionStats, ItemDraft, SearchFilters};
use render_model::{flatten_point, locate_offset, LeafPoint, LeafSelection};
use std::io::Read;
use std::path::Path;

/// Result of running a command
#[derive(Debug, Default)]
pub struct Outcome {
    pub output: String,
    /// Whether the collection was modified and must be saved
    pub changed: bool,
}

impl Outcome {
    fn read(output: String) -> Self {
        Self {
            output,
            changed: false,
        }
    }

    fn write(output: String) -> Self {
        Self {
            output,
            changed: true,
        }
    }
}

pub fn run(command: Command, state: &mut AppState) -> Result<Outcome> {
    match command {
        Command::List(args) => Ok(Outcome::read(list(state, args))),
        Command::Show { id, segments, json } => show(state, &id, segments, json).map(Outcome::read),
        Command::Add(args) => add(state, args).map(Outcome::write),
        Command::Edit { id, fields } => edit(state, &id, fields).map(Outcome::write),
        Command::Delete { id } => delete(state, &id).map(Outcome::write),
        Command::Tags => Ok(Outcome::read(
            all_tags(&state.collection)
                .into_iter()
                .map(|tag| tag + "\n")
                .collect(),
        )),
        Command::Stats => Ok(Outcome::read(output::stats_block(&CollectionStats::from_items(
            &state.collection,
        )))),
        Command::Annotate(args) => annotate(state, args).map(Outcome::write),
        Command::Note {
            id,
            annotation,
            note,
        } => edit_note(state, &id, &annotation, &note).map(Outcome::write),
        Command::Notes { id } => notes(state, &id).map(Outcome::read),
        Command::Unannotate { id, annotation } => unannotate(state, &id, &annotation).map(Outcome::write),
    }
}

fn list(state: &AppState, args: ListArgs) -> String {
    let filters = SearchFilters {
        query: args.query.unwrap_or_default(),
        kind: args.kind,
        tags: args.tags,
        artist: args.artist,
        year: args.year,
    };
    let sort_by = args.sort.unwrap_or(state.settings.general.default_sort);

    let found = search(&state.collection, &filters, sort_by);
    if found.is_empty() {
        return "No items found\n".to_string();
    }
    found
        .iter()
        .map(|item| {
            if args.long {
                output::item_entry(item)
            } else {
                output::item_line(item) + "\n"
            }
        })
        .collect()
}

fn show(state: &AppState, id: &str, segments: bool, json: bool) -> Result<String> {
    let item = state.collection.find(id)?;
    let session = AnnotationSession::new(item.content(), item.annotations().clone(), state.session_config());
    let rendering = session.rendering();

    if json {
        return Ok(serde_json::to_string_pretty(rendering)? + "\n");
    }
    if segments {
        return Ok(output::segment_table(rendering));
    }
    Ok(format!(
        "{}\n{}",
        output::item_header(item),
        output::annotated_text(rendering)
    ))
}

fn notes(state: &AppState, id: &str) -> Result<String> {
    let item = state.collection.find(id)?;
    if item.annotations().is_empty() {
        return Ok(format!("No annotations on {}\n", item.title()));
    }
    Ok(output::note_list(item.annotations()))
}

/// Content from `--content` or `--file`
fn read_content(args: &ItemArgs) -> Result<Option<String>> {
    if let Some(content) = &args.content {
        return Ok(Some(content.clone()));
    }
    match args.file.as_deref() {
        Some(path) if path == Path::new("-") => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read content from stdin")?;
            Ok(Some(content))
        }
        Some(path) => std::fs::read_to_string(path)
            .map(Some)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => Ok(None),
    }
}

/// Overlay the given fields onto `draft`
fn apply_fields(mut draft: ItemDraft, args: ItemArgs) -> Result<ItemDraft> {
    if let Some(content) = read_content(&args)? {
        draft.content = content;
    }
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(kind) = args.kind {
        draft.kind = kind;
    }
    if let Some(artist) = args.artist {
        draft.artist = Some(artist);
    }
    if let Some(album) = args.album {
        draft.album = Some(album);
    }
    if let Some(collection) = args.collection {
        draft.collection = Some(collection);
    }
    if let Some(year) = args.year {
        draft.year = library::parse_year(&year)?;
    }
    if let Some(tags) = args.tags {
        draft.tags = library::parse_tags(&tags);
    }
    Ok(draft)
}

fn add(state: &mut AppState, args: ItemArgs) -> Result<String> {
    let draft = apply_fields(ItemDraft::default(), args)?;
    let id = state.collection.insert(draft)?;
    Ok(format!("Added {id}\n"))
}

fn edit(state: &mut AppState, id: &str, args: ItemArgs) -> Result<String> {
    let item = state.collection.find(id)?;
    let item_id = item.id().clone();
    let old_content = item.content().to_string();

    let draft = apply_fields(ItemDraft::from_item(item), args)?;
    state.collection.update(&item_id, draft)?;

    let mut message = format!("Updated {item_id}\n");
    if let Some(item) = state.collection.get(&item_id) {
        let drifted = item.annotations().drifted(item.content()).len();
        if item.content() != old_content && drifted > 0 {
            message.push_str(&format!(
                "warning: {drifted} annotation(s) no longer match the edited content\n"
            ));
        }
    }
    Ok(message)
}

fn delete(state: &mut AppState, id: &str) -> Result<String> {
    let item_id = state.collection.find(id)?.id().clone();
    let removed = state
        .collection
        .remove(&item_id)
        .ok_or_else(|| anyhow!("Item {item_id} disappeared"))?;
    Ok(format!("Deleted \"{}\"\n", removed.title()))
}

/// Open a session on an item, run `f`, and store the resulting annotations
fn with_session<T>(
    state: &mut AppState,
    id: &str,
    f: impl FnOnce(&mut AnnotationSession) -> Result<T>,
) -> Result<T> {
    let item = state.collection.find(id)?;
    let item_id = item.id().clone();
    let mut session = AnnotationSession::new(item.content(), item.annotations().clone(), state.session_config());
    if session.is_read_only() {
        bail!("Annotations are read-only (editing.read_only in settings)");
    }

    let value = f(&mut session)?;
    state
        .collection
        .set_annotations(&item_id, session.into_annotations())?;
    Ok(value)
}

/// Selection covering `phrase` in the session's current segments
fn phrase_selection(session: &AnnotationSession, phrase: &str) -> Result<LeafSelection> {
    let content = session.content();
    let byte_start = content
        .find(phrase)
        .filter(|_| !phrase.is_empty())
        .ok_or_else(|| anyhow!("\"{phrase}\" does not occur in the item"))?;
    let start = text::char_offset(content, byte_start);
    let end = start + text::char_len(phrase);
    selection_between(session, start, end)
}

/// Selection starting at a `SEGMENT:OFFSET` point and spanning `selected`
fn point_selection(session: &AnnotationSession, at: &str, selected: &str) -> Result<LeafSelection> {
    let (leaf, offset) = at
        .split_once(':')
        .and_then(|(leaf, offset)| Some((leaf.trim().parse().ok()?, offset.trim().parse().ok()?)))
        .ok_or_else(|| anyhow!("--at must look like SEGMENT:OFFSET, got {at}"))?;
    let segments = &session.rendering().segments;
    let start = flatten_point(segments, LeafPoint::new(leaf, offset))?;
    selection_between(session, start, start + text::char_len(selected))
}

fn selection_between(session: &AnnotationSession, start: usize, end: usize) -> Result<LeafSelection> {
    let segments = &session.rendering().segments;
    let anchor = locate_offset(segments, start);
    let focus = locate_offset(segments, end);
    match (anchor, focus) {
        (Some(anchor), Some(focus)) => Ok(LeafSelection::new(anchor, focus)),
        _ => bail!("Selection {start}..{end} runs past the end of the item"),
    }
}

fn annotate(state: &mut AppState, args: AnnotateArgs) -> Result<String> {
    let note = args.note;
    let (selection_kind, selected) = match (args.phrase, args.at, args.text) {
        (Some(phrase), _, _) => (None, phrase),
        (None, Some(at), Some(selected)) => (Some(at), selected),
        _ => bail!("Pass --phrase, or --at together with --text"),
    };

    let annotation_id = with_session(state, &args.id, |session| {
        let selection = match &selection_kind {
            None => phrase_selection(session, &selected)?,
            Some(at) => point_selection(session, at, &selected)?,
        };
        if session.select(&selection, &selected)?.is_none() {
            bail!("Nothing to annotate: the selection is empty or blank");
        }
        Ok(session.commit(&note)?)
    })?;

    Ok(format!("Annotated with {annotation_id}\n"))
}

/// Find an annotation by full ID or unambiguous prefix
fn find_annotation(annotations: &AnnotationSet, id: &str) -> Result<AnnotationId> {
    let exact = AnnotationId::from(id);
    if annotations.contains(&exact) {
        return Ok(exact);
    }
    let mut matches = annotations
        .iter()
        .filter(|a| a.id().as_str().starts_with(id))
        .map(|a| a.id().clone());
    match (matches.next(), matches.next()) {
        (Some(found), None) => Ok(found),
        (Some(_), Some(_)) => bail!("Annotation prefix {id} is ambiguous"),
        (None, _) => bail!("Annotation not found: {id}"),
    }
}

fn edit_note(state: &mut AppState, id: &str, annotation: &str, note: &str) -> Result<String> {
    with_session(state, id, |session| {
        let annotation_id = find_annotation(session.annotations(), annotation)?;
        session.begin_edit(&annotation_id);
        session.save_edit(note)?;
        Ok(format!("Updated note of {annotation_id}\n"))
    })
}

fn unannotate(state: &mut AppState, id: &str, annotation: &str) -> Result<String> {
    with_session(state, id, |session| {
        let annotation_id = find_annotation(session.annotations(), annotation)?;
        session.delete(&annotation_id)?;
        Ok(format!("Removed annotation {annotation_id}\n"))
    })
}
