//! Annotation editing session
//!
//! Composes the renderer, the selection resolver and the annotation commands
//! for one item's content. The session owns the current annotation snapshot
//! and re-renders it after every change, so selections are always resolved
//! against the segments the user is actually looking at.

use crate::{AddAnnotation, Command, EditError, EditNote, RemoveAnnotation, Result, UndoManager};
use annotation_model::{Annotation, AnnotationError, AnnotationId, AnnotationSet};
use render_model::{
    resolve_selection, AnnotationRenderer, LeafSelection, RenderConfig, RenderError, Rendering,
    ResolvedRange,
};

/// Session behavior switches
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Reject every change and ignore selections
    pub read_only: bool,
    /// Whether a note may be edited down to nothing
    pub allow_empty_note_on_edit: bool,
    /// Maximum number of undo entries
    pub undo_limit: usize,
    /// Renderer configuration
    pub render: RenderConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            allow_empty_note_on_edit: true,
            undo_limit: crate::DEFAULT_UNDO_LIMIT,
            render: RenderConfig::default(),
        }
    }
}

/// Editing state for the annotations of a single content string
#[derive(Debug)]
pub struct AnnotationSession {
    content: String,
    annotations: AnnotationSet,
    renderer: AnnotationRenderer,
    rendering: Rendering,
    /// Selection waiting for a note
    pending: Option<ResolvedRange>,
    /// Annotation whose note is being edited
    editing: Option<AnnotationId>,
    config: SessionConfig,
    undo_manager: UndoManager,
}

impl AnnotationSession {
    /// Start a session over `content` with its current annotations
    pub fn new(content: impl Into<String>, annotations: AnnotationSet, config: SessionConfig) -> Self {
        let content = content.into();
        let renderer = AnnotationRenderer::new(config.render.clone());
        let rendering = renderer.render(&content, &annotations);
        if !rendering.is_complete() {
            tracing::warn!(
                skipped = rendering.skipped.len(),
                "some annotations no longer fit the content"
            );
        }

        Self {
            content,
            annotations,
            renderer,
            rendering,
            pending: None,
            editing: None,
            undo_manager: UndoManager::with_limit(config.undo_limit),
            config,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Current annotation snapshot
    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    /// Current display segments
    pub fn rendering(&self) -> &Rendering {
        &self.rendering
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    /// Toggle read-only mode; entering it drops any pending selection or edit
    pub fn set_read_only(&mut self, read_only: bool) {
        self.config.read_only = read_only;
        if read_only {
            self.pending = None;
            self.editing = None;
        }
    }

    /// Record a user selection over the current segments.
    ///
    /// Collapsed selections, blank selected text and read-only sessions are
    /// ignored and return `Ok(None)`. Otherwise the selection becomes the
    /// pending range that the next [`commit`](Self::commit) annotates.
    pub fn select(&mut self, selection: &LeafSelection, selected_text: &str) -> Result<Option<&ResolvedRange>> {
        if self.config.read_only || selection.is_collapsed() || selected_text.trim().is_empty() {
            return Ok(None);
        }

        let resolved = match resolve_selection(&self.rendering.segments, selection, selected_text) {
            Ok(resolved) => resolved,
            Err(RenderError::Collapsed) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        resolved.verify(&self.content)?;

        tracing::debug!(start = resolved.start, end = resolved.end, "selection resolved");
        self.pending = Some(resolved);
        Ok(self.pending.as_ref())
    }

    /// The selection waiting for a note, if any
    pub fn pending_selection(&self) -> Option<&ResolvedRange> {
        self.pending.as_ref()
    }

    pub fn cancel_selection(&mut self) {
        self.pending = None;
    }

    /// Attach `note` to the pending selection.
    ///
    /// On failure (blank note, overlap) the set and the pending selection are
    /// left as they were so the user can fix the note or reselect.
    pub fn commit(&mut self, note: &str) -> Result<AnnotationId> {
        if self.config.read_only {
            return Err(EditError::ReadOnly);
        }
        let pending = self.pending.as_ref().ok_or(EditError::NoPendingSelection)?;

        let note = note.trim();
        if note.is_empty() {
            return Err(AnnotationError::EmptyNote.into());
        }

        let annotation = Annotation::new(pending.range(), pending.text.as_str(), note);
        let id = annotation.id().clone();
        self.execute(Box::new(AddAnnotation::new(annotation)))?;

        self.pending = None;
        Ok(id)
    }

    /// Start editing the note of `id`, returning the current note.
    ///
    /// Unknown IDs and read-only sessions return `None`.
    pub fn begin_edit(&mut self, id: &AnnotationId) -> Option<&str> {
        if self.config.read_only {
            return None;
        }
        let annotation = self.annotations.get(id)?;
        self.editing = Some(id.clone());
        Some(annotation.note())
    }

    /// Annotation currently being edited
    pub fn editing(&self) -> Option<&AnnotationId> {
        self.editing.as_ref()
    }

    /// Save the note being edited. Returns `false` when nothing was changed.
    pub fn save_edit(&mut self, note: &str) -> Result<bool> {
        if self.config.read_only {
            return Err(EditError::ReadOnly);
        }
        let Some(id) = self.editing.clone() else {
            return Ok(false);
        };

        let note = note.trim();
        if note.is_empty() && !self.config.allow_empty_note_on_edit {
            return Err(AnnotationError::EmptyNote.into());
        }

        self.editing = None;
        self.update_note(&id, note)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Replace the note of `id` directly. Unknown IDs are a no-op returning `false`.
    pub fn update_note(&mut self, id: &AnnotationId, note: &str) -> Result<bool> {
        if self.config.read_only {
            return Err(EditError::ReadOnly);
        }
        if !self.annotations.contains(id) {
            tracing::debug!(%id, "note update ignored: annotation not found");
            return Ok(false);
        }
        if note.trim().is_empty() && !self.config.allow_empty_note_on_edit {
            return Err(AnnotationError::EmptyNote.into());
        }

        self.execute(Box::new(EditNote::new(id.clone(), note.trim())))?;
        Ok(true)
    }

    /// Delete the annotation `id`. Unknown IDs are a no-op returning `false`.
    pub fn delete(&mut self, id: &AnnotationId) -> Result<bool> {
        if self.config.read_only {
            return Err(EditError::ReadOnly);
        }
        if !self.annotations.contains(id) {
            tracing::debug!(%id, "delete ignored: annotation not found");
            return Ok(false);
        }

        self.execute(Box::new(RemoveAnnotation::new(id.clone())))?;
        if self.editing.as_ref() == Some(id) {
            self.editing = None;
        }
        Ok(true)
    }

    /// Undo the last change
    pub fn undo(&mut self) -> Result<()> {
        if self.config.read_only {
            return Err(EditError::ReadOnly);
        }
        let inverse = self.undo_manager.pop_undo()?;
        let result = inverse.apply(&self.annotations)?;
        self.replace_annotations(result.annotations);
        Ok(())
    }

    /// Redo the last undone change
    pub fn redo(&mut self) -> Result<()> {
        if self.config.read_only {
            return Err(EditError::ReadOnly);
        }
        let command = self.undo_manager.pop_redo()?;
        let result = command.apply(&self.annotations)?;
        self.undo_manager.push_redone(command, result.inverse);
        self.replace_annotations(result.annotations);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.undo_manager.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_manager.can_redo()
    }

    /// End the session, handing the final snapshot back to the owner
    pub fn into_annotations(self) -> AnnotationSet {
        self.annotations
    }

    fn execute(&mut self, command: Box<dyn Command>) -> Result<()> {
        let result = command.apply(&self.annotations)?;
        tracing::debug!(command = command.display_name(), "annotation command applied");

        self.undo_manager.push(command, result.inverse);
        self.replace_annotations(result.annotations);
        Ok(())
    }

    fn replace_annotations(&mut self, annotations: AnnotationSet) {
        self.annotations = annotations;
        self.rendering = self.renderer.render(&self.content, &self.annotations);
    }
}
