//! Annotation commands for adding, editing, and deleting annotations
//!
//! Each command produces a new annotation set and the inverse command that
//! restores the previous one, so the session can undo and redo them.

use crate::{Command, CommandResult, EditError, Result};
use annotation_model::{Annotation, AnnotationError, AnnotationId, AnnotationSet};
use serde::{Deserialize, Serialize};

// =============================================================================
// Add Annotation Command
// =============================================================================

/// Add an annotation to the set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAnnotation {
    /// The annotation to add, with its ID already assigned
    pub annotation: Annotation,
}

impl AddAnnotation {
    /// Create a new add annotation command
    pub fn new(annotation: Annotation) -> Self {
        Self { annotation }
    }
}

impl Command for AddAnnotation {
    fn apply(&self, annotations: &AnnotationSet) -> Result<CommandResult> {
        let new_set = annotations.add(self.annotation.clone())?;

        let inverse = Box::new(RemoveAnnotation {
            annotation_id: self.annotation.id().clone(),
        });

        Ok(CommandResult {
            annotations: new_set,
            inverse,
        })
    }

    fn display_name(&self) -> &str {
        "Add Annotation"
    }
}

// =============================================================================
// Edit Note Command
// =============================================================================

/// Replace the note of an annotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditNote {
    /// ID of the annotation to edit
    pub annotation_id: AnnotationId,
    /// New note text
    pub note: String,
}

impl EditNote {
    /// Create a new edit note command
    pub fn new(annotation_id: AnnotationId, note: impl Into<String>) -> Self {
        Self {
            annotation_id,
            note: note.into(),
        }
    }
}

impl Command for EditNote {
    fn apply(&self, annotations: &AnnotationSet) -> Result<CommandResult> {
        let old_note = annotations
            .get(&self.annotation_id)
            .ok_or_else(|| EditError::AnnotationNotFound(self.annotation_id.clone()))?
            .note()
            .to_string();

        let inverse = Box::new(EditNote {
            annotation_id: self.annotation_id.clone(),
            note: old_note,
        });

        Ok(CommandResult {
            annotations: annotations.update(&self.annotation_id, self.note.as_str()),
            inverse,
        })
    }

    fn display_name(&self) -> &str {
        "Edit Note"
    }
}

// =============================================================================
// Remove Annotation Command
// =============================================================================

/// Delete an annotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveAnnotation {
    /// ID of the annotation to delete
    pub annotation_id: AnnotationId,
}

impl RemoveAnnotation {
    /// Create a new remove annotation command
    pub fn new(annotation_id: AnnotationId) -> Self {
        Self { annotation_id }
    }
}

impl Command for RemoveAnnotation {
    fn apply(&self, annotations: &AnnotationSet) -> Result<CommandResult> {
        let index = annotations
            .iter()
            .position(|a| a.id() == &self.annotation_id)
            .ok_or_else(|| EditError::AnnotationNotFound(self.annotation_id.clone()))?;

        // Keep the full annotation so undo restores its ID, date and place
        let inverse = Box::new(RestoreAnnotation {
            annotation: annotations.as_slice()[index].clone(),
            index,
        });

        Ok(CommandResult {
            annotations: annotations.remove(&self.annotation_id),
            inverse,
        })
    }

    fn display_name(&self) -> &str {
        "Delete Annotation"
    }
}

// =============================================================================
// Restore Annotation Command (for undo)
// =============================================================================

/// Put a deleted annotation back where it was
///
/// Unlike [`AddAnnotation`] this does not re-validate the note, since the
/// annotation may have been given an empty note before it was deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreAnnotation {
    /// The deleted annotation
    pub annotation: Annotation,
    /// Its position in the set's insertion order
    pub index: usize,
}

impl Command for RestoreAnnotation {
    fn apply(&self, annotations: &AnnotationSet) -> Result<CommandResult> {
        if let Some(existing) = annotations.overlapping(self.annotation.range()).first() {
            return Err(EditError::Annotation(AnnotationError::Overlap {
                existing: existing.id().clone(),
                start: self.annotation.text_start(),
                end: self.annotation.text_end(),
            }));
        }

        let mut restored = annotations.as_slice().to_vec();
        restored.insert(self.index.min(restored.len()), self.annotation.clone());

        let inverse = Box::new(RemoveAnnotation {
            annotation_id: self.annotation.id().clone(),
        });

        Ok(CommandResult {
            annotations: AnnotationSet::from_unchecked(restored),
            inverse,
        })
    }

    fn display_name(&self) -> &str {
        "Restore Annotation"
    }
}
