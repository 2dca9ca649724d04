//! Error types for editing operations

use annotation_model::{AnnotationError, AnnotationId};
use render_model::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Annotations are read-only")]
    ReadOnly,

    #[error("No text is selected")]
    NoPendingSelection,

    #[error("Annotation not found: {0}")]
    AnnotationNotFound(AnnotationId),

    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("Selection error: {0}")]
    Render(#[from] RenderError),

    #[error("Undo stack is empty")]
    UndoStackEmpty,

    #[error("Redo stack is empty")]
    RedoStackEmpty,
}

pub type Result<T> = std::result::Result<T, EditError>;
