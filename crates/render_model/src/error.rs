//! Error types for render model

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Selection is collapsed")]
    Collapsed,

    #[error("Selected text is empty")]
    EmptyText,

    #[error("Selection point out of range: leaf {leaf}, offset {offset}")]
    PointOutOfRange { leaf: usize, offset: usize },

    #[error("Resolved range {start}..{end} does not match the selected text")]
    TextMismatch { start: usize, end: usize },
}

pub type Result<T> = std::result::Result<T, RenderError>;
