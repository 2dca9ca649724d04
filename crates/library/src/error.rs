//! Error types for collection operations

use crate::ItemId;
use annotation_model::AnnotationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Year must be between {min} and {max}, got {year}")]
    YearOutOfRange { year: i64, min: u16, max: u16 },

    #[error("Invalid year: {0}")]
    InvalidYear(String),

    #[error("Unknown item type: {0} (expected lyrics or poem)")]
    UnknownKind(String),

    #[error("Unknown sort order: {0} (expected title, date or artist)")]
    UnknownSortOrder(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Item ID prefix {prefix} matches {count} items")]
    AmbiguousId { prefix: String, count: usize },

    #[error("Phrase not found in content: {0}")]
    PhraseNotFound(String),

    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),
}

impl LibraryError {
    pub(crate) fn not_found(id: &ItemId) -> Self {
        Self::ItemNotFound(id.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
