//! Error types for annotation operations

use crate::AnnotationId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("Annotation note cannot be empty")]
    EmptyNote,

    #[error("Invalid annotation range: {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("Annotation range {start}..{end} exceeds content length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("Annotation range {start}..{end} overlaps annotation {existing}")]
    Overlap {
        existing: AnnotationId,
        start: usize,
        end: usize,
    },
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
