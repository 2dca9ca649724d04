//! Annotation Model - positional notes attached to text
//!
//! This crate provides the annotation data model used by the collection:
//! an annotation anchors a note to a `[start, end)` char range of an item's
//! content, and an [`AnnotationSet`] holds the annotations of one item as an
//! immutable snapshot whose mutations return a new set.

mod annotation;
mod annotation_id;
mod annotation_set;
mod error;
pub mod text;

pub use annotation::*;
pub use annotation_id::*;
pub use annotation_set::*;
pub use error::*;
