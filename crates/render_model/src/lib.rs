//! Render Model - annotated text segmentation
//!
//! This crate turns an item's content and its annotations into an ordered
//! list of plain and highlighted segments for display, and maps a selection
//! made over those segments back to char offsets in the content.

mod error;
mod renderer;
mod resolver;
mod segment;

pub use error::*;
pub use renderer::*;
pub use resolver::*;
pub use segment::*;
