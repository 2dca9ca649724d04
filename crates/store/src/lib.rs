//! Store - Persistence and file I/O
//!
//! This crate handles collection serialization, loading and saving the
//! collection file, and application settings.

mod error;
mod file_io;
mod format;
mod serializer;
mod settings;

pub use error::*;
pub use file_io::*;
pub use format::*;
pub use serializer::*;
pub use settings::*;
