//! Edit Engine - annotation commands, editing session, and undo/redo
//!
//! This crate implements the command-based annotation editing used when a
//! user selects text in an item and attaches, edits, or deletes notes.

mod annotation_commands;
mod command;
mod error;
mod session;
mod undo;

pub use annotation_commands::*;
pub use command::*;
pub use error::*;
pub use session::*;
pub use undo::*;
