//! Undo/redo manager

use crate::{Command, EditError, Result};

/// Default cap on the number of undo entries
pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// An entry in the undo stack
#[derive(Debug)]
struct UndoEntry {
    /// The original command
    command: Box<dyn Command>,
    /// The inverse command (for undo)
    inverse: Box<dyn Command>,
}

/// Manages undo and redo stacks
#[derive(Debug)]
pub struct UndoManager {
    /// Stack of commands that can be undone
    undo_stack: Vec<UndoEntry>,
    /// Stack of commands that can be redone
    redo_stack: Vec<Box<dyn Command>>,
    /// Maximum number of undo entries
    max_entries: usize,
}

impl UndoManager {
    /// Create a new undo manager
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_UNDO_LIMIT)
    }

    /// Create with a custom entry limit
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Push a newly executed command onto the undo stack
    pub fn push(&mut self, command: Box<dyn Command>, inverse: Box<dyn Command>) {
        // Clear redo stack on new command
        self.redo_stack.clear();
        self.record(command, inverse);
    }

    /// Push a command that was re-applied by redo, keeping the rest of the redo stack
    pub fn push_redone(&mut self, command: Box<dyn Command>, inverse: Box<dyn Command>) {
        self.record(command, inverse);
    }

    fn record(&mut self, command: Box<dyn Command>, inverse: Box<dyn Command>) {
        self.undo_stack.push(UndoEntry { command, inverse });

        // Enforce max entries
        if self.undo_stack.len() > self.max_entries {
            let overflow = self.undo_stack.len() - self.max_entries;
            self.undo_stack.drain(..overflow);
        }
    }

    /// Pop the last command for undo
    pub fn pop_undo(&mut self) -> Result<Box<dyn Command>> {
        let entry = self.undo_stack.pop().ok_or(EditError::UndoStackEmpty)?;

        // Push to redo stack
        self.redo_stack.push(entry.command);

        Ok(entry.inverse)
    }

    /// Pop a command for redo
    pub fn pop_redo(&mut self) -> Result<Box<dyn Command>> {
        self.redo_stack.pop().ok_or(EditError::RedoStackEmpty)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Name of the command the next undo would revert
    pub fn undo_name(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.command.display_name())
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RemoveAnnotation;
    use annotation_model::AnnotationId;

    fn command(id: &str) -> Box<dyn Command> {
        Box::new(RemoveAnnotation::new(AnnotationId::from(id)))
    }

    #[test]
    fn test_empty_stacks() {
        let mut manager = UndoManager::new();
        assert!(!manager.can_undo());
        assert!(!manager.can_redo());
        assert!(matches!(manager.pop_undo(), Err(EditError::UndoStackEmpty)));
        assert!(matches!(manager.pop_redo(), Err(EditError::RedoStackEmpty)));
    }

    #[test]
    fn test_undo_moves_command_to_redo() {
        let mut manager = UndoManager::new();
        manager.push(command("a"), command("a-inverse"));
        assert_eq!(manager.undo_name(), Some("Delete Annotation"));

        manager.pop_undo().unwrap();
        assert!(!manager.can_undo());
        assert!(manager.can_redo());

        manager.push(command("b"), command("b-inverse"));
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut manager = UndoManager::with_limit(2);
        manager.push(command("a"), command("a"));
        manager.push(command("b"), command("b"));
        manager.push(command("c"), command("c"));

        manager.pop_undo().unwrap();
        manager.pop_undo().unwrap();
        assert!(!manager.can_undo());
    }

    #[test]
    fn test_push_redone_keeps_redo_stack() {
        let mut manager = UndoManager::new();
        manager.push(command("a"), command("a"));
        manager.push(command("b"), command("b"));
        manager.pop_undo().unwrap();
        manager.pop_undo().unwrap();

        let redo = manager.pop_redo().unwrap();
        manager.push_redone(redo, command("a"));

        assert!(manager.can_undo());
        assert!(manager.can_redo());
    }

    #[test]
    fn test_clear() {
        let mut manager = UndoManager::new();
        manager.push(command("a"), command("a"));
        manager.pop_undo().unwrap();
        manager.clear();
        assert!(!manager.can_undo());
        assert!(!manager.can_redo());
    }
}
