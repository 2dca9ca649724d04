//! Command system for annotation editing

use annotation_model::AnnotationSet;

/// Result of applying a command
#[derive(Debug)]
pub struct CommandResult {
    /// The new annotation set after the command
    pub annotations: AnnotationSet,
    /// The inverse command (for undo)
    pub inverse: Box<dyn Command>,
}

/// Trait for all annotation editing commands
///
/// Commands never mutate the set they are given; they return a new snapshot
/// together with the command that turns it back into the old one.
pub trait Command: std::fmt::Debug + Send + Sync {
    /// Apply this command to an annotation set
    fn apply(&self, annotations: &AnnotationSet) -> crate::Result<CommandResult>;

    /// Get a display name for this command
    fn display_name(&self) -> &str;
}
