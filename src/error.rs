//! Error types for workspace, editor and manifest operations
//!
//! None of these are fatal to the process. They are reported upward for
//! the UI to resolve, or degrade to best-effort continuation.

use std::path::PathBuf;
use thiserror::Error;

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// The file is already open as an editor in the active workspace
    #[error("File already open in workspace: {0}")]
    DuplicateEditor(String),

    #[error("No editor open for: {0}")]
    EditorNotFound(String),

    /// Close or switch requested while editors hold unsaved changes
    #[error("Unsaved changes in: {}", .0.join(", "))]
    UnsavedChanges(Vec<String>),

    /// The manifest entry's disk path no longer resolves to a directory
    #[error("Workspace not found at: {}", .0.display())]
    WorkspaceNotFound(PathBuf),

    #[error("No manifest entry with id: {0}")]
    EntryNotFound(String),

    /// Removal requested for the entry backing the active workspace
    #[error("Workspace is active: {0}")]
    EntryActive(String),

    #[error("No workspace is active")]
    NoActiveWorkspace,

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt manifest: {0}")]
    Corrupt(String),
}

impl PersistenceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsaved_changes_lists_files() {
        let err = WorkspaceError::UnsavedChanges(vec!["a.md".into(), "b.md".into()]);
        assert_eq!(err.to_string(), "Unsaved changes in: a.md, b.md");
    }

    #[test]
    fn test_persistence_converts_into_workspace_error() {
        let err: WorkspaceError = PersistenceError::Corrupt("bad".into()).into();
        assert!(matches!(err, WorkspaceError::Persistence(_)));
        assert_eq!(err.to_string(), "Corrupt manifest: bad");
    }
}
