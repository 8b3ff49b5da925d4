//! Error types for the store and the task list.

use std::path::PathBuf;

use thiserror::Error;

/// Failure writing (or backing up) the data file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize task list: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("data file {} does not exist", .0.display())]
    Missing(PathBuf),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A rejected task list operation. The list is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task text is empty")]
    EmptyText,
    #[error("no task at position {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
