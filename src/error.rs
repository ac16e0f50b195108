//! Error type shared by the library modules.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FolderViewError {
    /// A caller-supplied path that is absolute, climbs out with `..`, or
    /// resolves outside the document root.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("{}: cannot resolve document root: {source}", path.display())]
    DocumentRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The render root itself is missing or unreadable. Subdirectories never
    /// raise this; they degrade to empty nodes instead.
    #[error("{path:?}: cannot read directory: {source}")]
    RootUnreadable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to emit markup")]
    Render(#[from] std::fmt::Error),
}

impl FolderViewError {
    pub(crate) fn invalid(path: impl Into<String>, reason: &'static str) -> Self {
        FolderViewError::InvalidPath {
            path: path.into(),
            reason,
        }
    }
}

pub type Result<T, E = FolderViewError> = std::result::Result<T, E>;
