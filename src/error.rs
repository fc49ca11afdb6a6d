//! Error types for content indexing

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or parsing content files
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk content directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("front-matter is not closed with `---`")]
    UnterminatedFrontMatter,

    #[error("invalid front-matter: {0}")]
    InvalidFrontMatter(String),

    #[error("{path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<ContentError>,
    },
}

impl ContentError {
    /// Attach the offending file to a parse error
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // Io and Walk errors already carry a path
            e @ (ContentError::Io { .. } | ContentError::Walk { .. } | ContentError::File { .. }) => e,
            e => ContentError::File {
                path: path.into(),
                source: Box::new(e),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
