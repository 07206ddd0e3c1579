//! Error types for loading, aggregating and rendering instance documents.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the library and report modules.
pub type Result<T> = std::result::Result<T, DocError>;

/// Errors raised while building the documentation.
#[derive(Debug, Error)]
pub enum DocError {
    /// Reading an input file or writing an output document failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An input file does not live under the input root.
    #[error("{} is not inside input root {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// A document lacks a field its category cannot be rendered without.
    #[error("invalid {kind} document `{document}`: {reason}")]
    InvalidPayload {
        kind: &'static str,
        document: String,
        reason: String,
    },

    /// A group has children but its defining document was never ingested.
    #[error("incomplete {category} group `{name}`: defining document `{name}` is missing")]
    IncompleteGroup { category: &'static str, name: String },

    /// A term reference points at nothing in the terminology library.
    #[error("unresolved reference `{id}` (expected in terminology `{terminology}`)")]
    UnresolvedReference { id: String, terminology: String },
}

impl DocError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
