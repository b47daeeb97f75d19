//! Error types for folio.

use std::path::PathBuf;

/// Errors that can occur while sectioning and chunking a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No page of the document contains the table-of-contents marker.
    #[error("table of contents not found (marker {marker:?})")]
    StructureNotFound {
        /// The marker that was searched for.
        marker: String,
    },

    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// Overlap is not strictly smaller than the chunk size.
    #[error("overlap {overlap} must be smaller than chunk size {size}")]
    OverlapExceedsSize {
        /// The chunk size.
        size: usize,
        /// The overlap that exceeded the size.
        overlap: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A document or a whole batch produced zero chunks.
    #[error("no chunks were produced")]
    NoChunksProduced,

    /// Reading or writing a file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The chunk manifest (or a JSON config) could not be encoded or decoded.
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// The batch worker pool could not be created.
    #[error("worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for folio operations.
pub type Result<T> = std::result::Result<T, Error>;
