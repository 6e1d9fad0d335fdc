//! Error types for pack retrieval.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for pack retrieval operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur while fetching, downloading, or unpacking packs.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to retrieve the pack index.
    #[error("failed to fetch pack index from {url}: {reason}")]
    IndexFetchFailed { url: String, reason: String },

    /// The index document did not match the expected structure.
    #[error("failed to parse pack index from {url}: {reason}")]
    IndexParseFailed { url: String, reason: String },

    /// A pack link did not follow the vendor naming scheme.
    #[error("unexpected pack name format: {href}")]
    BadPackName { href: String },

    /// Failed to download a pack archive.
    #[error("failed to download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// An HTTP request timed out.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },

    /// Failed to read a file or directory.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Archive extraction failed.
    #[error("failed to extract {}: {reason}", path.display())]
    ExtractionFailed { path: PathBuf, reason: String },

    /// An archive entry would escape the extraction root.
    #[error("archive {} contains unsafe entry path {entry:?}", archive.display())]
    UnsafeArchivePath { archive: PathBuf, entry: String },
}
